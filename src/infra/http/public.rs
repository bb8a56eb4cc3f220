use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;

use crate::{
    application::{
        delete::{DeleteError, DeleteService},
        detail::{DetailError, DetailService},
        error::{ErrorReport, HttpError},
        list::ListService,
        navigation,
        state::{self, StateError},
    },
    domain::posts::{CurrentUser, PostId},
    presentation::views::{
        LayoutContext, PageMetaView, PostListTemplate, PostTemplate, render_notice_response,
        render_template_response,
    },
};

use super::{cookies::CookieStateStore, middleware::trace_requests};

const LIST_TITLE: &str = "Posts";

#[derive(Clone)]
pub struct HttpState {
    pub detail: DetailService,
    pub list: ListService,
    pub delete: DeleteService,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/post/", get(post_detail))
        .route("/post/{id}/view", post(view_post))
        .route("/post/{id}/edit", post(edit_post))
        .route("/post/{id}/delete", post(delete_post))
        .route("/_health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(trace_requests))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DetailQuery {
    id: Option<String>,
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.list.page_context().await {
        Ok(content) => {
            let view = LayoutContext::new(PageMetaView::titled(LIST_TITLE), content);
            render_template_response(PostListTemplate { view }, StatusCode::OK)
        }
        Err(err) => render_notice_response(
            state.list.failure_notice(),
            StatusCode::BAD_GATEWAY,
            Some(ErrorReport::from_error("infra::http::public::index", &err)),
        ),
    }
}

async fn post_detail(
    State(state): State<HttpState>,
    Query(query): Query<DetailQuery>,
    jar: CookieJar,
) -> Response {
    let store = CookieStateStore::new(jar);

    let selection = query
        .id
        .map(PostId::new)
        .filter(|id| !id.is_blank())
        .or_else(|| stored_selection(&store));
    let viewer = stored_viewer(&store);

    match state.detail.load(selection, viewer.as_ref()).await {
        Ok(content) => {
            let meta = PageMetaView::titled(content.title.clone());
            let view = LayoutContext::new(meta, content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Err(err) => {
            let status = detail_status(&err);
            let report = (status != StatusCode::OK)
                .then(|| ErrorReport::from_error("infra::http::public::post_detail", &err));
            render_notice_response(err.notice(), status, report)
        }
    }
}

fn detail_status(err: &DetailError) -> StatusCode {
    match err {
        DetailError::MissingSelection => StatusCode::OK,
        DetailError::NotFound(_) => StatusCode::NOT_FOUND,
        DetailError::LoadFailed { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// A selection that cannot be decoded is treated as no selection.
fn stored_selection(store: &CookieStateStore) -> Option<PostId> {
    state::selected_post(store).unwrap_or_else(|err| {
        warn!(target = "postboard::http::state", error = %err, "ignoring stored selection");
        None
    })
}

/// An unreadable user record is treated as an anonymous viewer.
fn stored_viewer(store: &CookieStateStore) -> Option<CurrentUser> {
    state::current_user(store).unwrap_or_else(|err| {
        warn!(target = "postboard::http::state", error = %err, "ignoring stored user");
        None
    })
}

async fn view_post(Path(id): Path<String>, jar: CookieJar) -> Response {
    let mut store = CookieStateStore::new(jar);
    match navigation::view_post(&mut store, &PostId::new(id)) {
        Ok(location) => (store.into_jar(), Redirect::to(&location)).into_response(),
        Err(err) => state_failure("infra::http::public::view_post", &err),
    }
}

async fn edit_post(Path(id): Path<String>, jar: CookieJar) -> Response {
    let mut store = CookieStateStore::new(jar);
    match navigation::edit_post(&mut store, &PostId::new(id)) {
        Ok(location) => (store.into_jar(), Redirect::to(&location)).into_response(),
        Err(err) => state_failure("infra::http::public::edit_post", &err),
    }
}

async fn delete_post(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Response {
    let store = CookieStateStore::new(jar);
    let viewer = stored_viewer(&store);

    match state.delete.delete(&PostId::new(id), viewer.as_ref()).await {
        Ok(location) => Redirect::to(location).into_response(),
        Err(err) => {
            let status = delete_status(&err);
            let report = ErrorReport::from_error("infra::http::public::delete_post", &err);
            render_notice_response(err.notice(), status, Some(report))
        }
    }
}

fn delete_status(err: &DeleteError) -> StatusCode {
    match err {
        DeleteError::Forbidden(_) => StatusCode::FORBIDDEN,
        DeleteError::NotFound(_) => StatusCode::NOT_FOUND,
        DeleteError::LoadFailed { .. } | DeleteError::DeleteFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn state_failure(source: &'static str, err: &StateError) -> Response {
    HttpError::from_error(
        source,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to store selection",
        err,
    )
    .into_response()
}
