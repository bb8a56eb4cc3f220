//! Single post view.
//!
//! Loading walks `Init → NoSelection | Loading → Rendered | NotFound |
//! LoadFailed`; every outcome is terminal. `Ok` is the rendered state and
//! each [`DetailError`] variant is one of the failure states. There is one
//! read attempt per load with no retry, timeout or cancellation.

use std::sync::Arc;

use chrono_tz::Tz;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::application::navigation;
use crate::application::repos::{ApiError, PostReader};
use crate::domain::posts::{self, CurrentUser, Post, PostId};
use crate::presentation::views::{MediaView, NoticeView, PostControlsView, PostDetailContext};
use crate::util::timezone;

/// Identifier of the element the post is rendered into.
pub const DETAIL_CONTAINER_ID: &str = "postContainer";

pub const NO_SELECTION_NOTICE: &str = "No post selected.";
pub const NOT_FOUND_NOTICE: &str = "Post not found.";
pub const LOAD_FAILED_NOTICE: &str = "Failed to load post.";

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("no post selected")]
    MissingSelection,
    #[error("post `{0}` not found")]
    NotFound(PostId),
    #[error("failed to load post `{id}`")]
    LoadFailed {
        id: PostId,
        #[source]
        source: ApiError,
    },
}

impl DetailError {
    pub fn notice(&self) -> NoticeView {
        let message = match self {
            DetailError::MissingSelection => NO_SELECTION_NOTICE,
            DetailError::NotFound(_) => NOT_FOUND_NOTICE,
            DetailError::LoadFailed { .. } => LOAD_FAILED_NOTICE,
        };
        NoticeView {
            container_id: DETAIL_CONTAINER_ID.to_string(),
            message,
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            DetailError::MissingSelection => "no_selection",
            DetailError::NotFound(_) => "not_found",
            DetailError::LoadFailed { .. } => "load_failed",
        }
    }
}

#[derive(Clone)]
pub struct DetailService {
    reader: Arc<dyn PostReader>,
    timezone: Tz,
}

impl DetailService {
    pub fn new(reader: Arc<dyn PostReader>, timezone: Tz) -> Self {
        Self { reader, timezone }
    }

    /// Resolve `selection` into a rendered post for `viewer`.
    ///
    /// Without a selection the reader is never called.
    pub async fn load(
        &self,
        selection: Option<PostId>,
        viewer: Option<&CurrentUser>,
    ) -> Result<PostDetailContext, DetailError> {
        let result = self.resolve(selection, viewer).await;
        record_outcome(&result);
        result
    }

    async fn resolve(
        &self,
        selection: Option<PostId>,
        viewer: Option<&CurrentUser>,
    ) -> Result<PostDetailContext, DetailError> {
        let Some(id) = selection else {
            warn!(
                target = "postboard::detail",
                "no post id found in the selection"
            );
            return Err(DetailError::MissingSelection);
        };

        debug!(target = "postboard::detail", post_id = %id, "loading post");

        match self.reader.read_post(&id).await {
            Ok(Some(post)) => Ok(self.build_context(&post, viewer)),
            Ok(None) => {
                warn!(target = "postboard::detail", post_id = %id, "post not found");
                Err(DetailError::NotFound(id))
            }
            Err(source) => {
                error!(
                    target = "postboard::detail",
                    post_id = %id,
                    error = %source,
                    "error loading post"
                );
                Err(DetailError::LoadFailed { id, source })
            }
        }
    }

    fn build_context(&self, post: &Post, viewer: Option<&CurrentUser>) -> PostDetailContext {
        let date = timezone::localized_date(post.created, self.timezone);

        let media = post.media().map(|media| MediaView {
            src: media.url.clone(),
            alt: posts::media_alt(media).to_string(),
        });

        let controls = posts::is_authored_by(post, viewer).then(|| PostControlsView {
            post_id: post.id.to_string(),
            edit_action: navigation::edit_action(&post.id),
            delete_action: navigation::delete_action(&post.id),
        });

        PostDetailContext {
            container_id: DETAIL_CONTAINER_ID,
            id: post.id.to_string(),
            title: post.title.clone(),
            author: posts::author_label(post).to_string(),
            published: posts::format_human_date(date),
            iso_date: posts::format_iso_date(date),
            body: post.body.clone().unwrap_or_default(),
            media,
            controls,
        }
    }
}

fn record_outcome(result: &Result<PostDetailContext, DetailError>) {
    let outcome = match result {
        Ok(_) => "rendered",
        Err(err) => err.outcome(),
    };
    counter!("postboard_detail_outcome_total", "outcome" => outcome).increment(1);
}
