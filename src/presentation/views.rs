use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render a notice page and attach `report` so the failure is logged.
pub fn render_notice_response(
    notice: NoticeView,
    status: StatusCode,
    report: Option<ErrorReport>,
) -> Response {
    let view = LayoutContext::new(PageMetaView::titled(notice.message), notice);
    let mut response = render_template_response(NoticeTemplate { view }, status);
    if let Some(report) = report {
        report.attach(&mut response);
    }
    response
}

#[derive(Clone)]
pub struct PageMetaView {
    pub brand: String,
    pub title: String,
}

impl PageMetaView {
    pub const BRAND: &'static str = "Postboard";

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            brand: Self::BRAND.to_string(),
            title: title.into(),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(meta: PageMetaView, content: T) -> Self {
        Self { meta, content }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaView {
    pub src: String,
    pub alt: String,
}

#[derive(Clone, Debug)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// `None` renders the placeholder; the media slot itself is always present.
    pub media: Option<MediaView>,
    pub view_action: String,
}

#[derive(Clone, Debug)]
pub struct PostListContext {
    pub container_id: String,
    pub cards: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "posts.html")]
pub struct PostListTemplate {
    pub view: LayoutContext<PostListContext>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostControlsView {
    pub post_id: String,
    pub edit_action: String,
    pub delete_action: String,
}

#[derive(Clone, Debug)]
pub struct PostDetailContext {
    pub container_id: &'static str,
    pub id: String,
    pub title: String,
    pub author: String,
    pub published: String,
    pub iso_date: String,
    pub body: String,
    pub media: Option<MediaView>,
    pub controls: Option<PostControlsView>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeView {
    pub container_id: String,
    pub message: &'static str,
}

#[derive(Template)]
#[template(path = "notice.html")]
pub struct NoticeTemplate {
    pub view: LayoutContext<NoticeView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, media: Option<MediaView>) -> PostCard {
        PostCard {
            id: id.to_string(),
            title: format!("Post {id}"),
            excerpt: "Body".to_string(),
            media,
            view_action: format!("/post/{id}/view"),
        }
    }

    #[test]
    fn list_always_renders_the_media_slot() {
        let content = PostListContext {
            container_id: "posts".into(),
            cards: vec![
                card(
                    "1",
                    Some(MediaView {
                        src: "https://img.example/1.png".into(),
                        alt: "One".into(),
                    }),
                ),
                card("2", None),
            ],
        };
        let html = PostListTemplate {
            view: LayoutContext::new(PageMetaView::titled("Posts"), content),
        }
        .render()
        .expect("list renders");

        assert!(html.contains(r#"id="posts""#));
        assert_eq!(html.matches(r#"class="post-card__media""#).count(), 2);
        assert_eq!(html.matches(r#"class="post-card__image""#).count(), 1);
        assert_eq!(html.matches(r#"class="post-card__placeholder""#).count(), 1);
        assert!(html.contains(r#"action="/post/2/view""#));
    }

    #[test]
    fn text_is_escaped() {
        let mut unsafe_card = card("3", None);
        unsafe_card.title = "<script>alert(1)</script>".into();
        let content = PostListContext {
            container_id: "posts".into(),
            cards: vec![unsafe_card],
        };
        let html = PostListTemplate {
            view: LayoutContext::new(PageMetaView::titled("Posts"), content),
        }
        .render()
        .expect("list renders");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn notice_renders_message_in_container() {
        let html = NoticeTemplate {
            view: LayoutContext::new(
                PageMetaView::titled("Post not found."),
                NoticeView {
                    container_id: "postContainer".into(),
                    message: "Post not found.",
                },
            ),
        }
        .render()
        .expect("notice renders");

        assert!(html.contains(r#"id="postContainer""#));
        assert!(html.contains("<p>Post not found.</p>"));
    }
}
