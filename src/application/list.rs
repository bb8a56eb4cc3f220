//! Post cards.

use std::{num::NonZeroUsize, sync::Arc};

use tracing::debug;

use crate::application::navigation;
use crate::application::repos::{ApiError, PostLister};
use crate::domain::posts::{self, Post};
use crate::presentation::views::{MediaView, NoticeView, PostCard, PostListContext};

pub const LIST_FAILED_NOTICE: &str = "Failed to load posts.";

#[derive(Debug, Clone)]
pub struct ListRenderer {
    excerpt_chars: NonZeroUsize,
}

impl ListRenderer {
    pub fn new(excerpt_chars: NonZeroUsize) -> Self {
        Self { excerpt_chars }
    }

    /// One card per post, in input order, inside a fresh container.
    ///
    /// The container never carries cards from an earlier call.
    pub fn render_posts(&self, posts: &[Post], container_id: &str) -> PostListContext {
        let cards = posts.iter().map(|post| self.card(post)).collect();
        PostListContext {
            container_id: container_id.to_string(),
            cards,
        }
    }

    fn card(&self, post: &Post) -> PostCard {
        PostCard {
            id: post.id.to_string(),
            title: post.title.clone(),
            excerpt: posts::excerpt(post.body.as_deref().unwrap_or_default(), self.excerpt_chars),
            media: post.media().map(|media| MediaView {
                src: media.url.clone(),
                alt: posts::media_alt(media).to_string(),
            }),
            view_action: navigation::view_action(&post.id),
        }
    }
}

/// Fetches the posts and hands them to the renderer.
#[derive(Clone)]
pub struct ListService {
    lister: Arc<dyn PostLister>,
    renderer: ListRenderer,
    container_id: String,
}

impl ListService {
    pub fn new(lister: Arc<dyn PostLister>, renderer: ListRenderer, container_id: String) -> Self {
        Self {
            lister,
            renderer,
            container_id,
        }
    }

    pub async fn page_context(&self) -> Result<PostListContext, ApiError> {
        let posts = self.lister.list_posts().await?;
        debug!(target = "postboard::list", count = posts.len(), "rendering posts");
        Ok(self.renderer.render_posts(&posts, &self.container_id))
    }

    pub fn failure_notice(&self) -> NoticeView {
        NoticeView {
            container_id: self.container_id.clone(),
            message: LIST_FAILED_NOTICE,
        }
    }
}
