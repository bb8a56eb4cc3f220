use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::detail::{DETAIL_CONTAINER_ID, NOT_FOUND_NOTICE};
use crate::application::navigation::LIST_PATH;
use crate::application::repos::{ApiError, PostDeleter, PostReader};
use crate::domain::posts::{self, CurrentUser, PostId};
use crate::presentation::views::NoticeView;

pub const DELETE_FAILED_NOTICE: &str = "Failed to delete post.";
pub const DELETE_FORBIDDEN_NOTICE: &str = "You can only delete your own posts.";

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("viewer may not delete post `{0}`")]
    Forbidden(PostId),
    #[error("post `{0}` not found")]
    NotFound(PostId),
    #[error("failed to load post `{id}` before deleting")]
    LoadFailed {
        id: PostId,
        #[source]
        source: ApiError,
    },
    #[error("failed to delete post `{id}`")]
    DeleteFailed {
        id: PostId,
        #[source]
        source: ApiError,
    },
}

impl DeleteError {
    pub fn notice(&self) -> NoticeView {
        let message = match self {
            DeleteError::Forbidden(_) => DELETE_FORBIDDEN_NOTICE,
            DeleteError::NotFound(_) => NOT_FOUND_NOTICE,
            DeleteError::LoadFailed { .. } | DeleteError::DeleteFailed { .. } => {
                DELETE_FAILED_NOTICE
            }
        };
        NoticeView {
            container_id: DETAIL_CONTAINER_ID.to_string(),
            message,
        }
    }
}

/// Backs the delete control rendered next to a post the viewer authored.
///
/// The author check is repeated here; hiding the control is not enough.
#[derive(Clone)]
pub struct DeleteService {
    reader: Arc<dyn PostReader>,
    deleter: Arc<dyn PostDeleter>,
}

impl DeleteService {
    pub fn new(reader: Arc<dyn PostReader>, deleter: Arc<dyn PostDeleter>) -> Self {
        Self { reader, deleter }
    }

    /// Delete `id` on behalf of `viewer` and return where to send the browser next.
    ///
    /// Without a viewer nothing is read or deleted.
    pub async fn delete(
        &self,
        id: &PostId,
        viewer: Option<&CurrentUser>,
    ) -> Result<&'static str, DeleteError> {
        let Some(viewer) = viewer else {
            warn!(target = "postboard::delete", post_id = %id, "anonymous delete refused");
            return Err(DeleteError::Forbidden(id.clone()));
        };

        let post = match self.reader.read_post(id).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                warn!(target = "postboard::delete", post_id = %id, "post not found");
                return Err(DeleteError::NotFound(id.clone()));
            }
            Err(source) => {
                error!(
                    target = "postboard::delete",
                    post_id = %id,
                    error = %source,
                    "error loading post before delete"
                );
                return Err(DeleteError::LoadFailed {
                    id: id.clone(),
                    source,
                });
            }
        };

        if !posts::is_authored_by(&post, Some(viewer)) {
            warn!(
                target = "postboard::delete",
                post_id = %id,
                viewer = %viewer.name,
                "delete refused for non-author"
            );
            return Err(DeleteError::Forbidden(id.clone()));
        }

        match self.deleter.delete_post(id).await {
            Ok(()) => {
                info!(target = "postboard::delete", post_id = %id, "post deleted");
                Ok(LIST_PATH)
            }
            Err(source) => {
                error!(
                    target = "postboard::delete",
                    post_id = %id,
                    error = %source,
                    "error deleting post"
                );
                Err(DeleteError::DeleteFailed {
                    id: id.clone(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use postboard_api_types::{Author, Post};
    use time::macros::datetime;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakePosts {
        author: Option<&'static str>,
        missing: bool,
        fail_delete: bool,
        reads: AtomicUsize,
        deleted: Mutex<Vec<PostId>>,
    }

    impl FakePosts {
        fn by(author: &'static str) -> Arc<Self> {
            Arc::new(Self {
                author: Some(author),
                ..Default::default()
            })
        }
    }

    #[async_trait]
    impl PostReader for FakePosts {
        async fn read_post(&self, id: &PostId) -> Result<Option<Post>, ApiError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.missing {
                return Ok(None);
            }
            Ok(Some(Post {
                id: id.clone(),
                title: "Title".into(),
                body: None,
                created: datetime!(2024-03-05 10:00 UTC),
                author: self.author.map(|name| Author { name: name.into() }),
                media: None,
            }))
        }
    }

    #[async_trait]
    impl PostDeleter for FakePosts {
        async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
            if self.fail_delete {
                return Err(ApiError::Status {
                    url: "http://api.test/social/posts/1".into(),
                    status: 500,
                    body: String::new(),
                });
            }
            self.deleted.lock().await.push(id.clone());
            Ok(())
        }
    }

    fn service(posts: &Arc<FakePosts>) -> DeleteService {
        DeleteService::new(posts.clone(), posts.clone())
    }

    #[tokio::test]
    async fn author_delete_returns_to_the_list() {
        let posts = FakePosts::by("Ava");
        let viewer = CurrentUser::named("Ava");

        let location = service(&posts)
            .delete(&PostId::new("9"), Some(&viewer))
            .await
            .expect("deleted");

        assert_eq!(location, "/");
        assert_eq!(*posts.deleted.lock().await, vec![PostId::new("9")]);
    }

    #[tokio::test]
    async fn non_author_is_refused_without_deleting() {
        let posts = FakePosts::by("Ava");
        let viewer = CurrentUser::named("Bo");

        let err = service(&posts)
            .delete(&PostId::new("9"), Some(&viewer))
            .await
            .expect_err("refused");

        assert!(matches!(err, DeleteError::Forbidden(_)));
        assert_eq!(err.notice().message, DELETE_FORBIDDEN_NOTICE);
        assert!(posts.deleted.lock().await.is_empty());
    }

    #[tokio::test]
    async fn anonymous_viewer_is_refused_without_reading() {
        let posts = FakePosts::by("Ava");

        let err = service(&posts)
            .delete(&PostId::new("9"), None)
            .await
            .expect_err("refused");

        assert!(matches!(err, DeleteError::Forbidden(_)));
        assert_eq!(posts.reads.load(Ordering::SeqCst), 0);
        assert!(posts.deleted.lock().await.is_empty());
    }

    #[tokio::test]
    async fn authorless_post_cannot_be_deleted() {
        let posts = Arc::new(FakePosts::default());
        let viewer = CurrentUser::named("Ava");

        let err = service(&posts)
            .delete(&PostId::new("9"), Some(&viewer))
            .await
            .expect_err("refused");

        assert!(matches!(err, DeleteError::Forbidden(_)));
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let posts = Arc::new(FakePosts {
            missing: true,
            ..Default::default()
        });
        let viewer = CurrentUser::named("Ava");

        let err = service(&posts)
            .delete(&PostId::new("9"), Some(&viewer))
            .await
            .expect_err("missing");

        assert!(matches!(err, DeleteError::NotFound(_)));
        assert_eq!(err.notice().message, NOT_FOUND_NOTICE);
    }

    #[tokio::test]
    async fn failed_delete_is_reported() {
        let posts = Arc::new(FakePosts {
            author: Some("Ava"),
            fail_delete: true,
            ..Default::default()
        });
        let viewer = CurrentUser::named("Ava");

        let err = service(&posts)
            .delete(&PostId::new("1"), Some(&viewer))
            .await
            .expect_err("fails");

        assert!(matches!(
            err,
            DeleteError::DeleteFailed {
                source: ApiError::Status { status: 500, .. },
                ..
            }
        ));
        assert_eq!(err.notice().message, DELETE_FAILED_NOTICE);
    }
}
