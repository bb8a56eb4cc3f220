//! Traits describing the remote posts API the services depend on.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{Post, PostId};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to `{url}` failed: {message}")]
    Transport { url: String, message: String },
    #[error("`{url}` answered with status {status}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from `{url}`: {message}")]
    Decode { url: String, message: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn transport(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: err.to_string(),
        }
    }

    pub fn decode(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

/// Single-post lookup.
#[async_trait]
pub trait PostReader: Send + Sync {
    /// `Ok(None)` when the API has no such post.
    async fn read_post(&self, id: &PostId) -> Result<Option<Post>, ApiError>;
}

#[async_trait]
pub trait PostLister: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError>;
}

#[async_trait]
pub trait PostDeleter: Send + Sync {
    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError>;
}
