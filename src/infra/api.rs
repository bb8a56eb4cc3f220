//! reqwest-backed client for the social posts API.

use async_trait::async_trait;
use metrics::counter;
use postboard_api_types::DataEnvelope;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::repos::{ApiError, PostDeleter, PostLister, PostReader};
use crate::config::ApiSettings;
use crate::domain::posts::{Post, PostId};

use super::error::InfraError;

const POSTS_PATH: &str = "social/posts";
const API_KEY_HEADER: &str = "X-Noroff-API-Key";

#[derive(Clone, Debug)]
pub struct RemotePostsApi {
    client: Client,
    posts: Url,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl RemotePostsApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let posts = settings.base_url.join(POSTS_PATH).map_err(|err| {
            InfraError::configuration(format!("invalid posts API URL: {err}"))
        })?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            posts,
            api_key: settings.api_key.clone(),
            access_token: settings.access_token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("postboard/", env!("CARGO_PKG_VERSION"))
    }

    fn post_url(&self, id: &PostId) -> Result<Url, ApiError> {
        let mut url = self.posts.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidRequest(format!("`{}` cannot be a base", self.posts)))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    fn with_author(mut url: Url) -> Url {
        url.query_pairs_mut().append_pair("_author", "true");
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|err| ApiError::transport(url.as_str(), err))
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, ApiError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::transport(url.as_str(), err))?;
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(|err| ApiError::decode(url.as_str(), err))
    }
}

fn record_request<T>(operation: &'static str, result: &Result<T, ApiError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(ApiError::Status { .. }) => "status",
        Err(ApiError::Decode { .. }) => "decode",
        Err(ApiError::Transport { .. } | ApiError::InvalidRequest(_)) => "transport",
    };
    counter!(
        "postboard_api_requests_total",
        "operation" => operation,
        "result" => outcome
    )
    .increment(1);
}

#[async_trait]
impl PostReader for RemotePostsApi {
    async fn read_post(&self, id: &PostId) -> Result<Option<Post>, ApiError> {
        let result: Result<Option<Post>, ApiError> = async {
            let url = Self::with_author(self.post_url(id)?);
            debug!(target = "postboard::api", url = %url, "reading post");

            let response = self.send(self.client.get(url.clone()), &url).await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let envelope: DataEnvelope<Option<Post>> = Self::decode(response, &url).await?;
            Ok(envelope.data)
        }
        .await;
        record_request("read_post", &result);
        result
    }
}

#[async_trait]
impl PostLister for RemotePostsApi {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let result: Result<Vec<Post>, ApiError> = async {
            let url = Self::with_author(self.posts.clone());
            debug!(target = "postboard::api", url = %url, "listing posts");

            let response = self.send(self.client.get(url.clone()), &url).await?;
            let envelope: DataEnvelope<Vec<Post>> = Self::decode(response, &url).await?;
            Ok(envelope.data)
        }
        .await;
        record_request("list_posts", &result);
        result
    }
}

#[async_trait]
impl PostDeleter for RemotePostsApi {
    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            let url = self.post_url(id)?;
            debug!(target = "postboard::api", url = %url, "deleting post");

            let response = self.send(self.client.delete(url.clone()), &url).await?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            })
        }
        .await;
        record_request("delete_post", &result);
        result
    }
}
