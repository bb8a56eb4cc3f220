//! Request and response shapes of the social posts API.
//!
//! The server and its tests share these so the wire format lives in one place.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// Identifier of a post.
///
/// The API hands out numeric ids while links and stored selections carry
/// strings, so both shapes deserialize into the decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(value) => PostId(value),
            Raw::Number(value) => PostId(value.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub media: Option<Media>,
}

impl Post {
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|author| author.name.as_str())
    }

    /// Media worth rendering: present with a non-empty URL.
    pub fn media(&self) -> Option<&Media> {
        self.media
            .as_ref()
            .filter(|media| !media.url.trim().is_empty())
    }
}

/// Cached record of the signed-in user.
///
/// Only `name` is interpreted; the remaining fields are kept so the record
/// survives a decode/encode cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CurrentUser {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// `{ "data": ..., "meta": ... }` wrapper used by every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_become_strings() {
        let post: Post = serde_json::from_str(
            r#"{"id":42,"title":"Hi","body":null,"created":"2024-03-05T10:00:00.000Z"}"#,
        )
        .expect("post decodes");

        assert_eq!(post.id.as_str(), "42");
        assert!(post.body.is_none());
        assert!(post.author.is_none());
    }

    #[test]
    fn empty_media_url_is_treated_as_absent() {
        let post: Post = serde_json::from_str(
            r#"{"id":"7","title":"T","created":"2024-03-05T10:00:00Z","media":{"url":"","alt":""}}"#,
        )
        .expect("post decodes");

        assert!(post.media.is_some());
        assert!(post.media().is_none());
    }

    #[test]
    fn null_data_decodes_as_none() {
        let envelope: DataEnvelope<Option<Post>> =
            serde_json::from_str(r#"{"data":null,"meta":{}}"#).expect("envelope decodes");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn current_user_keeps_unknown_fields() {
        let user: CurrentUser =
            serde_json::from_str(r#"{"name":"Ava","email":"ava@example.com"}"#)
                .expect("user decodes");
        assert_eq!(user.name, "Ava");
        assert_eq!(
            user.extra.get("email").and_then(|value| value.as_str()),
            Some("ava@example.com")
        );
    }
}
