//! Cross-page state: the selected post and the cached current user.
//!
//! Values are stored JSON-encoded under fixed keys in a per-origin key-value
//! store. The HTTP layer backs the store with cookies; tests use
//! [`MemoryStateStore`].

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::posts::{CurrentUser, PostId};

pub const SELECTED_POST_KEY: &str = "postId";
pub const CURRENT_USER_KEY: &str = "userData";

pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    entries: HashMap<String, String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("stored `{key}` is not valid JSON")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode `{key}`")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The stored selection, if any.
///
/// JSON `null` and blank ids count as no selection.
pub fn selected_post<S: StateStore + ?Sized>(store: &S) -> Result<Option<PostId>, StateError> {
    let Some(raw) = store.get(SELECTED_POST_KEY) else {
        return Ok(None);
    };

    let id: Option<PostId> =
        serde_json::from_str(&raw).map_err(|source| StateError::Decode {
            key: SELECTED_POST_KEY,
            source,
        })?;
    Ok(id.filter(|id| !id.is_blank()))
}

pub fn select_post<S: StateStore + ?Sized>(store: &mut S, id: &PostId) -> Result<(), StateError> {
    let encoded = serde_json::to_string(id).map_err(|source| StateError::Encode {
        key: SELECTED_POST_KEY,
        source,
    })?;
    store.set(SELECTED_POST_KEY, encoded);
    Ok(())
}

pub fn current_user<S: StateStore + ?Sized>(store: &S) -> Result<Option<CurrentUser>, StateError> {
    let Some(raw) = store.get(CURRENT_USER_KEY) else {
        return Ok(None);
    };

    serde_json::from_str(&raw).map_err(|source| StateError::Decode {
        key: CURRENT_USER_KEY,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_stored_as_json_string() {
        let mut store = MemoryStateStore::new();
        select_post(&mut store, &PostId::new("42")).expect("stored");

        assert_eq!(store.get(SELECTED_POST_KEY).as_deref(), Some("\"42\""));
        assert_eq!(
            selected_post(&store).expect("decodes"),
            Some(PostId::new("42"))
        );
    }

    #[test]
    fn later_selection_overwrites_earlier() {
        let mut store = MemoryStateStore::new();
        select_post(&mut store, &PostId::new("1")).expect("stored");
        select_post(&mut store, &PostId::new("2")).expect("stored");

        assert_eq!(
            selected_post(&store).expect("decodes"),
            Some(PostId::new("2"))
        );
    }

    #[test]
    fn missing_null_and_blank_selections_are_absent() {
        let mut store = MemoryStateStore::new();
        assert_eq!(selected_post(&store).expect("decodes"), None);

        store.set(SELECTED_POST_KEY, "null".into());
        assert_eq!(selected_post(&store).expect("decodes"), None);

        store.set(SELECTED_POST_KEY, "\"  \"".into());
        assert_eq!(selected_post(&store).expect("decodes"), None);
    }

    #[test]
    fn numeric_selection_is_accepted() {
        let mut store = MemoryStateStore::new();
        store.set(SELECTED_POST_KEY, "17".into());
        assert_eq!(
            selected_post(&store).expect("decodes"),
            Some(PostId::new("17"))
        );
    }

    #[test]
    fn malformed_selection_reports_decode_error() {
        let mut store = MemoryStateStore::new();
        store.set(SELECTED_POST_KEY, "{not json".into());
        assert!(matches!(
            selected_post(&store),
            Err(StateError::Decode {
                key: SELECTED_POST_KEY,
                ..
            })
        ));
    }

    #[test]
    fn current_user_decodes_name() {
        let mut store = MemoryStateStore::new();
        store.set(
            CURRENT_USER_KEY,
            r#"{"name":"Ava","email":"ava@example.com"}"#.into(),
        );

        let user = current_user(&store).expect("decodes").expect("present");
        assert_eq!(user.name, "Ava");
    }
}
