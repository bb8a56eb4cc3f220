use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::application::state::StateStore;

/// [`StateStore`] over the request's cookies.
///
/// The jar percent-encodes values on the wire, so stored JSON survives the
/// cookie grammar. Writes land in the jar returned by
/// [`CookieStateStore::into_jar`], which must be part of the response for
/// them to reach the browser.
#[derive(Debug, Clone, Default)]
pub struct CookieStateStore {
    jar: CookieJar,
}

impl CookieStateStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl StateStore for CookieStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|cookie| cookie.value().to_string())
    }

    fn set(&mut self, key: &str, value: String) {
        let cookie = Cookie::build((key.to_string(), value))
            .path("/")
            .same_site(SameSite::Lax)
            .build();
        self.jar = self.jar.clone().add(cookie);
    }
}
