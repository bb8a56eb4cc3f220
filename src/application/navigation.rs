//! Routes between pages and the handoffs that store the selection on the way.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::form_urlencoded;

use crate::application::state::{self, StateError, StateStore};
use crate::domain::posts::PostId;

pub const LIST_PATH: &str = "/";
pub const DETAIL_PATH: &str = "/post/";
pub const EDIT_PATH: &str = "/post/edit/";

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(id: &PostId) -> String {
    utf8_percent_encode(id.as_str(), SEGMENT).to_string()
}

/// `/post/edit/?id=<id>`.
pub fn edit_href(id: &PostId) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("id", id.as_str())
        .finish();
    format!("{EDIT_PATH}?{query}")
}

pub fn view_action(id: &PostId) -> String {
    format!("/post/{}/view", segment(id))
}

pub fn edit_action(id: &PostId) -> String {
    format!("/post/{}/edit", segment(id))
}

pub fn delete_action(id: &PostId) -> String {
    format!("/post/{}/delete", segment(id))
}

/// "View Post": remember `id` and continue to the detail page.
pub fn view_post<S: StateStore + ?Sized>(store: &mut S, id: &PostId) -> Result<String, StateError> {
    state::select_post(store, id)?;
    Ok(DETAIL_PATH.to_string())
}

/// "Edit": remember `id` and continue to the edit page, which also receives it in the query.
pub fn edit_post<S: StateStore + ?Sized>(store: &mut S, id: &PostId) -> Result<String, StateError> {
    state::select_post(store, id)?;
    Ok(edit_href(id))
}
