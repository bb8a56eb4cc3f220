use std::num::NonZeroUsize;

use time::{Date, format_description::FormatItem, macros::format_description};

pub use postboard_api_types::{Author, CurrentUser, Media, Post, PostId};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_MEDIA_ALT: &str = "Post image";

const ELLIPSIS: char = '…';

pub fn author_label(post: &Post) -> &str {
    post.author_name()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
}

pub fn media_alt(media: &Media) -> &str {
    media
        .alt
        .as_deref()
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .unwrap_or(DEFAULT_MEDIA_ALT)
}

/// Whether `viewer` may manage `post`.
///
/// Identity is the display name; the API exposes nothing stabler to the
/// frontend, so two accounts sharing a name both match. A post without an
/// author, or a request without a viewer, never matches.
pub fn is_authored_by(post: &Post, viewer: Option<&CurrentUser>) -> bool {
    match (post.author_name(), viewer) {
        (Some(author), Some(viewer)) => !author.is_empty() && author == viewer.name,
        _ => false,
    }
}

/// First `max_chars` characters of `body`, whitespace-collapsed, with an
/// ellipsis when something was cut.
pub fn excerpt(body: &str, max_chars: NonZeroUsize) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let limit = max_chars.get();

    if collapsed.chars().count() <= limit {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(limit).collect();
    let trimmed_len = cut.trim_end().len();
    cut.truncate(trimmed_len);
    cut.push(ELLIPSIS);
    cut
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    fn post_by(author: Option<&str>) -> Post {
        Post {
            id: PostId::new("1"),
            title: "Title".into(),
            body: Some("Body".into()),
            created: datetime!(2024-03-05 10:00 UTC),
            author: author.map(|name| Author { name: name.into() }),
            media: None,
        }
    }

    #[test]
    fn matching_display_name_grants_controls() {
        let viewer = CurrentUser::named("Ava");
        assert!(is_authored_by(&post_by(Some("Ava")), Some(&viewer)));
        assert!(!is_authored_by(&post_by(Some("Bo")), Some(&viewer)));
    }

    #[test]
    fn anonymous_viewer_or_authorless_post_never_matches() {
        let viewer = CurrentUser::named("Ava");
        assert!(!is_authored_by(&post_by(Some("Ava")), None));
        assert!(!is_authored_by(&post_by(None), Some(&viewer)));
        assert!(!is_authored_by(&post_by(None), None));
    }

    #[test]
    fn author_label_falls_back() {
        assert_eq!(author_label(&post_by(None)), UNKNOWN_AUTHOR);
        assert_eq!(author_label(&post_by(Some("  "))), UNKNOWN_AUTHOR);
        assert_eq!(author_label(&post_by(Some("Ava"))), "Ava");
    }

    #[test]
    fn media_alt_falls_back() {
        let media = Media {
            url: "https://img.example/a.png".into(),
            alt: Some(String::new()),
        };
        assert_eq!(media_alt(&media), DEFAULT_MEDIA_ALT);
    }

    #[test]
    fn excerpt_keeps_short_bodies() {
        let limit = NonZeroUsize::new(20).expect("non-zero");
        assert_eq!(excerpt("  short\n body ", limit), "short body");
    }

    #[test]
    fn excerpt_cuts_on_char_boundaries() {
        let limit = NonZeroUsize::new(6).expect("non-zero");
        assert_eq!(excerpt("ålögtext beyond", limit), "ålögte…");
        assert_eq!(excerpt("hello world", limit), "hello…");
    }

    #[test]
    fn human_dates_use_long_month_names() {
        assert_eq!(format_human_date(date!(2024 - 03 - 05)), "March 5, 2024");
        assert_eq!(format_iso_date(date!(2024 - 03 - 05)), "2024-03-05");
    }
}
