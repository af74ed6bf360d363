//! Navigation path normalization.
//!
//! Normalized form: no query or fragment, no trailing `/` (except the root),
//! and a final identifier segment collapsed to `:id`. Normalization is
//! idempotent.

/// Placeholder that replaces a trailing identifier segment.
pub const ID_PLACEHOLDER: &str = ":id";

/// Length of an opaque database identifier (24 lowercase hex digits).
const OBJECT_ID_LEN: usize = 24;

/// Normalize a navigation path for cache keying and loader lookup.
///
/// ```
/// use shepherd_preload::normalize;
///
/// assert_eq!(normalize("/members/42?tab=giving#top"), "/members/:id");
/// assert_eq!(normalize("/members/507f1f77bcf86cd799439011"), "/members/:id");
/// assert_eq!(normalize("/members/"), "/members");
/// assert_eq!(normalize("/"), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let mut trimmed = &path[..end];

    while trimmed.len() > 1 && trimmed.ends_with('/') {
        trimmed = &trimmed[..trimmed.len() - 1];
    }

    match trimmed.rsplit_once('/') {
        Some((head, last)) if is_id_segment(last) => format!("{head}/{ID_PLACEHOLDER}"),
        _ => trimmed.to_string(),
    }
}

/// A digits-only segment or a 24-character lowercase hex object id.
pub fn is_id_segment(segment: &str) -> bool {
    let is_digits = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    let is_object_id = segment.len() == OBJECT_ID_LEN
        && segment.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    is_digits || is_object_id
}

/// Parent of a normalized path, stopping at a single root segment.
///
/// `/library/books/:id` → `/library/books` → `/library` → `None`.
pub(crate) fn parent(path: &str) -> Option<&str> {
    let (head, _) = path.rsplit_once('/')?;
    if head.is_empty() || head == "/" { None } else { Some(head) }
}
