//! Request path canonicalisation
//!
//! Compiled route regexes expect every path to end in exactly one `/`, so
//! requests are brought into that shape before matching.

use std::borrow::Cow;

/// Checks whether a path is already canonical
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//`, `\`, `?` or `#`
/// - Must end with `/`
///
/// # Examples
///
/// ```
/// use cube_router::path::is_canonical_path;
///
/// assert!(is_canonical_path("/"));
/// assert!(is_canonical_path("/users/5/"));
///
/// assert!(!is_canonical_path(""));
/// assert!(!is_canonical_path("/users/5")); // Missing trailing /
/// assert!(!is_canonical_path("users/5/")); // Missing leading /
/// assert!(!is_canonical_path("/users//5/")); // Double //
/// assert!(!is_canonical_path("/users/5/?page=2")); // Query string
/// ```
pub fn is_canonical_path(path: &str) -> bool {
    path.starts_with('/')
        && path.ends_with('/')
        && !path.contains("//")
        && !path.contains(['\\', '?', '#'])
}

/// Normalize a request path to canonical form
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// # Handles
///
/// - Query strings and fragments: `/a?x=1` → `/a/`
/// - Missing trailing slash: `/path` → `/path/`
/// - Repeated slashes: `/path//to` → `/path/to/`
/// - Backslashes: `\path\to` → `/path/to/`
/// - Empty input: `` → `/`
///
/// # Examples
///
/// ```
/// use cube_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/about/");
/// assert!(matches!(path, Cow::Borrowed("/about/")));
///
/// assert_eq!(normalize_path("/about"), "/about/");
/// assert_eq!(normalize_path("//users///5"), "/users/5/");
/// assert_eq!(normalize_path("/search?q=cube"), "/search/");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_canonical_path(path) {
        return Cow::Borrowed(path);
    }

    let without_query = path.split(['?', '#']).next().unwrap_or("");

    let normalized = without_query
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}/", normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_canonical_path() {
        assert!(is_canonical_path("/"));
        assert!(is_canonical_path("/about/"));
        assert!(is_canonical_path("/users/123/"));

        assert!(!is_canonical_path(""));
        assert!(!is_canonical_path("about/"));
        assert!(!is_canonical_path("/about"));
        assert!(!is_canonical_path("/about//page/"));
        assert!(!is_canonical_path("/about\\page/"));
        assert!(!is_canonical_path("/about/#top"));
    }

    #[test]
    fn test_normalize_path_canonical_is_borrowed() {
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
        assert!(matches!(normalize_path("/users/1/"), Cow::Borrowed("/users/1/")));
    }

    #[test]
    fn test_normalize_path_adds_trailing_slash() {
        assert_eq!(normalize_path("/about"), "/about/");
        assert_eq!(normalize_path("/users/123"), "/users/123/");
    }

    #[test]
    fn test_normalize_path_collapses_slashes() {
        assert_eq!(normalize_path("/about//page"), "/about/page/");
        assert_eq!(normalize_path("/path///to////page//"), "/path/to/page/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_normalize_path_backslash() {
        assert_eq!(normalize_path("\\users\\123"), "/users/123/");
    }

    #[test]
    fn test_normalize_path_strips_query_and_fragment() {
        assert_eq!(normalize_path("/users?page=2"), "/users/");
        assert_eq!(normalize_path("/docs/intro#setup"), "/docs/intro/");
        assert_eq!(normalize_path("/?x=1"), "/");
    }

    #[test]
    fn test_normalize_path_missing_leading_slash() {
        assert_eq!(normalize_path("users/5"), "/users/5/");
    }
}
