//! Path utilities for normalization and joining
//!
//! Route patterns and request paths are compared in a slash-trimmed form:
//! no leading slash, no trailing slash, no empty segments. The root path is
//! the empty string.
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Checks if a path is already in normalized form
///
/// # Rules
///
/// - Must not start with `/`
/// - Must not end with `/`
/// - Must not contain `//`
///
/// # Examples
///
/// ```
/// use switchback::path::is_normalized;
///
/// assert!(is_normalized(""));
/// assert!(is_normalized("about"));
/// assert!(is_normalized("users/123"));
///
/// assert!(!is_normalized("/"));
/// assert!(!is_normalized("/about"));
/// assert!(!is_normalized("about/"));
/// assert!(!is_normalized("about//page"));
/// ```
pub fn is_normalized(path: &str) -> bool {
    !path.starts_with('/') && !path.ends_with('/') && !path.contains("//")
}

/// Normalize a path to its slash-trimmed form
///
/// Returns `Cow::Borrowed` when the input is already normalized (zero allocations).
///
/// # Examples
///
/// ```
/// use switchback::path::normalize;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize("users/1"), Cow::Borrowed("users/1")));
/// assert_eq!(normalize("/users/1/"), "users/1");
/// assert_eq!(normalize("//users///1"), "users/1");
/// assert_eq!(normalize("/"), "");
/// ```
pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }

    Cow::Owned(
        path.split('/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Joins a prefix and a path, normalizing both
///
/// # Examples
///
/// ```
/// use switchback::path::join;
///
/// assert_eq!(join("foo", "bar"), "foo/bar");
/// assert_eq!(join("/foo/", "/bar"), "foo/bar");
/// assert_eq!(join("", "bar"), "bar");
/// assert_eq!(join("foo", "/"), "foo");
/// ```
pub fn join(prefix: &str, path: &str) -> String {
    let prefix = normalize(prefix);
    let path = normalize(path);

    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.into_owned(),
        (_, true) => prefix.into_owned(),
        _ => format!("{}/{}", prefix, path),
    }
}

/// Renders a normalized path as an absolute URL path (`""` becomes `"/"`)
///
/// # Examples
///
/// ```
/// use switchback::path::absolute;
///
/// assert_eq!(absolute(""), "/");
/// assert_eq!(absolute("foo/1"), "/foo/1");
/// ```
pub fn absolute(path: &str) -> String {
    format!("/{}", normalize(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized(""));
        assert!(is_normalized("about"));
        assert!(is_normalized("blog/posts/hello-world"));

        assert!(!is_normalized("/about"));
        assert!(!is_normalized("about/"));
        assert!(!is_normalized("about//page"));
    }

    #[test]
    fn test_normalize_borrowed_when_valid() {
        let path = normalize("about");
        assert!(matches!(path, Cow::Borrowed("about")));

        let path = normalize("");
        assert!(matches!(path, Cow::Borrowed("")));
    }

    #[test]
    fn test_normalize_slashes() {
        assert_eq!(normalize("/about/"), "about");
        assert_eq!(normalize("/path///to////page"), "path/to/page");
        assert_eq!(normalize("///"), "");
    }

    #[test]
    fn test_join_empty_parts() {
        assert_eq!(join("", ""), "");
        assert_eq!(join("/", "/"), "");
        assert_eq!(join("api/v1", "users/:id"), "api/v1/users/:id");
    }
}
