//! Pattern compilation for route sources
//!
//! A route source is either a literal path (`"users/:id"`) or a regular
//! expression. Both compile into a [`RoutePattern`] that matches normalized
//! request paths and extracts named captures in declaration order.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::path;

/// Ordered `(name, value)` pairs captured by a successful match.
pub type Captures = Vec<(String, String)>;

/// Raw source a route pattern is compiled from.
#[derive(Debug, Clone)]
pub enum PatternSource {
    /// Literal path; segments starting with `:` are named captures
    Literal(String),
    /// Regular expression; named groups are captures
    Regex(Regex),
}

impl From<&str> for PatternSource {
    fn from(source: &str) -> Self {
        PatternSource::Literal(source.to_string())
    }
}

impl From<String> for PatternSource {
    fn from(source: String) -> Self {
        PatternSource::Literal(source)
    }
}

impl From<Regex> for PatternSource {
    fn from(regex: Regex) -> Self {
        PatternSource::Regex(regex)
    }
}

/// One segment of a literal pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must match the request segment exactly
    Static(String),
    /// Captures one non-empty request segment under the given name
    Param(String),
}

/// Classifies a literal pattern segment (pure function)
///
/// # Examples
///
/// ```
/// use switchback::route::pattern::{classify_segment, Segment};
///
/// assert_eq!(classify_segment("users"), Segment::Static("users".to_string()));
/// assert_eq!(classify_segment(":id"), Segment::Param("id".to_string()));
/// ```
pub fn classify_segment(segment: &str) -> Segment {
    match segment.strip_prefix(':') {
        Some(name) => Segment::Param(name.to_string()),
        None => Segment::Static(segment.to_string()),
    }
}

/// Specificity class of a pattern, ordered from most to least specific.
///
/// Used to rank simultaneous matches: a fully literal route beats a
/// parameterized one, which beats a regular expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternKind {
    Static,
    Parameterized,
    Regex,
}

#[derive(Debug, Clone)]
enum Matcher {
    Segments(Vec<Segment>),
    /// `anchored` is rebuilt from the source text; `built` keeps the options
    /// the caller compiled the expression with
    Regex { anchored: Regex, built: Regex },
}

/// A compiled route pattern. Immutable once compiled.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    matcher: Matcher,
    captures: Vec<String>,
}

impl RoutePattern {
    /// Compiles either kind of source
    pub fn compile(source: impl Into<PatternSource>) -> Result<Self> {
        match source.into() {
            PatternSource::Literal(source) => Self::literal(&source),
            PatternSource::Regex(regex) => Self::regex(regex),
        }
    }

    /// Compiles a literal path pattern
    ///
    /// The source is normalized first, so `"/users/:id/"` and `"users/:id"`
    /// compile to the same pattern. Capture names must be non-empty, made of
    /// ASCII letters, digits and `_`, and unique within the pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchback::RoutePattern;
    ///
    /// let pattern = RoutePattern::literal("/posts/:year/:slug").unwrap();
    /// assert_eq!(pattern.source(), "posts/:year/:slug");
    /// assert_eq!(pattern.captures(), ["year", "slug"]);
    ///
    /// let captures = pattern.matches("/posts/2024/hello").unwrap();
    /// assert_eq!(captures[0], ("year".to_string(), "2024".to_string()));
    /// assert_eq!(captures[1], ("slug".to_string(), "hello".to_string()));
    /// ```
    pub fn literal(source: &str) -> Result<Self> {
        let normalized = path::normalize(source).into_owned();

        let segments: Vec<Segment> = normalized
            .split('/')
            .filter(|s| !s.is_empty())
            .map(classify_segment)
            .collect();

        let mut seen = HashSet::new();
        let mut captures = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) = segment {
                if !is_capture_name(name) {
                    return Err(RouterError::InvalidPattern {
                        pattern: normalized,
                        reason: format!("invalid capture name `{}`", name),
                    });
                }
                if !seen.insert(name.as_str()) {
                    return Err(RouterError::InvalidPattern {
                        pattern: normalized.clone(),
                        reason: format!("duplicate capture name `{}`", name),
                    });
                }
                captures.push(name.clone());
            }
        }

        Ok(Self {
            source: normalized,
            matcher: Matcher::Segments(segments),
            captures,
        })
    }

    /// Compiles a regular-expression pattern
    ///
    /// The expression is anchored against the whole normalized path. Named
    /// groups become captures in group-index order. Options set through
    /// `RegexBuilder` are honored, but only when a leftmost match of the
    /// expression as built covers the whole path; prefer inline flags such
    /// as `(?i)`.
    pub fn regex(regex: Regex) -> Result<Self> {
        let anchored = Regex::new(&format!("^(?:{})$", regex.as_str())).map_err(|e| {
            RouterError::InvalidPattern {
                pattern: regex.as_str().to_string(),
                reason: e.to_string(),
            }
        })?;

        let captures = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();

        Ok(Self {
            source: regex.as_str().to_string(),
            matcher: Matcher::Regex {
                anchored,
                built: regex,
            },
            captures,
        })
    }

    /// Normalized literal source, or the regular expression as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Capture names in declaration order
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// Literal segments, `None` for regular-expression patterns
    pub fn segments(&self) -> Option<&[Segment]> {
        match &self.matcher {
            Matcher::Segments(segments) => Some(segments),
            Matcher::Regex { .. } => None,
        }
    }

    pub fn kind(&self) -> PatternKind {
        match &self.matcher {
            Matcher::Regex { .. } => PatternKind::Regex,
            Matcher::Segments(_) if self.captures.is_empty() => PatternKind::Static,
            Matcher::Segments(_) => PatternKind::Parameterized,
        }
    }

    /// Matches a request path (case-sensitive)
    ///
    /// Returns `None` on no match, otherwise the captures in declaration
    /// order. A pattern without captures returns an empty list on success.
    pub fn matches(&self, path: &str) -> Option<Captures> {
        self.matches_with_options(path, false)
    }

    /// Matches a request path with options
    ///
    /// `case_insensitive` applies to static segments of literal patterns only;
    /// regular expressions carry their own flags.
    pub fn matches_with_options(&self, path: &str, case_insensitive: bool) -> Option<Captures> {
        let path = path::normalize(path);

        match &self.matcher {
            Matcher::Segments(segments) => {
                let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
                if parts.len() != segments.len() {
                    return None;
                }

                segments
                    .iter()
                    .zip(parts)
                    .try_fold(Vec::new(), |mut captures, (segment, part)| {
                        match segment {
                            Segment::Static(expected) => {
                                let same = if case_insensitive {
                                    expected.eq_ignore_ascii_case(part)
                                } else {
                                    expected == part
                                };
                                same.then_some(captures)
                            }
                            Segment::Param(name) => {
                                captures.push((name.clone(), part.to_string()));
                                Some(captures)
                            }
                        }
                    })
            }
            Matcher::Regex { anchored, built } => {
                let found = anchored.captures(&path).or_else(|| {
                    built
                        .captures(&path)
                        .filter(|found| found.get(0).is_some_and(|m| m.len() == path.len()))
                })?;
                Some(
                    self.captures
                        .iter()
                        .map(|name| {
                            let value = found.name(name).map(|m| m.as_str()).unwrap_or_default();
                            (name.clone(), value.to_string())
                        })
                        .collect(),
                )
            }
        }
    }
}

fn is_capture_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_static() {
        assert_eq!(classify_segment("about"), Segment::Static("about".to_string()));
    }

    #[test]
    fn test_classify_param() {
        assert_eq!(classify_segment(":id"), Segment::Param("id".to_string()));
    }

    #[test]
    fn test_literal_normalizes_source() {
        let pattern = RoutePattern::literal("//foo/:id/").unwrap();
        assert_eq!(pattern.source(), "foo/:id");
        assert_eq!(pattern.kind(), PatternKind::Parameterized);
    }

    #[test]
    fn test_root_pattern() {
        let pattern = RoutePattern::literal("/").unwrap();
        assert_eq!(pattern.source(), "");
        assert_eq!(pattern.kind(), PatternKind::Static);
        assert_eq!(pattern.matches("/"), Some(vec![]));
        assert_eq!(pattern.matches(""), Some(vec![]));
        assert!(pattern.matches("foo").is_none());
    }

    #[test]
    fn test_duplicate_capture_rejected() {
        let err = RoutePattern::literal("a/:id/b/:id").unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_empty_capture_name_rejected() {
        let err = RoutePattern::literal("a/:").unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_case_insensitive_static_segments() {
        let pattern = RoutePattern::literal("Users/:id").unwrap();
        assert!(pattern.matches("users/1").is_none());

        let captures = pattern.matches_with_options("USERS/Bob", true).unwrap();
        assert_eq!(captures, vec![("id".to_string(), "Bob".to_string())]);
    }

    #[test]
    fn test_regex_is_anchored() {
        let pattern = RoutePattern::regex(Regex::new(r"foo/(?<id>\d+)").unwrap()).unwrap();
        assert!(pattern.matches("foo/12").is_some());
        assert!(pattern.matches("foo/12/extra").is_none());
        assert!(pattern.matches("xfoo/12").is_none());
    }

    #[test]
    fn test_regex_optional_group_yields_empty_string() {
        let pattern =
            RoutePattern::regex(Regex::new(r"items(/(?<id>\d+))?").unwrap()).unwrap();
        let captures = pattern.matches("items").unwrap();
        assert_eq!(captures, vec![("id".to_string(), String::new())]);
    }
}
