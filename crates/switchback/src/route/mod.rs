//! Route and handler records
//!
//! Both are created while a route set is built and never mutated afterwards.

use std::fmt;

use crate::func::Func;
use crate::method::Method;

pub mod pattern;

pub use pattern::{classify_segment, Captures, PatternKind, PatternSource, RoutePattern, Segment};

/// A compiled route owned by its route set
#[derive(Debug, Clone)]
pub struct Route {
    pub(crate) method: Method,
    pub(crate) pattern: RoutePattern,
    pub(crate) name: Option<String>,
    pub(crate) chain: Vec<Func>,
    /// Definition order across the whole set tree; breaks ties between matches
    pub(crate) order: usize,
}

impl Route {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolved function chain: before hooks, primary functions, after hooks
    pub fn chain(&self) -> &[Func] {
        &self.chain
    }

    /// Canonical path template used for reverse lookup
    pub fn path(&self) -> &str {
        self.pattern.source()
    }

    pub(crate) fn to_match(&self, captures: Captures) -> RouteMatch {
        RouteMatch {
            pattern: self.pattern.source().to_string(),
            captures,
            name: self.name.clone(),
            chain: self.chain.clone(),
            path: self.path().to_string(),
        }
    }
}

/// Result of matching a route against a path
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Source of the matched pattern
    pub pattern: String,
    /// Extracted captures, in declaration order
    pub captures: Captures,
    /// Name of the matched route
    pub name: Option<String>,
    /// Function chain to execute
    pub chain: Vec<Func>,
    /// Canonical path template of the matched route
    pub path: String,
}

impl RouteMatch {
    /// Looks up a captured value by name
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Key an error handler can be looked up by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    Name(String),
    Code(u16),
}

impl From<&str> for HandlerKey {
    fn from(name: &str) -> Self {
        HandlerKey::Name(name.to_string())
    }
}

impl From<String> for HandlerKey {
    fn from(name: String) -> Self {
        HandlerKey::Name(name)
    }
}

impl From<u16> for HandlerKey {
    fn from(code: u16) -> Self {
        HandlerKey::Code(code)
    }
}

impl From<&HandlerKey> for HandlerKey {
    fn from(key: &HandlerKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKey::Name(name) => write!(f, "{}", name),
            HandlerKey::Code(code) => write!(f, "{}", code),
        }
    }
}

/// An error handler, retrievable by its name or by its status code
#[derive(Debug, Clone)]
pub struct Handler {
    pub(crate) name: Option<String>,
    pub(crate) code: Option<u16>,
    pub(crate) chain: Vec<Func>,
}

impl Handler {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn code(&self) -> Option<u16> {
        self.code
    }

    pub fn chain(&self) -> &[Func] {
        &self.chain
    }

    /// Whether either half of the handler's key matches
    pub fn answers(&self, key: &HandlerKey) -> bool {
        match key {
            HandlerKey::Name(name) => self.name.as_deref() == Some(name.as_str()),
            HandlerKey::Code(code) => self.code == Some(*code),
        }
    }
}
