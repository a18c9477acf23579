// File: src/error.rs
// Purpose: Build-time and dispatch errors raised by the router

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors raised while building route sets or dispatching a request.
///
/// Everything except [`RouterError::TooManyReroutes`] is a build error: a
/// router that was built successfully references only functions, templates
/// and actions that exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A hook or function reference names nothing in the active registry.
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    /// A literal or regular-expression pattern could not be compiled.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Two positional arguments of the same kind (two patterns or two names).
    #[error("ambiguous route arguments: {detail}")]
    AmbiguousArguments { detail: String },

    /// A route or namespace was declared with a name but no pattern.
    #[error("route `{name}` has no pattern")]
    MissingPattern { name: String },

    /// `expand` referenced a template that was never declared.
    #[error("unknown route template: {name}")]
    UnknownTemplate { name: String },

    /// A template action was referenced but neither bound nor defaulted.
    #[error("action `{action}` of template `{template}` has no implementation")]
    UnboundAction { template: String, action: String },

    /// `action` used somewhere other than the top level of a template or expansion.
    #[error("action `{action}` declared outside of a template or expansion")]
    ActionOutsideTemplate { action: String },

    /// The configured re-route limit was exceeded while dispatching.
    #[error("request re-routed more than {limit} times (last path: {path})")]
    TooManyReroutes { limit: usize, path: String },
}

/// Returned when a string does not name a supported HTTP method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct ParseMethodError(pub String);
