//! # Switchback
//!
//! Request routing for web frameworks that bring their own request and
//! response types:
//! - Literal routes with named captures (`users/:id`) and regular expressions
//! - Function chains with before/after hooks, referenced by value or by name
//! - Groups and namespaces that wrap nested chains with their own hooks
//! - Route templates with named actions, expanded under a path prefix
//! - Error handlers keyed by name or status code
//! - Reverse lookup of named routes
//!
//! Everything is resolved when a route set is built. A [`Router`] that was
//! set up without errors only references functions that exist, and is
//! read-only (and `Send + Sync`) from then on.
//!
//! ## Example
//!
//! ```
//! use switchback::{sym, BasicRequest, BasicResponse, Outcome, Router};
//!
//! let mut router = Router::new();
//! router
//!     .set("app", |s| {
//!         s.func("load", |ctx| {
//!             let id = ctx.param("id").unwrap_or_default().to_string();
//!             ctx.params_mut().insert("loaded".to_string(), id);
//!         });
//!
//!         s.get(("users/:id", sym("user"))).to("load");
//!         s.default().run(|ctx| ctx.reroute("users/1"));
//!     })
//!     .unwrap();
//!
//! let mut request = BasicRequest::get("/");
//! let mut response = BasicResponse::default();
//! let outcome = router.dispatch(&mut request, &mut response).unwrap();
//!
//! assert_eq!(
//!     outcome,
//!     Outcome::Routed { set: "app".to_string(), route: Some("user".to_string()) }
//! );
//! assert_eq!(request.params["loaded"], "1");
//! assert_eq!(router.lookup().path_with("user", [("id", 7)]).as_deref(), Some("/users/7"));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod builder;
mod config;
mod context;
mod error;
mod func;
mod lookup;
mod method;
pub mod path;
pub mod route;
mod router;
mod set;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{
    sym, HandlerBuilder, IntoRouteArgs, RouteArg, RouteArgs, RouteBuilder, ScopeBuilder,
    SetBuilder, Symbol,
};
pub use config::{RouterConfig, RoutingConfig, DEFAULT_CONFIG_FILE};
pub use context::{BasicRequest, BasicResponse, Context, Control, Params, Request, Response};
pub use error::{ParseMethodError, Result, RouterError};
pub use func::{FnList, FnRef, Func, FunctionRegistry};
pub use lookup::RouteLookup;
pub use method::Method;
pub use route::{Handler, HandlerKey, PatternKind, PatternSource, Route, RouteMatch, RoutePattern};
pub use router::{Outcome, Router};
pub use set::{RouteSet, SetKind};
