//! Declarative builder for route sets
//!
//! A [`SetBuilder`] only records declarations, in order. Patterns are
//! compiled and function references resolved when the set is built
//! (see [`RouteSet::build`](crate::RouteSet::build)), so a build either fails
//! up front or yields a set whose every chain is fully bound.
//!
//! ```
//! use switchback::{sym, RouteSet};
//!
//! let set = RouteSet::build(|s| {
//!     s.func("auth", |_| {});
//!     s.func("show", |_| {});
//!
//!     s.get(("users/:id", sym("user"))).to("show").before("auth");
//!     s.namespace(("admin", sym("admin")), |admin| {
//!         admin.default().to("show");
//!     })
//!     .before("auth");
//! })
//! .unwrap();
//!
//! assert!(set.route("user").is_some());
//! ```

use regex::Regex;

use crate::context::Context;
use crate::error::{Result, RouterError};
use crate::func::{FnList, Func};
use crate::method::Method;
use crate::route::PatternSource;

/// A name in a positional argument that could otherwise be a pattern.
///
/// Plain strings are always patterns; wrap a name in `sym` to mark it as one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shorthand for [`Symbol`]
pub fn sym(name: impl Into<String>) -> Symbol {
    Symbol(name.into())
}

/// One positional argument: a pattern or a name
#[derive(Debug, Clone)]
pub enum RouteArg {
    Pattern(PatternSource),
    Name(Symbol),
}

impl RouteArg {
    fn describe(&self) -> String {
        match self {
            RouteArg::Pattern(PatternSource::Literal(source)) => format!("pattern `{}`", source),
            RouteArg::Pattern(PatternSource::Regex(regex)) => format!("pattern `{}`", regex),
            RouteArg::Name(name) => format!("name `{}`", name.as_str()),
        }
    }
}

impl From<&str> for RouteArg {
    fn from(source: &str) -> Self {
        RouteArg::Pattern(source.into())
    }
}

impl From<String> for RouteArg {
    fn from(source: String) -> Self {
        RouteArg::Pattern(source.into())
    }
}

impl From<Regex> for RouteArg {
    fn from(regex: Regex) -> Self {
        RouteArg::Pattern(regex.into())
    }
}

impl From<Symbol> for RouteArg {
    fn from(name: Symbol) -> Self {
        RouteArg::Name(name)
    }
}

/// Pattern and optional name of a route or namespace
#[derive(Debug, Clone, Default)]
pub struct RouteArgs {
    pub pattern: Option<PatternSource>,
    pub name: Option<String>,
}

/// Anything accepted as the leading arguments of `get`, `namespace` and friends.
///
/// A pair is disambiguated by type, in either order: `("foo", sym("foo"))`
/// and `(sym("foo"), "foo")` are the same declaration.
pub trait IntoRouteArgs {
    fn into_route_args(self) -> Result<RouteArgs>;
}

impl IntoRouteArgs for &str {
    fn into_route_args(self) -> Result<RouteArgs> {
        Ok(RouteArgs {
            pattern: Some(self.into()),
            name: None,
        })
    }
}

impl IntoRouteArgs for String {
    fn into_route_args(self) -> Result<RouteArgs> {
        Ok(RouteArgs {
            pattern: Some(self.into()),
            name: None,
        })
    }
}

impl IntoRouteArgs for Regex {
    fn into_route_args(self) -> Result<RouteArgs> {
        Ok(RouteArgs {
            pattern: Some(self.into()),
            name: None,
        })
    }
}

impl IntoRouteArgs for Symbol {
    fn into_route_args(self) -> Result<RouteArgs> {
        Ok(RouteArgs {
            pattern: None,
            name: Some(self.0),
        })
    }
}

impl<A: Into<RouteArg>, B: Into<RouteArg>> IntoRouteArgs for (A, B) {
    fn into_route_args(self) -> Result<RouteArgs> {
        match (self.0.into(), self.1.into()) {
            (RouteArg::Name(name), RouteArg::Pattern(pattern))
            | (RouteArg::Pattern(pattern), RouteArg::Name(name)) => Ok(RouteArgs {
                pattern: Some(pattern),
                name: Some(name.0),
            }),
            (first, second) => Err(RouterError::AmbiguousArguments {
                detail: format!(
                    "expected one pattern and one name, got {} and {}",
                    first.describe(),
                    second.describe()
                ),
            }),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct RouteDecl {
    pub(crate) method: Method,
    pub(crate) args: Result<RouteArgs>,
    pub(crate) primary: FnList,
    pub(crate) before: FnList,
    pub(crate) after: FnList,
}

#[derive(Debug, Clone)]
pub(crate) struct HandlerDecl {
    pub(crate) name: Option<String>,
    pub(crate) code: Option<u16>,
    pub(crate) primary: FnList,
    pub(crate) before: FnList,
    pub(crate) after: FnList,
}

#[derive(Debug, Clone)]
pub(crate) enum ScopeKind {
    Group,
    Namespace,
    Expansion { template: String },
}

#[derive(Debug, Clone)]
pub(crate) struct ScopeDecl {
    pub(crate) kind: ScopeKind,
    pub(crate) args: Result<RouteArgs>,
    pub(crate) body: SetBuilder,
    pub(crate) before: FnList,
    pub(crate) after: FnList,
}

#[derive(Debug, Clone)]
pub(crate) enum Decl {
    Func { name: String, func: Func },
    Route(RouteDecl),
    Handler(HandlerDecl),
    Scope(ScopeDecl),
    Template { name: String, body: SetBuilder },
    Action { name: String, funcs: FnList },
}

// ============================================================================
// Builders
// ============================================================================

/// Records route set declarations in order
#[derive(Debug, Clone)]
pub struct SetBuilder {
    pub(crate) decls: Vec<Decl>,
}

impl SetBuilder {
    pub fn new() -> Self {
        Self { decls: Vec::new() }
    }

    /// Registers a function under `name`
    ///
    /// Later declarations can reference it by name (`.to("name")`,
    /// `.before(["name"])`). Registering the same name again only affects
    /// declarations that follow.
    pub fn func<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.register(name, Func::new(f))
    }

    /// Registers an existing function value under `name`
    pub fn register(&mut self, name: impl Into<String>, func: Func) -> &mut Self {
        self.decls.push(Decl::Func {
            name: name.into(),
            func,
        });
        self
    }

    /// Declares a route for `method`
    pub fn route(&mut self, method: Method, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.push_route(RouteDecl {
            method,
            args: args.into_route_args(),
            primary: FnList::new(),
            before: FnList::new(),
            after: FnList::new(),
        })
    }

    pub fn get(&mut self, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.route(Method::Get, args)
    }

    pub fn post(&mut self, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.route(Method::Post, args)
    }

    pub fn put(&mut self, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.route(Method::Put, args)
    }

    pub fn patch(&mut self, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.route(Method::Patch, args)
    }

    pub fn delete(&mut self, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.route(Method::Delete, args)
    }

    pub fn head(&mut self, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.route(Method::Head, args)
    }

    pub fn options(&mut self, args: impl IntoRouteArgs) -> RouteBuilder<'_> {
        self.route(Method::Options, args)
    }

    /// Declares the GET route for the set's root (`/`, or the namespace prefix).
    /// The route is named `default`.
    pub fn default(&mut self) -> RouteBuilder<'_> {
        self.push_route(RouteDecl {
            method: Method::Get,
            args: Ok(RouteArgs {
                pattern: Some(PatternSource::Literal(String::new())),
                name: Some("default".to_string()),
            }),
            primary: FnList::new(),
            before: FnList::new(),
            after: FnList::new(),
        })
    }

    /// Declares an error handler for a status code; chain `.name()` to make it
    /// retrievable by name as well
    pub fn handler(&mut self, code: u16) -> HandlerBuilder<'_> {
        self.push_handler(None, Some(code))
    }

    /// Declares an error handler by name only
    pub fn handler_named(&mut self, name: impl Into<String>) -> HandlerBuilder<'_> {
        self.push_handler(Some(name.into()), None)
    }

    /// Declares a named group: same paths, shared hooks, its own lookup scope
    pub fn group<F>(&mut self, name: impl Into<String>, body: F) -> ScopeBuilder<'_>
    where
        F: FnOnce(&mut SetBuilder),
    {
        let args = Ok(RouteArgs {
            pattern: None,
            name: Some(name.into()),
        });
        self.push_scope(ScopeKind::Group, args, body)
    }

    /// Declares a namespace: a group whose routes are prefixed with a path
    ///
    /// Accepts `"prefix"`, `("prefix", sym("name"))` or `(sym("name"), "prefix")`.
    pub fn namespace<F>(&mut self, args: impl IntoRouteArgs, body: F) -> ScopeBuilder<'_>
    where
        F: FnOnce(&mut SetBuilder),
    {
        self.push_scope(ScopeKind::Namespace, args.into_route_args(), body)
    }

    /// Stores a reusable, uninstantiated blueprint of routes
    ///
    /// Inside the body, `action(name, default)` declares an extension point;
    /// routes reference actions by name just like registered functions.
    pub fn template<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut SetBuilder),
    {
        let mut template = SetBuilder::new();
        body(&mut template);
        self.decls.push(Decl::Template {
            name: name.into(),
            body: template,
        });
        self
    }

    /// Instantiates a template as a namespace named `name` under `prefix`
    ///
    /// The body binds actions with `action(name, funcs)` and may declare
    /// further routes of its own.
    pub fn expand<F>(
        &mut self,
        template: impl Into<String>,
        name: impl Into<String>,
        prefix: impl Into<String>,
        body: F,
    ) -> ScopeBuilder<'_>
    where
        F: FnOnce(&mut SetBuilder),
    {
        let args = Ok(RouteArgs {
            pattern: Some(PatternSource::Literal(prefix.into())),
            name: Some(name.into()),
        });
        let kind = ScopeKind::Expansion {
            template: template.into(),
        };
        self.push_scope(kind, args, body)
    }

    /// Declares a template action (with a default) or binds one in an expansion
    pub fn action(&mut self, name: impl Into<String>, funcs: impl Into<FnList>) -> &mut Self {
        self.decls.push(Decl::Action {
            name: name.into(),
            funcs: funcs.into(),
        });
        self
    }

    fn push_route(&mut self, decl: RouteDecl) -> RouteBuilder<'_> {
        self.decls.push(Decl::Route(decl));
        match self.decls.last_mut() {
            Some(Decl::Route(decl)) => RouteBuilder { decl },
            _ => unreachable!("route declaration was just pushed"),
        }
    }

    fn push_handler(&mut self, name: Option<String>, code: Option<u16>) -> HandlerBuilder<'_> {
        self.decls.push(Decl::Handler(HandlerDecl {
            name,
            code,
            primary: FnList::new(),
            before: FnList::new(),
            after: FnList::new(),
        }));
        match self.decls.last_mut() {
            Some(Decl::Handler(decl)) => HandlerBuilder { decl },
            _ => unreachable!("handler declaration was just pushed"),
        }
    }

    fn push_scope<F>(&mut self, kind: ScopeKind, args: Result<RouteArgs>, body: F) -> ScopeBuilder<'_>
    where
        F: FnOnce(&mut SetBuilder),
    {
        let mut nested = SetBuilder::new();
        body(&mut nested);
        self.decls.push(Decl::Scope(ScopeDecl {
            kind,
            args,
            body: nested,
            before: FnList::new(),
            after: FnList::new(),
        }));
        match self.decls.last_mut() {
            Some(Decl::Scope(decl)) => ScopeBuilder { decl },
            _ => unreachable!("scope declaration was just pushed"),
        }
    }
}

/// Chainable configuration of one route
pub struct RouteBuilder<'a> {
    decl: &'a mut RouteDecl,
}

impl<'a> RouteBuilder<'a> {
    /// Names the route, replacing a name given positionally
    pub fn name(self, name: impl Into<String>) -> Self {
        if let Ok(args) = &mut self.decl.args {
            args.name = Some(name.into());
        }
        self
    }

    /// Appends to the primary chain
    pub fn to(self, funcs: impl Into<FnList>) -> Self {
        self.decl.primary.extend(funcs.into());
        self
    }

    /// Appends a closure to the primary chain
    pub fn run<F>(self, f: F) -> Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.decl.primary.push(Func::new(f));
        self
    }

    /// Appends hooks that run before the primary chain
    pub fn before(self, funcs: impl Into<FnList>) -> Self {
        self.decl.before.extend(funcs.into());
        self
    }

    /// Appends hooks that run after the primary chain
    pub fn after(self, funcs: impl Into<FnList>) -> Self {
        self.decl.after.extend(funcs.into());
        self
    }
}

/// Chainable configuration of one error handler
pub struct HandlerBuilder<'a> {
    decl: &'a mut HandlerDecl,
}

impl<'a> HandlerBuilder<'a> {
    pub fn name(self, name: impl Into<String>) -> Self {
        self.decl.name = Some(name.into());
        self
    }

    pub fn code(self, code: u16) -> Self {
        self.decl.code = Some(code);
        self
    }

    pub fn to(self, funcs: impl Into<FnList>) -> Self {
        self.decl.primary.extend(funcs.into());
        self
    }

    pub fn run<F>(self, f: F) -> Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.decl.primary.push(Func::new(f));
        self
    }

    pub fn before(self, funcs: impl Into<FnList>) -> Self {
        self.decl.before.extend(funcs.into());
        self
    }

    pub fn after(self, funcs: impl Into<FnList>) -> Self {
        self.decl.after.extend(funcs.into());
        self
    }
}

/// Chainable hooks of a group, namespace or expansion.
///
/// Scope hooks wrap every chain declared inside, route-local hooks included.
pub struct ScopeBuilder<'a> {
    decl: &'a mut ScopeDecl,
}

impl<'a> ScopeBuilder<'a> {
    pub fn before(self, funcs: impl Into<FnList>) -> Self {
        self.decl.before.extend(funcs.into());
        self
    }

    pub fn after(self, funcs: impl Into<FnList>) -> Self {
        self.decl.after.extend(funcs.into());
        self
    }
}
