// File: src/set.rs
// Purpose: Compiled route sets: build-time replay of declarations, matching and named queries

use std::collections::HashMap;

use crate::builder::{Decl, HandlerDecl, RouteArgs, RouteDecl, ScopeDecl, ScopeKind, SetBuilder};
use crate::error::{Result, RouterError};
use crate::func::{FnList, FnRef, Func, FunctionRegistry};
use crate::method::Method;
use crate::path;
use crate::route::{Captures, Handler, HandlerKey, PatternSource, Route, RouteMatch, RoutePattern};

/// What kind of scope produced a set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetKind {
    /// Top-level set registered on a router (or built standalone)
    Root,
    /// Named sub-scope sharing its parent's paths
    Group,
    /// Named sub-scope whose routes live under `prefix`
    Namespace { prefix: String },
}

/// Routes, handlers and functions of one routing context, plus nested
/// groups and namespaces.
///
/// Built once and read-only afterwards; every chain it holds is fully
/// resolved.
#[derive(Debug, Clone)]
pub struct RouteSet {
    name: Option<String>,
    kind: SetKind,
    routes: Vec<Route>,
    handlers: Vec<Handler>,
    functions: FunctionRegistry,
    templates: HashMap<String, SetBuilder>,
    children: Vec<RouteSet>,
    case_insensitive: bool,
    next_order: usize,
}

impl Default for RouteSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Action slots of one expansion
#[derive(Debug, Clone)]
struct Actions {
    template: String,
    slots: HashMap<String, FnList>,
}

impl Actions {
    /// Template defaults first, then the expansion's bindings on top
    fn collect(template: &str, skeleton: &SetBuilder, bindings: &SetBuilder) -> Self {
        let mut slots = HashMap::new();
        for decl in skeleton.decls.iter().chain(bindings.decls.iter()) {
            if let Decl::Action { name, funcs } = decl {
                slots.insert(name.clone(), funcs.clone());
            }
        }
        Self {
            template: template.to_string(),
            slots,
        }
    }

    /// `None` when `name` is not an action of this expansion
    fn resolve(&self, name: &str, registry: &FunctionRegistry) -> Option<Result<Vec<Func>>> {
        let funcs = self.slots.get(name)?;
        if funcs.is_empty() {
            return Some(Err(RouterError::UnboundAction {
                template: self.template.clone(),
                action: name.to_string(),
            }));
        }
        Some(registry.resolve_all(funcs))
    }
}

/// Inherited state while replaying declarations
#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: String,
    before: Vec<Func>,
    after: Vec<Func>,
    actions: Option<Actions>,
    /// Whether `action` is legal at this level
    binds_actions: bool,
}

impl RouteSet {
    /// Creates an empty top-level set
    pub fn new() -> Self {
        Self {
            name: None,
            kind: SetKind::Root,
            routes: Vec::new(),
            handlers: Vec::new(),
            functions: FunctionRegistry::new(),
            templates: HashMap::new(),
            children: Vec::new(),
            case_insensitive: false,
            next_order: 0,
        }
    }

    /// Builds a set from a declaration body
    ///
    /// Fails on the first pattern that does not compile or reference that
    /// does not resolve.
    pub fn build<F>(body: F) -> Result<Self>
    where
        F: FnOnce(&mut SetBuilder),
    {
        let mut set = Self::new();
        set.eval(body)?;
        Ok(set)
    }

    /// Compares static segments ASCII-case-insensitively. Groups and
    /// namespaces declared afterwards inherit the setting.
    pub fn with_case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Adds declarations to this set
    ///
    /// Functions and templates registered by earlier calls stay visible.
    /// On error the set is left exactly as it was.
    pub fn eval<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut SetBuilder),
    {
        let mut builder = SetBuilder::new();
        body(&mut builder);

        let scope = Scope {
            prefix: match &self.kind {
                SetKind::Namespace { prefix } => prefix.clone(),
                _ => String::new(),
            },
            ..Scope::default()
        };

        let mut staged = self.clone();
        let mut order = staged.next_order;
        staged.apply(&builder, &scope, &mut order)?;
        staged.next_order = order;
        *self = staged;

        tracing::debug!(
            "Built route set {}: {} routes, {} handlers, {} nested sets",
            self.name.as_deref().unwrap_or("<anonymous>"),
            self.routes.len(),
            self.handlers.len(),
            self.children.len()
        );
        Ok(())
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    // ------------------------------------------------------------------
    // Replay
    // ------------------------------------------------------------------

    fn apply(&mut self, builder: &SetBuilder, scope: &Scope, order: &mut usize) -> Result<()> {
        for decl in &builder.decls {
            match decl {
                Decl::Func { name, func } => {
                    if self.functions.register(name.clone(), func.clone()).is_some() {
                        tracing::debug!("Function {} re-registered", name);
                    }
                }
                Decl::Route(decl) => self.add_route(decl, scope, order)?,
                Decl::Handler(decl) => self.add_handler(decl, scope)?,
                Decl::Scope(decl) => self.add_scope(decl, scope, order)?,
                Decl::Template { name, body } => {
                    self.templates.insert(name.clone(), body.clone());
                }
                Decl::Action { name, .. } => {
                    if !scope.binds_actions {
                        return Err(RouterError::ActionOutsideTemplate {
                            action: name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn add_route(&mut self, decl: &RouteDecl, scope: &Scope, order: &mut usize) -> Result<()> {
        let args = decl.args.clone()?;
        let pattern = match require_pattern(&args)? {
            PatternSource::Literal(source) => {
                RoutePattern::literal(&path::join(&scope.prefix, &source))?
            }
            PatternSource::Regex(regex) => RoutePattern::regex(regex)?,
        };

        let chain = self.compose(&decl.before, &decl.primary, &decl.after, scope)?;

        tracing::trace!(
            "Compiled {} /{} ({} functions)",
            decl.method,
            pattern.source(),
            chain.len()
        );

        self.routes.push(Route {
            method: decl.method,
            pattern,
            name: args.name,
            chain,
            order: *order,
        });
        *order += 1;
        Ok(())
    }

    fn add_handler(&mut self, decl: &HandlerDecl, scope: &Scope) -> Result<()> {
        let chain = self.compose(&decl.before, &decl.primary, &decl.after, scope)?;
        self.handlers.push(Handler {
            name: decl.name.clone(),
            code: decl.code,
            chain,
        });
        Ok(())
    }

    fn add_scope(&mut self, decl: &ScopeDecl, scope: &Scope, order: &mut usize) -> Result<()> {
        let args = decl.args.clone()?;

        let mut before = scope.before.clone();
        before.extend(self.resolve(&decl.before, scope)?);
        let mut after = self.resolve(&decl.after, scope)?;
        after.extend(scope.after.iter().cloned());

        let mut inner = Scope {
            prefix: scope.prefix.clone(),
            before,
            after,
            actions: scope.actions.clone(),
            binds_actions: false,
        };

        let kind = match &decl.kind {
            ScopeKind::Group => SetKind::Group,
            ScopeKind::Namespace | ScopeKind::Expansion { .. } => {
                let prefix = match require_pattern(&args)? {
                    PatternSource::Literal(prefix) => prefix,
                    PatternSource::Regex(regex) => {
                        return Err(RouterError::InvalidPattern {
                            pattern: regex.as_str().to_string(),
                            reason: "namespace prefix must be a literal path".to_string(),
                        })
                    }
                };
                inner.prefix = path::join(&scope.prefix, &prefix);
                SetKind::Namespace {
                    prefix: inner.prefix.clone(),
                }
            }
        };

        let mut child = RouteSet {
            name: args.name,
            kind,
            routes: Vec::new(),
            handlers: Vec::new(),
            functions: self.functions.clone(),
            templates: self.templates.clone(),
            children: Vec::new(),
            case_insensitive: self.case_insensitive,
            next_order: 0,
        };

        match &decl.kind {
            ScopeKind::Expansion { template } => {
                let skeleton = self
                    .templates
                    .get(template)
                    .ok_or_else(|| RouterError::UnknownTemplate {
                        name: template.clone(),
                    })?;

                inner.actions = Some(Actions::collect(template, skeleton, &decl.body));
                inner.binds_actions = true;

                // Actions may bind functions the expansion body registers itself
                for body_decl in &decl.body.decls {
                    if let Decl::Func { name, func } = body_decl {
                        child.functions.register(name.clone(), func.clone());
                    }
                }

                tracing::debug!(
                    "Expanding template {} under /{}",
                    template,
                    inner.prefix
                );
                child.apply(skeleton, &inner, order)?;
                child.apply(&decl.body, &inner, order)?;
            }
            _ => child.apply(&decl.body, &inner, order)?,
        }

        self.children.push(child);
        Ok(())
    }

    /// Scope hooks wrap route hooks, which wrap the primary chain
    fn compose(
        &self,
        before: &FnList,
        primary: &FnList,
        after: &FnList,
        scope: &Scope,
    ) -> Result<Vec<Func>> {
        let mut chain = scope.before.clone();
        chain.extend(self.resolve(before, scope)?);
        chain.extend(self.resolve(primary, scope)?);
        chain.extend(self.resolve(after, scope)?);
        chain.extend(scope.after.iter().cloned());
        Ok(chain)
    }

    /// Resolves references against actions first, then the registry
    fn resolve(&self, funcs: &FnList, scope: &Scope) -> Result<Vec<Func>> {
        let mut chain = Vec::with_capacity(funcs.len());
        for func in funcs.iter() {
            if let (FnRef::Named(name), Some(actions)) = (func, &scope.actions) {
                if let Some(bound) = actions.resolve(name, &self.functions) {
                    chain.extend(bound?);
                    continue;
                }
            }
            chain.push(self.functions.resolve(func)?);
        }
        Ok(chain)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &SetKind {
        &self.kind
    }

    /// Path prefix shared by every route of this set
    pub fn prefix(&self) -> &str {
        match &self.kind {
            SetKind::Namespace { prefix } => prefix.as_str(),
            _ => "",
        }
    }

    /// Routes declared directly in this set, in declaration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// Groups, namespaces and expansions declared directly in this set
    pub fn children(&self) -> &[RouteSet] {
        &self.children
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Reads a registered function
    pub fn func(&self, name: &str) -> Option<&Func> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Matches a request against this set and every nested set
    ///
    /// Returns `None` when nothing matches. Otherwise the first match is the
    /// most specific one: static patterns beat parameterized ones, which beat
    /// regular expressions; equal specificity falls back to declaration order.
    pub fn match_route(&self, path: &str, method: Method) -> Option<Vec<RouteMatch>> {
        let path = path::normalize(path);
        let mut found = Vec::new();
        self.collect_matches(&path, method, &mut found);

        if found.is_empty() {
            return None;
        }

        found.sort_by_key(|(route, _)| (route.pattern.kind(), route.order));
        Some(
            found
                .into_iter()
                .map(|(route, captures)| route.to_match(captures))
                .collect(),
        )
    }

    fn collect_matches<'s>(
        &'s self,
        path: &str,
        method: Method,
        found: &mut Vec<(&'s Route, Captures)>,
    ) {
        for route in &self.routes {
            if route.method != method {
                continue;
            }
            if let Some(captures) = route.pattern.matches_with_options(path, self.case_insensitive) {
                found.push((route, captures));
            }
        }
        for child in &self.children {
            child.collect_matches(path, method, found);
        }
    }

    /// Finds a route by name in this set or any nested set
    ///
    /// When several routes share a name, the first declared wins.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.find_named(name, true)
    }

    /// Finds a handler by name or code
    ///
    /// Among handlers of one set the last declared wins; nested sets are only
    /// consulted when this set has no answer.
    pub fn handle(&self, key: impl Into<HandlerKey>) -> Option<&Handler> {
        let key = key.into();
        self.find_handler(&key)
    }

    fn find_handler(&self, key: &HandlerKey) -> Option<&Handler> {
        self.handlers
            .iter()
            .rev()
            .find(|handler| handler.answers(key))
            .or_else(|| self.children.iter().find_map(|child| child.find_handler(key)))
    }

    /// Finds a nested group or namespace by name, depth first
    pub fn group(&self, name: &str) -> Option<&RouteSet> {
        self.children.iter().find_map(|child| {
            if child.name.as_deref() == Some(name) {
                Some(child)
            } else {
                child.group(name)
            }
        })
    }

    /// Earliest declared route named `name`; namespaces are skipped unless
    /// `include_namespaces` is set
    pub(crate) fn find_named(&self, name: &str, include_namespaces: bool) -> Option<&Route> {
        let mut candidates = Vec::new();
        self.collect_named(name, include_namespaces, &mut candidates);
        candidates.into_iter().min_by_key(|route| route.order)
    }

    fn collect_named<'s>(&'s self, name: &str, include_namespaces: bool, out: &mut Vec<&'s Route>) {
        out.extend(self.routes.iter().filter(|route| route.name() == Some(name)));
        for child in &self.children {
            if include_namespaces || !matches!(child.kind, SetKind::Namespace { .. }) {
                child.collect_named(name, include_namespaces, out);
            }
        }
    }
}

fn require_pattern(args: &RouteArgs) -> Result<PatternSource> {
    args.pattern
        .clone()
        .ok_or_else(|| RouterError::MissingPattern {
            name: args.name.clone().unwrap_or_default(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::sym;

    #[test]
    fn test_failed_eval_leaves_set_untouched() {
        let mut set = RouteSet::build(|s| {
            s.get("a").name("a");
        })
        .unwrap();

        let err = set
            .eval(|s| {
                s.get("b").name("b");
                s.get("c").to("missing");
            })
            .unwrap_err();

        assert!(matches!(err, RouterError::UnknownFunction { .. }));
        assert_eq!(set.routes().len(), 1);
        assert!(set.route("b").is_none());
    }

    #[test]
    fn test_eval_keeps_registry_and_order() {
        let mut set = RouteSet::build(|s| {
            s.func("f", |_| {});
            s.get(":any").name("param");
        })
        .unwrap();

        set.eval(|s| {
            s.get("x/:any").to("f").name("later");
        })
        .unwrap();

        let later = set.route("later").unwrap();
        assert_eq!(later.order, 1);
        assert!(later.chain()[0].ptr_eq(set.func("f").unwrap()));
    }

    #[test]
    fn test_namespace_prefix_nests() {
        let set = RouteSet::build(|s| {
            s.namespace(("api", sym("api")), |api| {
                api.namespace(("v1", sym("v1")), |v1| {
                    v1.get("users/:id").name("user");
                });
            });
        })
        .unwrap();

        let v1 = set.group("v1").unwrap();
        assert_eq!(v1.prefix(), "api/v1");
        assert_eq!(set.route("user").unwrap().path(), "api/v1/users/:id");
    }

    #[test]
    fn test_regex_namespace_prefix_rejected() {
        let err = RouteSet::build(|s| {
            s.namespace(regex::Regex::new("a+").unwrap(), |_| {});
        })
        .unwrap_err();

        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_name_only_route_rejected() {
        let err = RouteSet::build(|s| {
            s.get(sym("lonely"));
        })
        .unwrap_err();

        assert_eq!(
            err,
            RouterError::MissingPattern {
                name: "lonely".to_string()
            }
        );
    }
}
