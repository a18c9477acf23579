// File: src/lookup.rs
// Purpose: Reverse lookup, generating request paths from route names

use std::collections::HashMap;

use crate::route::{Route, Segment};
use crate::router::Router;

/// Generates paths for named routes.
///
/// An unscoped lookup sees top-level routes and routes inside groups, but
/// not routes inside namespaces; scope it with [`RouteLookup::group`] to
/// reach those.
///
/// ```
/// use switchback::{sym, Router};
///
/// let mut router = Router::new();
/// router
///     .set("app", |s| {
///         s.get(("foo/:id", sym("foo")));
///         s.namespace(("admin", sym("admin")), |admin| {
///             admin.get(("foo/:id", sym("foo")));
///         });
///     })
///     .unwrap();
///
/// let lookup = router.lookup();
/// assert_eq!(lookup.path_with("foo", [("id", 1)]).as_deref(), Some("/foo/1"));
/// assert_eq!(
///     lookup.group("admin").path_with("foo", [("id", 1)]).as_deref(),
///     Some("/admin/foo/1")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RouteLookup<'r> {
    router: &'r Router,
    group: Option<String>,
}

impl<'r> RouteLookup<'r> {
    pub fn new(router: &'r Router) -> Self {
        Self {
            router,
            group: None,
        }
    }

    /// Lookup restricted to the group or namespace named `name`
    pub fn group(&self, name: impl Into<String>) -> Self {
        Self {
            router: self.router,
            group: Some(name.into()),
        }
    }

    /// Path of a route without captures
    pub fn path(&self, name: &str) -> Option<String> {
        self.path_with(name, std::iter::empty::<(&str, &str)>())
    }

    /// Path of a route with its captures filled from `params`
    ///
    /// Values are percent-encoded. Returns `None` when no route has this
    /// name, when a capture has no value, or when the route is a regular
    /// expression. Extra params are ignored.
    pub fn path_with<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let route = match self.find(name) {
            Some(route) => route,
            None => {
                tracing::debug!("No route named {} to generate a path for", name);
                return None;
            }
        };

        let params: HashMap<String, String> = params
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.to_string()))
            .collect();

        fill(route, &params)
    }

    fn find(&self, name: &str) -> Option<&'r Route> {
        let router: &'r Router = self.router;
        match &self.group {
            Some(group) => router
                .sets()
                .filter_map(|set| set.group(group))
                .find_map(|scope| scope.find_named(name, true)),
            None => router.sets().find_map(|set| set.find_named(name, false)),
        }
    }
}

fn fill(route: &Route, params: &HashMap<String, String>) -> Option<String> {
    let segments = route.pattern().segments()?;

    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Static(value) => parts.push(value.clone()),
            Segment::Param(name) => {
                let value = params.get(name)?;
                parts.push(urlencoding::encode(value).into_owned());
            }
        }
    }

    Some(format!("/{}", parts.join("/")))
}
