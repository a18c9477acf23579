/// Reverse lookup of named routes
///
/// Path generation, parameter substitution and group/namespace scoping.

use pretty_assertions::assert_eq;
use rstest::rstest;
use switchback::{sym, RouteLookup, Router};

fn router() -> Router {
    let mut router = Router::new();
    router
        .set("test", |s| {
            s.get(("foo", sym("foo")));
            s.get(("foo/:id", sym("foo1")));
            s.get(("foo/bar/:id", sym("foo2")));
            s.get(("posts/:year/:slug", sym("post")));
            s.default();

            s.group("grp", |g| {
                g.get(("bar", sym("bar")));
            });

            s.namespace(("ns", sym("ns")), |ns| {
                ns.get(("bar", sym("ns_bar")));
                ns.get(("items/:id", sym("foo1")));
                ns.group("inner", |inner| {
                    inner.get(("deep", sym("deep")));
                });
            });
        })
        .unwrap();
    router
}

#[test]
fn test_get_path_for_named_route() {
    let router = router();
    assert_eq!(RouteLookup::new(&router).path("foo").as_deref(), Some("/foo"));
}

#[test]
fn test_default_route_path() {
    let router = router();
    assert_eq!(router.lookup().path("default").as_deref(), Some("/"));
}

#[rstest]
#[case("foo1", "/foo/1")]
#[case("foo2", "/foo/bar/1")]
fn test_path_can_be_populated(#[case] name: &str, #[case] expected: &str) {
    let router = router();
    assert_eq!(
        router.lookup().path_with(name, [("id", 1)]).as_deref(),
        Some(expected)
    );
}

#[test]
fn test_params_in_any_order_and_extras_ignored() {
    let router = router();
    let path = router.lookup().path_with(
        "post",
        vec![("slug", "hello"), ("unused", "x"), ("year", "2024")],
    );
    assert_eq!(path.as_deref(), Some("/posts/2024/hello"));
}

#[test]
fn test_missing_param_yields_none() {
    let router = router();
    assert_eq!(router.lookup().path("foo1"), None);
}

#[test]
fn test_reserved_characters_are_encoded() {
    let router = router();
    let path = router.lookup().path_with("foo1", [("id", "a/b?c")]);
    assert_eq!(path.as_deref(), Some("/foo/a%2Fb%3Fc"));
}

#[test]
fn test_unknown_name_yields_none() {
    let router = router();
    assert_eq!(router.lookup().path("nope"), None);
}

#[test]
fn test_grouped_routes_can_be_looked_up_by_name_and_group() {
    let router = router();
    let lookup = router.lookup();

    assert_eq!(lookup.group("grp").path("bar").as_deref(), Some("/bar"));
    assert_eq!(lookup.path("bar").as_deref(), Some("/bar"));
}

#[test]
fn test_namespaced_routes_can_be_looked_up_by_name_and_group() {
    let router = router();
    let lookup = router.lookup();

    assert_eq!(lookup.group("ns").path("ns_bar").as_deref(), Some("/ns/bar"));
    assert_eq!(lookup.path("ns_bar"), None);
}

#[test]
fn test_group_scope_prefers_its_own_routes() {
    let router = router();
    let lookup = router.lookup();

    assert_eq!(
        lookup.path_with("foo1", [("id", 5)]).as_deref(),
        Some("/foo/5")
    );
    assert_eq!(
        lookup.group("ns").path_with("foo1", [("id", 5)]).as_deref(),
        Some("/ns/items/5")
    );
}

#[test]
fn test_group_scope_includes_descendants() {
    let router = router();

    assert_eq!(
        router.lookup().group("ns").path("deep").as_deref(),
        Some("/ns/deep")
    );
    assert_eq!(
        router.lookup().group("inner").path("deep").as_deref(),
        Some("/ns/deep")
    );
    assert_eq!(router.lookup().path("deep"), None);
}

#[test]
fn test_unknown_group_yields_none() {
    let router = router();
    assert_eq!(router.lookup().group("missing").path("foo"), None);
}
