/// Configuration loading from switchback.toml

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use switchback::{BasicRequest, BasicResponse, Outcome, Router, RouterConfig};

fn write_config(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("switchback-config-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_routing_section() {
    let path = write_config(
        "routing.toml",
        r#"
            [routing]
            case_insensitive = true
            max_reroutes = 2
            not_found_code = 410
        "#,
    );

    let config = RouterConfig::load(&path).unwrap();
    assert!(config.routing.case_insensitive);
    assert_eq!(config.routing.max_reroutes, Some(2));
    assert_eq!(config.routing.not_found_code, 410);
}

#[test]
fn test_empty_file_uses_defaults() {
    let path = write_config("empty.toml", "   \n");
    let config = RouterConfig::load(&path).unwrap();

    assert!(!config.routing.case_insensitive);
    assert_eq!(config.routing.max_reroutes, None);
    assert_eq!(config.routing.not_found_code, 404);
}

#[test]
fn test_invalid_file_reports_path() {
    let path = write_config("invalid.toml", "[routing\nmax_reroutes = ");
    let err = RouterConfig::load(&path).unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("invalid.toml"));
    assert!(message.contains("[routing]"));
}

#[test]
fn test_unreadable_path_is_an_error() {
    let dir = write_config("placeholder.toml", "").with_file_name("as-dir.toml");
    fs::create_dir_all(&dir).unwrap();

    let err = RouterConfig::load(&dir).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read router config"));
}

#[test]
fn test_loaded_config_drives_router() {
    let path = write_config(
        "router.toml",
        r#"
            [routing]
            case_insensitive = true
        "#,
    );

    let mut router = Router::with_config(RouterConfig::load(&path).unwrap());
    router
        .set("app", |s| {
            s.get("Home").name("home");
        })
        .unwrap();

    let mut request = BasicRequest::get("/home");
    let mut response = BasicResponse::default();
    let outcome = router.dispatch(&mut request, &mut response).unwrap();

    assert_eq!(
        outcome,
        Outcome::Routed {
            set: "app".to_string(),
            route: Some("home".to_string())
        }
    );
}
