// File: src/config.rs
// Purpose: Configuration parsing from switchback.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouterConfig {
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Whether static path segments compare case-insensitively (default: false)
    #[serde(default = "default_false")]
    pub case_insensitive: bool,

    /// Re-routes allowed while dispatching one request (default: unlimited)
    #[serde(default)]
    pub max_reroutes: Option<usize>,

    /// Status code of the handler run when no route matches (default: 404)
    #[serde(default = "default_not_found_code")]
    pub not_found_code: u16,
}

// Default values
fn default_false() -> bool {
    false
}

fn default_not_found_code() -> u16 {
    404
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            max_reroutes: None,
            not_found_code: default_not_found_code(),
        }
    }
}

/// File read by [`RouterConfig::load_default`]
pub const DEFAULT_CONFIG_FILE: &str = "switchback.toml";

impl RouterConfig {
    /// Reads router settings from a TOML file
    ///
    /// A missing or blank file yields the defaults; only the `[routing]`
    /// table is read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No router config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read router config {}", path.display()))
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RouterConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid [routing] settings in {}", path.display()))?;

        tracing::debug!(
            "Loaded router config from {} (case_insensitive: {}, max_reroutes: {:?}, not_found_code: {})",
            path.display(),
            config.routing.case_insensitive,
            config.routing.max_reroutes,
            config.routing.not_found_code
        );
        Ok(config)
    }

    /// Reads `./switchback.toml`
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert!(!config.routing.case_insensitive);
        assert_eq!(config.routing.max_reroutes, None);
        assert_eq!(config.routing.not_found_code, 404);
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<RouterConfig>("").unwrap_or_default();
        assert_eq!(config.routing.not_found_code, 404);
    }

    #[test]
    fn test_custom_routing() {
        let toml = r#"
            [routing]
            case_insensitive = true
            max_reroutes = 8
        "#;
        let config: RouterConfig = toml::from_str(toml).unwrap();
        assert!(config.routing.case_insensitive);
        assert_eq!(config.routing.max_reroutes, Some(8));
        assert_eq!(config.routing.not_found_code, 404);
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(DEFAULT_CONFIG_FILE, "switchback.toml");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = RouterConfig::load("does/not/exist/switchback.toml").unwrap();
        assert_eq!(config.routing.not_found_code, 404);
    }
}
