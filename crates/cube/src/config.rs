// File: src/config.rs
// Purpose: Configuration parsing from cube.toml

use anyhow::{Context, Result};
use cube_db::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config file the CLI reads when `--config` is not given
pub const CONFIG_FILE: &str = "cube.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingConfig {
    /// Route table, relative to the config file (default: "routes.toml")
    #[serde(default = "default_routes_file")]
    pub routes_file: String,

    /// Whether route templates ignore case (default: false)
    #[serde(default)]
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

// Default values
fn default_name() -> String {
    "cube-app".to_string()
}

fn default_routes_file() -> String {
    "routes.toml".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            routes_file: default_routes_file(),
            case_insensitive: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply `DATABASE_URL` from `.env` or the environment
    pub fn with_env(self) -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").ok();
        self.with_database_url(url)
    }

    /// Replace the configured database URL when `url` is set
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.database.url = Some(url);
        }
        self
    }

    /// Route table location; relative paths resolve against `base_dir`
    pub fn routes_path(&self, base_dir: &Path) -> PathBuf {
        let routes = Path::new(&self.routing.routes_file);
        if routes.is_absolute() {
            routes.to_path_buf()
        } else {
            base_dir.join(routes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app.name, "cube-app");
        assert_eq!(config.routing.routes_file, "routes.toml");
        assert!(!config.routing.case_insensitive);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            [routing]
            case_insensitive = true

            [database]
            url = "sqlite::memory:"
            timestamp_column = "modified_at"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.routing.case_insensitive);
        assert_eq!(config.routing.routes_file, "routes.toml");
        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.database.timestamp_column(), Some("modified_at"));
        assert_eq!(config.app, AppConfig::default());
    }

    #[test]
    fn test_database_url_override() {
        let config = Config::default().with_database_url(Some("postgres://db/app".to_string()));
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/app"));

        let unchanged = config.clone().with_database_url(Some("  ".to_string()));
        assert_eq!(unchanged, config);

        let unchanged = config.clone().with_database_url(None);
        assert_eq!(unchanged, config);
    }

    #[test]
    fn test_routes_path() {
        let config = Config::default();
        assert_eq!(
            config.routes_path(Path::new("/srv/app")),
            PathBuf::from("/srv/app/routes.toml")
        );
    }
}
