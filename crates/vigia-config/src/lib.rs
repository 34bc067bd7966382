//! Configuration for the vigia dashboard.
//!
//! A single TOML file merged with `VIGIA_*` environment variables
//! (environment wins), translated into `vigia_core::MonitorConfig`. The
//! TUI layers its CLI flags on top of the result.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use vigia_core::{MonitorConfig, SNAPSHOT_FILE};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Top-level configuration, as read from `config.toml` / environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL (e.g. `http://monitor.example.com`).
    pub backend: Option<String>,

    /// Seconds between refresh cycles.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Snapshot file override; defaults to the platform cache dir.
    pub snapshot_path: Option<PathBuf>,

    /// Log file override.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: None,
            refresh_secs: default_refresh_secs(),
            timeout_secs: default_timeout_secs(),
            insecure: false,
            snapshot_path: None,
            log_file: None,
        }
    }
}

fn default_refresh_secs() -> u64 {
    15 * 60
}
fn default_timeout_secs() -> u64 {
    30
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "vigia", "vigia")
}

/// Resolve the config file path via platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("vigia.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default snapshot location: the platform cache dir.
pub fn default_snapshot_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(SNAPSHOT_FILE),
        |dirs| dirs.cache_dir().join(SNAPSHOT_FILE),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load configuration from the default path merged with `VIGIA_*`
/// environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration from an explicit TOML path. A missing file is not
/// an error — defaults plus environment apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VIGIA_"));
    Ok(figment.extract()?)
}

/// Translate a loaded config into a `MonitorConfig`, validating the
/// backend URL.
pub fn to_monitor_config(config: &Config) -> Result<MonitorConfig, ConfigError> {
    let raw = config.backend.as_deref().ok_or_else(|| ConfigError::Validation {
        field: "backend".into(),
        reason: "no backend URL configured (flag, VIGIA_BACKEND, or config file)".into(),
    })?;
    let base_url: Url = raw.parse().map_err(|e| ConfigError::Validation {
        field: "backend".into(),
        reason: format!("{e}"),
    })?;

    Ok(MonitorConfig {
        base_url,
        refresh_interval: Duration::from_secs(config.refresh_secs),
        timeout: Duration::from_secs(config.timeout_secs),
        danger_accept_invalid_certs: config.insecure,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        figment::Jail::expect_with(|jail| {
            let path = jail.directory().join("config.toml");
            let config = load_config_from(&path).expect("load");
            assert!(config.backend.is_none());
            assert_eq!(config.refresh_secs, 900);
            assert_eq!(config.timeout_secs, 30);
            assert!(!config.insecure);
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    backend = "http://monitor.internal"
                    refresh_secs = 300
                "#,
            )?;
            let config = load_config_from(Path::new("config.toml")).expect("load");
            assert_eq!(config.backend.as_deref(), Some("http://monitor.internal"));
            assert_eq!(config.refresh_secs, 300);
            assert_eq!(config.timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn environment_wins_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", r#"refresh_secs = 300"#)?;
            jail.set_env("VIGIA_REFRESH_SECS", "60");
            jail.set_env("VIGIA_BACKEND", "http://from-env");
            let config = load_config_from(Path::new("config.toml")).expect("load");
            assert_eq!(config.refresh_secs, 60);
            assert_eq!(config.backend.as_deref(), Some("http://from-env"));
            Ok(())
        });
    }

    #[test]
    fn monitor_config_requires_backend() {
        let config = Config::default();
        assert!(matches!(
            to_monitor_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn monitor_config_translation() {
        let config = Config {
            backend: Some("http://monitor.internal".into()),
            refresh_secs: 120,
            timeout_secs: 5,
            insecure: true,
            ..Config::default()
        };
        let monitor = to_monitor_config(&config).unwrap();
        assert_eq!(monitor.base_url.as_str(), "http://monitor.internal/");
        assert_eq!(monitor.refresh_interval, Duration::from_secs(120));
        assert_eq!(monitor.timeout, Duration::from_secs(5));
        assert!(monitor.danger_accept_invalid_certs);
    }

    #[test]
    fn invalid_backend_url_is_rejected() {
        let config = Config {
            backend: Some("not a url".into()),
            ..Config::default()
        };
        assert!(matches!(
            to_monitor_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }
}
