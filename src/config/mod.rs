//! Configuration module for the hub
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`HOMELAB_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use homelab::config::HubConfig;
//!
//! let config = HubConfig::default();
//! assert_eq!(config.server.port, 3000);
//!
//! let toml = r#"
//! [services.sonarr]
//! url = "http://nas:8989"
//! api_key = "secret"
//! "#;
//! let config: HubConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.services.sonarr.base_url(), Some("http://nas:8989"));
//! ```

pub mod error;
pub mod logging;
pub mod server;
pub mod services;
pub mod timeouts;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use services::{ApiServiceConfig, MinecraftConfig, ServicesConfig};
pub use timeouts::TimeoutConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where user settings are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsStoreConfig {
    /// JSON file; settings live in memory only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Unified configuration for the hub.
///
/// Loaded once at process start and shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Log level and format
    pub logging: LoggingConfig,
    /// Upstream call timeouts
    pub timeouts: TimeoutConfig,
    /// Upstream endpoints and credentials
    pub services: ServicesConfig,
    /// Settings persistence
    pub settings: SettingsStoreConfig,
}

impl HubConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.message().to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `HOMELAB_*` environment variable overrides.
    ///
    /// Invalid numeric values are ignored (the previous value is kept).
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOMELAB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("HOMELAB_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(level) = lookup("HOMELAB_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("HOMELAB_LOG_FORMAT").and_then(|f| f.parse().ok()) {
            self.logging.format = format;
        }

        let services = &mut self.services;
        for (prefix, svc) in [
            ("SONARR", &mut services.sonarr),
            ("RADARR", &mut services.radarr),
            ("JELLYFIN", &mut services.jellyfin),
        ] {
            if let Some(url) = lookup(&format!("HOMELAB_{}_URL", prefix)) {
                svc.url = Some(url);
            }
            if let Some(key) = lookup(&format!("HOMELAB_{}_KEY", prefix)) {
                svc.api_key = Some(key);
            }
        }

        if let Some(host) = lookup("HOMELAB_MC_RCON_HOST") {
            services.minecraft.host = host;
        }
        if let Some(port) = lookup("HOMELAB_MC_RCON_PORT").and_then(|p| p.parse().ok()) {
            services.minecraft.port = port;
        }
        if let Some(password) = lookup("HOMELAB_MC_RCON_PASSWORD") {
            services.minecraft.password = password;
        }

        if let Some(path) = lookup("HOMELAB_SETTINGS_PATH") {
            self.settings.path = Some(PathBuf::from(path));
        }

        self
    }

    /// Validate configuration.
    ///
    /// Service URLs and keys are deliberately not checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }
        if self.timeouts.health_check_ms == 0 {
            return Err(ConfigError::invalid(
                "timeouts.health_check_ms",
                "timeout must be non-zero",
            ));
        }
        if self.timeouts.bulk_seconds == 0 {
            return Err(ConfigError::invalid(
                "timeouts.bulk_seconds",
                "timeout must be non-zero",
            ));
        }
        if self.timeouts.rcon_ms == 0 {
            return Err(ConfigError::invalid(
                "timeouts.rcon_ms",
                "timeout must be non-zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_hub_config_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.timeouts.health_check_ms, 2000);
        assert!(config.services.sonarr.url.is_none());
        assert!(config.settings.path.is_none());
    }

    #[test]
    fn test_config_parse_example_toml() {
        let toml = include_str!("../../homelab.example.toml");
        let config: HubConfig = toml::from_str(toml).unwrap();
        assert!(config.server.port > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = HubConfig::load(Some(Path::new("/nonexistent/homelab.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_none_returns_defaults() {
        assert_eq!(HubConfig::load(None).unwrap(), HubConfig::default());
    }

    #[test]
    fn test_env_overrides_services() {
        let config = HubConfig::default().with_overrides_from(env(&[
            ("HOMELAB_SONARR_URL", "http://nas:8989"),
            ("HOMELAB_SONARR_KEY", "s-key"),
            ("HOMELAB_JELLYFIN_KEY", "j-key"),
            ("HOMELAB_MC_RCON_PORT", "25580"),
            ("HOMELAB_MC_RCON_PASSWORD", "pw"),
        ]));
        assert_eq!(config.services.sonarr.base_url(), Some("http://nas:8989"));
        assert_eq!(config.services.sonarr.key(), Some("s-key"));
        assert_eq!(config.services.jellyfin.key(), Some("j-key"));
        assert!(config.services.radarr.url.is_none());
        assert_eq!(config.services.minecraft.port, 25580);
        assert_eq!(config.services.minecraft.password, "pw");
    }

    #[test]
    fn test_env_invalid_port_ignored() {
        let config = HubConfig::default().with_overrides_from(env(&[
            ("HOMELAB_PORT", "not-a-port"),
            ("HOMELAB_LOG_FORMAT", "json"),
        ]));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = HubConfig::default();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = HubConfig::default();
        config.timeouts.rcon_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_parse_error_with_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("homelab.toml");
        std::fs::write(&path, "[server\nport = 1").unwrap();
        match HubConfig::load(Some(&path)) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_allows_missing_services() {
        assert!(HubConfig::default().validate().is_ok());
    }
}
