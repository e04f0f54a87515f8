//! Upstream service endpoints and credentials.
//!
//! Everything here is optional: a missing URL or key only fails the calls
//! that need it, at the time they are made.

use serde::{Deserialize, Serialize};

/// All upstream services the dashboard talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub sonarr: ApiServiceConfig,
    pub radarr: ApiServiceConfig,
    pub jellyfin: ApiServiceConfig,
    pub minecraft: MinecraftConfig,
}

/// A REST service reached with a base URL and an API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiServiceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ApiServiceConfig {
    /// Base URL without a trailing slash, if set and non-empty.
    pub fn base_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }

    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Game-server RCON console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinecraftConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
}

impl Default for MinecraftConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 25575,
            password: String::new(),
        }
    }
}
