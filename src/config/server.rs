//! HTTP listener settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind; `0.0.0.0` serves the whole LAN
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listens_on_lan_by_default() {
        assert_eq!(ServerConfig::default().bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let config: ServerConfig = toml::from_str("port = 8088").unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8088");
    }
}
