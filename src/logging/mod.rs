//! Structured logging helpers
//!
//! Filter construction from [`LoggingConfig`](crate::config::LoggingConfig)
//! and per-request correlation IDs.

pub mod middleware;

pub use middleware::{generate_request_id, request_context, RequestId, REQUEST_ID_HEADER};

/// Build filter directives string from LoggingConfig
///
/// Produces `"<level>,homelab::<component>=<level>,..."`.
///
/// # Examples
///
/// ```
/// use homelab::config::LoggingConfig;
/// use homelab::logging::build_filter_directives;
/// use std::collections::BTreeMap;
///
/// let mut component_levels = BTreeMap::new();
/// component_levels.insert("upstream".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     component_levels: Some(component_levels),
///     ..LoggingConfig::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,homelab::upstream=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",homelab::{}={}", component, level));
        }
    }

    filter_str
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use std::collections::BTreeMap;

    #[test]
    fn test_filter_without_components() {
        let config = LoggingConfig {
            level: "warn".into(),
            ..LoggingConfig::default()
        };
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_components_sorted() {
        let mut levels = BTreeMap::new();
        levels.insert("upstream".to_string(), "trace".to_string());
        levels.insert("aggregate".to_string(), "debug".to_string());
        let config = LoggingConfig {
            component_levels: Some(levels),
            ..LoggingConfig::default()
        };
        assert_eq!(
            build_filter_directives(&config),
            "info,homelab::aggregate=debug,homelab::upstream=trace"
        );
    }
}
