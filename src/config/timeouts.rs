//! Per-call timeouts

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts applied to upstream calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Quick liveness probes on the overview page
    pub health_check_ms: u64,
    /// List fetches (queues, calendars, sessions, host readings)
    pub bulk_seconds: u64,
    /// Whole RCON session: connect, auth and commands
    pub rcon_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            health_check_ms: 2000,
            bulk_seconds: 30,
            rcon_ms: 2000,
        }
    }
}

impl TimeoutConfig {
    pub fn health_check(&self) -> Duration {
        Duration::from_millis(self.health_check_ms)
    }

    pub fn bulk(&self) -> Duration {
        Duration::from_secs(self.bulk_seconds)
    }

    pub fn rcon(&self) -> Duration {
        Duration::from_millis(self.rcon_ms)
    }
}
