//! Builds [`UpstreamTarget`]s from read-only configuration.
//!
//! A catalog is created once from [`HubConfig`] and shared; it builds fresh,
//! immutable targets for every aggregate request. Missing URLs or keys
//! produce targets that fail with a protocol error when invoked.

use crate::config::{ApiServiceConfig, HubConfig, ServicesConfig, TimeoutConfig};
use crate::upstream::{HostQuery, HttpCall, UpstreamTarget};
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use std::time::Duration;

/// Logical upstream names used as snapshot keys.
pub mod names {
    pub const SONARR_QUEUE: &str = "sonarr-queue";
    pub const RADARR_QUEUE: &str = "radarr-queue";
    pub const SONARR_CALENDAR: &str = "sonarr-calendar";
    pub const RADARR_HISTORY: &str = "radarr-history";
    pub const JELLYFIN_SESSIONS: &str = "jellyfin-sessions";
    pub const JELLYFIN_USERS: &str = "jellyfin-users";
    pub const JELLYFIN_ACTIVITY: &str = "jellyfin-activity";
    pub const MINECRAFT_STATUS: &str = "minecraft-status";
    pub const MINECRAFT_COMMAND: &str = "minecraft-command";
    pub const HOST: &str = "host";
    pub const HOST_NETWORK: &str = "host-network";
}

/// Days of upcoming episodes requested from the calendar.
pub const CALENDAR_WINDOW_DAYS: i64 = 7;
/// Entries requested from download history and the activity log.
pub const HISTORY_PAGE_SIZE: u32 = 15;

const ARR_KEY_HEADER: &str = "X-Api-Key";
const JELLYFIN_KEY_PARAM: &str = "api_key";

#[derive(Debug, Clone, Default)]
pub struct TargetCatalog {
    services: ServicesConfig,
    timeouts: TimeoutConfig,
}

impl TargetCatalog {
    pub fn new(services: ServicesConfig, timeouts: TimeoutConfig) -> Self {
        Self { services, timeouts }
    }

    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(config.services.clone(), config.timeouts.clone())
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    /// `{base}{path}` with the service's key attached, or an unconfigured
    /// call naming the first missing setting.
    fn service_call(
        svc: &ApiServiceConfig,
        service: &str,
        path: &str,
        attach_key: fn(HttpCall, &str) -> HttpCall,
    ) -> HttpCall {
        let Some(base) = svc.base_url() else {
            return HttpCall::unconfigured(format!("services.{}.url", service));
        };
        let Some(key) = svc.key() else {
            return HttpCall::unconfigured(format!("services.{}.api_key", service));
        };
        attach_key(HttpCall::get(format!("{}{}", base, path)), key)
    }

    fn arr_call(svc: &ApiServiceConfig, service: &str, path: &str) -> HttpCall {
        Self::service_call(svc, service, path, |call, key| call.header(ARR_KEY_HEADER, key))
    }

    fn jellyfin_call(&self, path: &str) -> HttpCall {
        Self::service_call(&self.services.jellyfin, "jellyfin", path, |call, key| {
            call.query(JELLYFIN_KEY_PARAM, key)
        })
    }

    pub fn sonarr_queue(&self, timeout: Duration) -> UpstreamTarget {
        UpstreamTarget::http(
            names::SONARR_QUEUE,
            Self::arr_call(&self.services.sonarr, "sonarr", "/api/v3/queue"),
            timeout,
        )
    }

    pub fn radarr_queue(&self, timeout: Duration) -> UpstreamTarget {
        UpstreamTarget::http(
            names::RADARR_QUEUE,
            Self::arr_call(&self.services.radarr, "radarr", "/api/v3/queue"),
            timeout,
        )
    }

    /// Episodes airing between `now` and a week later.
    pub fn sonarr_calendar(&self, now: DateTime<Utc>) -> UpstreamTarget {
        let end = now + ChronoDuration::days(CALENDAR_WINDOW_DAYS);
        let call = Self::arr_call(&self.services.sonarr, "sonarr", "/api/v3/calendar")
            .query("start", now.to_rfc3339_opts(SecondsFormat::Millis, true))
            .query("end", end.to_rfc3339_opts(SecondsFormat::Millis, true));
        UpstreamTarget::http(names::SONARR_CALENDAR, call, self.timeouts.bulk())
    }

    pub fn radarr_history(&self) -> UpstreamTarget {
        let call = Self::arr_call(&self.services.radarr, "radarr", "/api/v3/history")
            .query("page", "1")
            .query("pageSize", HISTORY_PAGE_SIZE.to_string());
        UpstreamTarget::http(names::RADARR_HISTORY, call, self.timeouts.bulk())
    }

    pub fn jellyfin_sessions(&self, timeout: Duration) -> UpstreamTarget {
        UpstreamTarget::http(names::JELLYFIN_SESSIONS, self.jellyfin_call("/Sessions"), timeout)
    }

    pub fn jellyfin_users(&self) -> UpstreamTarget {
        UpstreamTarget::http(
            names::JELLYFIN_USERS,
            self.jellyfin_call("/Users"),
            self.timeouts.bulk(),
        )
    }

    pub fn jellyfin_activity(&self) -> UpstreamTarget {
        let call = self
            .jellyfin_call("/System/ActivityLog/Entries")
            .query("limit", HISTORY_PAGE_SIZE.to_string())
            .query("sortOrder", "Descending");
        UpstreamTarget::http(names::JELLYFIN_ACTIVITY, call, self.timeouts.bulk())
    }

    /// Player list and server version over one console session.
    pub fn minecraft_status(&self) -> UpstreamTarget {
        UpstreamTarget::rcon(
            names::MINECRAFT_STATUS,
            ["list", "version"],
            self.timeouts.rcon(),
        )
    }

    /// A console command forwarded verbatim.
    pub fn minecraft_command(&self, command: &str) -> UpstreamTarget {
        UpstreamTarget::rcon(names::MINECRAFT_COMMAND, [command], self.timeouts.rcon())
    }

    pub fn host_overview(&self) -> UpstreamTarget {
        UpstreamTarget::host(names::HOST, HostQuery::Overview, self.timeouts.bulk())
    }

    pub fn host_network(&self) -> UpstreamTarget {
        UpstreamTarget::host(names::HOST_NETWORK, HostQuery::Network, self.timeouts.bulk())
    }
}
