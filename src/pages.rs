//! Dashboard pages: which targets each one settles, under which policy, and
//! how the resulting snapshot is shaped.

use crate::aggregate::{Plan, Snapshot};
use crate::catalog::TargetCatalog;
use crate::shape::{self, ArrFullView, ArrQueuesView, DashboardView, JellyfinPowerView, MinecraftStatus, NasView, NetworkView};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Page {
    Dashboard,
    Arr,
    ArrFull,
    Jellyfin,
    JellyfinPower,
    Minecraft,
    Nas,
    Network,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Dashboard,
        Page::Arr,
        Page::ArrFull,
        Page::Jellyfin,
        Page::JellyfinPower,
        Page::Minecraft,
        Page::Nas,
        Page::Network,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Arr => "arr",
            Page::ArrFull => "arr-full",
            Page::Jellyfin => "jellyfin",
            Page::JellyfinPower => "jellyfin-power",
            Page::Minecraft => "minecraft",
            Page::Nas => "nas",
            Page::Network => "network",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Page::Dashboard => "/api/dashboard",
            Page::Arr => "/api/arr",
            Page::ArrFull => "/api/arr/full",
            Page::Jellyfin => "/api/jellyfin",
            Page::JellyfinPower => "/api/jellyfin/power",
            Page::Minecraft => "/api/minecraft/status",
            Page::Nas => "/api/nas",
            Page::Network => "/api/network",
        }
    }

    /// Body of the single error returned when a critical target fails.
    ///
    /// `None` for pages without critical targets.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            Page::Dashboard => Some("Critical Dashboard Failure"),
            Page::Arr => Some("Failed to fetch data"),
            Page::ArrFull => Some("Failed"),
            Page::JellyfinPower => Some("Jellyfin Sync Failed"),
            Page::Nas => Some("Telemetry Failed"),
            Page::Network => Some("Network Probe Failed"),
            Page::Jellyfin | Page::Minecraft => None,
        }
    }

    /// Targets and policies for one request at time `now`.
    pub fn plan(&self, catalog: &TargetCatalog, now: DateTime<Utc>) -> Plan {
        let probe = catalog.timeouts().health_check();
        let bulk = catalog.timeouts().bulk();
        match self {
            Page::Dashboard => Plan::new()
                .critical(catalog.host_overview())
                .optional(catalog.sonarr_queue(probe))
                .optional(catalog.radarr_queue(probe))
                .optional(catalog.jellyfin_sessions(probe)),
            Page::Arr => Plan::new()
                .critical(catalog.sonarr_queue(bulk))
                .critical(catalog.radarr_queue(bulk)),
            Page::ArrFull => Plan::new()
                .critical(catalog.sonarr_queue(bulk))
                .critical(catalog.radarr_queue(bulk))
                .critical(catalog.sonarr_calendar(now))
                .optional(catalog.radarr_history()),
            Page::Jellyfin => Plan::new().optional(catalog.jellyfin_sessions(bulk)),
            Page::JellyfinPower => Plan::new()
                .critical(catalog.jellyfin_sessions(bulk))
                .critical(catalog.jellyfin_users())
                .critical(catalog.jellyfin_activity()),
            Page::Minecraft => Plan::new().optional(catalog.minecraft_status()),
            Page::Nas => Plan::new().critical(catalog.host_overview()),
            Page::Network => Plan::new().critical(catalog.host_network()),
        }
    }

    /// Shape a settled snapshot into this page's view model.
    pub fn render(&self, snapshot: &Snapshot) -> PageView {
        match self {
            Page::Dashboard => PageView::Dashboard(shape::shape_dashboard(snapshot)),
            Page::Arr => PageView::Arr(shape::shape_arr_queues(snapshot)),
            Page::ArrFull => PageView::ArrFull(shape::shape_arr_full(snapshot)),
            Page::Jellyfin => PageView::Jellyfin(shape::shape_sessions(snapshot)),
            Page::JellyfinPower => PageView::JellyfinPower(shape::shape_jellyfin_power(snapshot)),
            Page::Minecraft => PageView::Minecraft(shape::shape_minecraft_status(snapshot)),
            Page::Nas => PageView::Nas(shape::shape_nas(snapshot)),
            Page::Network => PageView::Network(shape::shape_network(snapshot)),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("Unknown page: {}", s))
    }
}

/// A page's view model, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageView {
    Dashboard(DashboardView),
    Arr(ArrQueuesView),
    ArrFull(ArrFullView),
    Jellyfin(Vec<Value>),
    JellyfinPower(JellyfinPowerView),
    Minecraft(MinecraftStatus),
    Nas(NasView),
    Network(NetworkView),
}
