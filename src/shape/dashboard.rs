//! Overview page: host summary plus service liveness.

use super::read_payload;
use super::schema::ArrPage;
use crate::aggregate::Snapshot;
use crate::catalog::names;
use crate::telemetry::{primary_interface, FilesystemReading, HostOverview};
use serde::Serialize;
use serde_json::Value;

/// Filesystems at or below this size are hidden from the overview.
const MIN_LISTED_FS_BYTES: u64 = 1_000_000_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub system: SystemSummary,
    pub services: ServiceSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSummary {
    pub cpu_load: f32,
    /// `None` when no sensor reports
    pub cpu_temp: Option<f32>,
    pub mem_used: u64,
    pub mem_total: u64,
    pub uptime: u64,
    pub platform: String,
    pub distro: String,
    pub storage: Vec<FilesystemReading>,
    pub net_rx: f64,
    pub net_tx: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub sonarr: QueueService,
    pub radarr: QueueService,
    pub jellyfin: SessionService,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueService {
    pub online: bool,
    pub queue: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionService {
    pub online: bool,
    pub active_users: u64,
}

fn queue_service(snapshot: &Snapshot, name: &str) -> QueueService {
    QueueService {
        online: snapshot.succeeded(name),
        queue: read_payload::<ArrPage>(snapshot, name).count(),
    }
}

pub fn shape_dashboard(snapshot: &Snapshot) -> DashboardView {
    let host: HostOverview = read_payload(snapshot, names::HOST);
    let net = primary_interface(&host.interfaces);

    let system = SystemSummary {
        cpu_load: host.cpu.load,
        cpu_temp: host.cpu.temperature,
        mem_used: host.memory.used,
        mem_total: host.memory.total,
        uptime: host.uptime_seconds,
        platform: host.os.platform.clone(),
        distro: host.os.distro.clone(),
        storage: host
            .filesystems
            .iter()
            .filter(|fs| fs.size > MIN_LISTED_FS_BYTES)
            .cloned()
            .collect(),
        net_rx: net.map_or(0.0, |i| i.rx_sec),
        net_tx: net.map_or(0.0, |i| i.tx_sec),
    };

    let sessions: Vec<Value> = read_payload(snapshot, names::JELLYFIN_SESSIONS);
    let services = ServiceSummary {
        sonarr: queue_service(snapshot, names::SONARR_QUEUE),
        radarr: queue_service(snapshot, names::RADARR_QUEUE),
        jellyfin: SessionService {
            online: snapshot.succeeded(names::JELLYFIN_SESSIONS),
            active_users: sessions.len() as u64,
        },
    };

    DashboardView { system, services }
}
