//! Host telemetry.
//!
//! The rest of the crate only sees the [`HostProbe`] trait and the reading
//! types below; [`SysinfoProbe`] is the production implementation.

mod procnet;
mod sysinfo_probe;

pub use procnet::parse_proc_net_tcp;
pub use sysinfo_probe::SysinfoProbe;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a probe can report.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("telemetry task failed: {0}")]
    Task(String),

    #[error("telemetry unavailable: {0}")]
    Unavailable(String),
}

/// Source of host readings.
#[async_trait]
pub trait HostProbe: Send + Sync + 'static {
    /// CPU, memory, storage, OS and interface throughput.
    async fn overview(&self) -> Result<HostOverview, ProbeError>;

    /// Interfaces and open TCP sockets.
    async fn network(&self) -> Result<HostNetwork, ProbeError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostOverview {
    pub hardware: Hardware,
    pub os: OsInfo,
    pub cpu: CpuReading,
    pub memory: MemoryReading,
    pub uptime_seconds: u64,
    pub filesystems: Vec<FilesystemReading>,
    pub disks: Vec<PhysicalDisk>,
    pub interfaces: Vec<InterfaceReading>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hardware {
    pub manufacturer: String,
    pub model: String,
    pub cpu_brand: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsInfo {
    pub platform: String,
    pub distro: String,
    pub release: String,
    pub kernel: String,
    pub arch: String,
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuReading {
    /// Global load in percent
    pub load: f32,
    /// Per-core load in percent
    pub cores: Vec<f32>,
    /// Package temperature in °C, when a sensor reports one
    pub temperature: Option<f32>,
}

/// Memory figures in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryReading {
    pub total: u64,
    pub used: u64,
    #[serde(rename = "swaptotal")]
    pub swap_total: u64,
    #[serde(rename = "swapused")]
    pub swap_used: u64,
}

/// A mounted filesystem. Sizes in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemReading {
    /// Device name
    #[serde(rename = "fs")]
    pub name: String,
    pub mount: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub size: u64,
    pub used: u64,
    #[serde(rename = "use")]
    pub use_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalDisk {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub removable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceReading {
    #[serde(rename = "iface")]
    pub name: String,
    pub mac: String,
    pub ip4: Option<String>,
    pub ip6: Option<String>,
    /// wired, wireless, loopback, virtual or other
    #[serde(rename = "type")]
    pub kind: String,
    /// Bytes per second over the sampling window
    pub rx_sec: f64,
    pub tx_sec: f64,
    #[serde(rename = "rx_bytes")]
    pub total_rx: u64,
    #[serde(rename = "tx_bytes")]
    pub total_tx: u64,
    /// Kernel operstate ("up", "down", "unknown")
    pub operstate: String,
    pub internal: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostNetwork {
    pub interfaces: Vec<InterfaceReading>,
    pub connections: Vec<Connection>,
}

/// One TCP socket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Connection {
    pub protocol: String,
    pub local_address: String,
    pub local_port: u16,
    pub peer_address: String,
    pub peer_port: u16,
    pub state: String,
}

/// Pick the interface a single-interface widget should show: the busiest
/// external one, falling back to the first listed.
pub fn primary_interface(interfaces: &[InterfaceReading]) -> Option<&InterfaceReading> {
    interfaces
        .iter()
        .filter(|i| !i.internal)
        .max_by_key(|i| i.total_rx.saturating_add(i.total_tx))
        .or_else(|| interfaces.first())
}
