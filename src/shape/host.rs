//! Host telemetry pages.

use super::classify::{is_reported_connection, is_visible_interface};
use super::read_payload;
use crate::aggregate::Snapshot;
use crate::catalog::names;
use crate::telemetry::{
    primary_interface, Connection, FilesystemReading, Hardware, HostNetwork, HostOverview,
    InterfaceReading, MemoryReading, OsInfo, PhysicalDisk,
};
use serde::Serialize;

/// Reported when no temperature sensor is available.
pub const DEFAULT_CPU_TEMP_C: f32 = 45.0;

/// Most sockets listed on the network page.
pub const MAX_CONNECTIONS: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NasView {
    pub hardware: Hardware,
    pub os: OsInfo,
    pub cpu: NasCpu,
    pub mem: MemoryReading,
    pub storage: NasStorage,
    /// Primary interface
    pub net: Option<InterfaceReading>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NasCpu {
    pub load: f32,
    pub cores: Vec<f32>,
    pub temp: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NasStorage {
    pub logical: Vec<FilesystemReading>,
    pub physical: Vec<PhysicalDisk>,
}

pub fn shape_nas(snapshot: &Snapshot) -> NasView {
    let host: HostOverview = read_payload(snapshot, names::HOST);
    let net = primary_interface(&host.interfaces).cloned();

    NasView {
        cpu: NasCpu {
            load: host.cpu.load,
            temp: host
                .cpu
                .temperature
                .filter(|t| t.is_finite() && *t > 0.0)
                .unwrap_or(DEFAULT_CPU_TEMP_C),
            cores: host.cpu.cores,
        },
        mem: host.memory,
        storage: NasStorage {
            logical: host.filesystems.into_iter().filter(|fs| fs.size > 0).collect(),
            physical: host.disks,
        },
        hardware: host.hardware,
        os: host.os,
        net,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkView {
    pub speed: NetworkSpeed,
    pub interfaces: Vec<InterfaceReading>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkSpeed {
    pub rx_sec: f64,
    pub tx_sec: f64,
}

pub fn shape_network(snapshot: &Snapshot) -> NetworkView {
    let network: HostNetwork = read_payload(snapshot, names::HOST_NETWORK);

    let speed = primary_interface(&network.interfaces)
        .map(|i| NetworkSpeed {
            rx_sec: i.rx_sec,
            tx_sec: i.tx_sec,
        })
        .unwrap_or_default();

    NetworkView {
        speed,
        interfaces: network
            .interfaces
            .into_iter()
            .filter(is_visible_interface)
            .collect(),
        connections: network
            .connections
            .into_iter()
            .filter(is_reported_connection)
            .take(MAX_CONNECTIONS)
            .collect(),
    }
}
