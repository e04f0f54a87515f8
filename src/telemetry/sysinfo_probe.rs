//! `sysinfo`-backed host probe.

use super::{
    parse_proc_net_tcp, CpuReading, FilesystemReading, Hardware, HostNetwork, HostOverview,
    HostProbe, InterfaceReading, MemoryReading, OsInfo, PhysicalDisk, ProbeError,
};
use async_trait::async_trait;
use if_addrs::IfAddr;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

/// Shortest window between the two samples a rate is computed from.
const SAMPLE_WINDOW: Duration = Duration::from_millis(200);

/// Labels that identify a CPU package sensor.
const CPU_SENSOR_HINTS: [&str; 5] = ["cpu", "package", "core", "tctl", "k10temp"];

/// Reads the local machine. Every call takes fresh samples; nothing is kept
/// between calls.
#[derive(Debug, Default, Clone)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostProbe for SysinfoProbe {
    async fn overview(&self) -> Result<HostOverview, ProbeError> {
        tokio::task::spawn_blocking(collect_overview)
            .await
            .map_err(|e| ProbeError::Task(e.to_string()))
    }

    async fn network(&self) -> Result<HostNetwork, ProbeError> {
        tokio::task::spawn_blocking(collect_network)
            .await
            .map_err(|e| ProbeError::Task(e.to_string()))
    }
}

fn collect_overview() -> HostOverview {
    let mut sys = System::new_with_specifics(
        RefreshKind::new()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything()),
    );
    let mut networks = Networks::new_with_refreshed_list();
    let started = Instant::now();

    // CPU usage and throughput are deltas between two refreshes
    std::thread::sleep(SAMPLE_WINDOW.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
    sys.refresh_cpu();
    networks.refresh();
    let window = started.elapsed();

    let cpus = sys.cpus();
    let cpu = CpuReading {
        load: sys.global_cpu_info().cpu_usage(),
        cores: cpus.iter().map(|c| c.cpu_usage()).collect(),
        temperature: cpu_temperature(),
    };

    let hardware = Hardware {
        manufacturer: read_sys_file("/sys/class/dmi/id/sys_vendor"),
        model: read_sys_file("/sys/class/dmi/id/product_name"),
        cpu_brand: cpus
            .first()
            .map(|c| c.brand().trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
    };

    let memory = MemoryReading {
        total: sys.total_memory(),
        used: sys.used_memory(),
        swap_total: sys.total_swap(),
        swap_used: sys.used_swap(),
    };

    let (filesystems, disks) = collect_disks();

    HostOverview {
        hardware,
        os: os_info(),
        cpu,
        memory,
        uptime_seconds: System::uptime(),
        filesystems,
        disks,
        interfaces: interface_readings(&networks, window),
    }
}

fn collect_network() -> HostNetwork {
    let mut networks = Networks::new_with_refreshed_list();
    let started = Instant::now();
    std::thread::sleep(SAMPLE_WINDOW);
    networks.refresh();
    let window = started.elapsed();

    let mut connections = Vec::new();
    for (path, protocol) in [("/proc/net/tcp", "tcp"), ("/proc/net/tcp6", "tcp6")] {
        if let Ok(content) = std::fs::read_to_string(path) {
            connections.extend(parse_proc_net_tcp(&content, protocol));
        }
    }

    HostNetwork {
        interfaces: interface_readings(&networks, window),
        connections,
    }
}

fn os_info() -> OsInfo {
    OsInfo {
        platform: std::env::consts::OS.to_string(),
        distro: System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| "Unknown".to_string()),
        release: System::os_version().unwrap_or_default(),
        kernel: System::kernel_version().unwrap_or_default(),
        arch: std::env::consts::ARCH.to_string(),
        hostname: System::host_name().unwrap_or_default(),
    }
}

fn cpu_temperature() -> Option<f32> {
    let components = Components::new_with_refreshed_list();
    components
        .list()
        .iter()
        .find(|c| {
            let label = c.label().to_lowercase();
            CPU_SENSOR_HINTS.iter().any(|hint| label.contains(hint))
        })
        .map(|c| c.temperature())
        .filter(|t| t.is_finite() && *t > 0.0)
}

fn collect_disks() -> (Vec<FilesystemReading>, Vec<PhysicalDisk>) {
    let disks = Disks::new_with_refreshed_list();
    let mut filesystems = Vec::new();
    let mut physical: HashMap<String, PhysicalDisk> = HashMap::new();

    for disk in disks.list() {
        let name = disk.name().to_string_lossy().into_owned();
        let size = disk.total_space();
        let used = size.saturating_sub(disk.available_space());
        let use_percent = if size > 0 {
            used as f64 / size as f64 * 100.0
        } else {
            0.0
        };

        filesystems.push(FilesystemReading {
            name: name.clone(),
            mount: disk.mount_point().to_string_lossy().into_owned(),
            fs_type: disk.file_system().to_string_lossy().into_owned(),
            size,
            used,
            use_percent,
        });

        // A device mounted in several places is one physical disk
        physical.entry(name.clone()).or_insert_with(|| PhysicalDisk {
            name,
            kind: format!("{:?}", disk.kind()),
            size,
            removable: disk.is_removable(),
        });
    }

    let mut physical: Vec<_> = physical.into_values().collect();
    physical.sort_by(|a, b| a.name.cmp(&b.name));
    (filesystems, physical)
}

fn interface_readings(networks: &Networks, window: Duration) -> Vec<InterfaceReading> {
    let seconds = window.as_secs_f64();
    let addresses = interface_addresses();

    let mut readings: Vec<_> = networks
        .list()
        .iter()
        .map(|(name, data)| {
            let (ip4, ip6) = addresses.get(name).cloned().unwrap_or_default();
            let internal = name == "lo" || name.starts_with("lo0");
            let is_virtual = is_virtual_interface(name);
            InterfaceReading {
                name: name.clone(),
                mac: data.mac_address().to_string(),
                ip4,
                ip6,
                kind: interface_kind(name, internal, is_virtual).to_string(),
                rx_sec: per_second(data.received(), seconds),
                tx_sec: per_second(data.transmitted(), seconds),
                total_rx: data.total_received(),
                total_tx: data.total_transmitted(),
                operstate: operstate(name),
                internal,
                is_virtual,
            }
        })
        .collect();
    readings.sort_by(|a, b| a.name.cmp(&b.name));
    readings
}

fn per_second(bytes: u64, seconds: f64) -> f64 {
    if seconds > 0.0 {
        bytes as f64 / seconds
    } else {
        0.0
    }
}

type AddressPair = (Option<String>, Option<String>);

fn interface_addresses() -> HashMap<String, AddressPair> {
    let mut map: HashMap<String, AddressPair> = HashMap::new();
    match if_addrs::get_if_addrs() {
        Ok(list) => {
            for iface in list {
                let entry = map.entry(iface.name.clone()).or_default();
                match iface.addr {
                    IfAddr::V4(v4) if entry.0.is_none() => entry.0 = Some(v4.ip.to_string()),
                    IfAddr::V6(v6) if entry.1.is_none() => entry.1 = Some(v6.ip.to_string()),
                    _ => {}
                }
            }
        }
        Err(e) => tracing::debug!(error = %e, "Interface address enumeration failed"),
    }
    map
}

fn interface_kind(name: &str, internal: bool, is_virtual: bool) -> &'static str {
    if internal {
        "loopback"
    } else if name.starts_with("wl") {
        "wireless"
    } else if name.starts_with("en") || name.starts_with("eth") {
        "wired"
    } else if is_virtual {
        "virtual"
    } else {
        "other"
    }
}

fn operstate(name: &str) -> String {
    let path = format!("/sys/class/net/{}/operstate", name);
    match std::fs::read_to_string(path) {
        Ok(state) => state.trim().to_string(),
        // Without sysfs assume anything sysinfo lists is up
        Err(_) => "up".to_string(),
    }
}

fn is_virtual_interface(name: &str) -> bool {
    let link = Path::new("/sys/class/net").join(name);
    match std::fs::canonicalize(link) {
        Ok(target) => target.to_string_lossy().contains("/devices/virtual/"),
        Err(_) => ["docker", "veth", "br-", "virbr", "tun", "tap"]
            .iter()
            .any(|prefix| name.starts_with(prefix)),
    }
}

fn read_sys_file(path: &str) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}
