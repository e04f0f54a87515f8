//! Snapshot Shaper: raw upstream payloads to UI-ready view models.
//!
//! Every `shape_*` function is pure and total. A failed upstream, a missing
//! field or a payload of the wrong shape yields the documented default for
//! each field derived from it; nothing here returns an error or panics.
//! Interpretation of raw JSON happens once, through [`read_payload`].

pub mod classify;
pub mod derivations;
pub mod schema;

mod console;
mod dashboard;
mod host;
mod media;

pub use classify::MediaKind;
pub use console::{shape_command, shape_minecraft_status, CommandOutcome, MinecraftStatus};
pub use dashboard::{shape_dashboard, DashboardView, QueueService, ServiceSummary, SessionService, SystemSummary};
pub use host::{
    shape_nas, shape_network, NasCpu, NasStorage, NasView, NetworkSpeed, NetworkView,
    DEFAULT_CPU_TEMP_C, MAX_CONNECTIONS,
};
pub use media::{
    shape_arr_full, shape_arr_queues, shape_jellyfin_power, shape_sessions, ArrFullView,
    ArrQueuesView, HistoryEntry, JellyfinPowerView, QueueEntry, StreamEntry, UserEntry,
};

use crate::aggregate::Snapshot;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Interpret a raw value as `T`, falling back to `T::default()`.
pub fn lenient<T: DeserializeOwned + Default>(value: &Value, context: &str) -> T {
    T::deserialize(value).unwrap_or_else(|e| {
        tracing::debug!(payload = %context, error = %e, "Unexpected payload shape, using defaults");
        T::default()
    })
}

/// Typed view of one snapshot entry; the default for failures and absences.
pub fn read_payload<T: DeserializeOwned + Default>(snapshot: &Snapshot, name: &str) -> T {
    match snapshot.payload(name) {
        Some(value) => lenient(value, name),
        None => T::default(),
    }
}

/// A record as a JSON object; non-objects become empty.
pub(crate) fn into_record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            tracing::debug!(kind = json_kind(&other), "Dropping non-object record");
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
