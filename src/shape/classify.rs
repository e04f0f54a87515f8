//! Classification predicates over loosely-typed upstream records.
//!
//! Upstream schemas carry no uniform type tag, so TV-versus-movie is decided
//! by the presence of type-specific keys. Items whose schema drifts between
//! upstream versions may be misclassified; such items fall through to
//! [`MediaKind::Movie`].

use crate::telemetry::{Connection, InterfaceReading};
use serde::Serialize;
use serde_json::Value;

/// Coarse media type of a queue or history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Tv,
    Movie,
}

impl MediaKind {
    fn from_tv_flag(is_tv: bool) -> Self {
        if is_tv {
            MediaKind::Tv
        } else {
            MediaKind::Movie
        }
    }
}

/// Present and not `null`, `false`, `0`, `NaN` or `""`.
///
/// Arrays and objects are truthy even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Queue records: truthy `series` or truthy `episodeId` means TV.
pub fn is_tv_queue_item(item: &Value) -> bool {
    is_truthy(item.get("series")) || is_truthy(item.get("episodeId"))
}

/// History records: truthy `seriesId` or truthy `episodeId` means TV.
pub fn is_tv_history_item(item: &Value) -> bool {
    is_truthy(item.get("seriesId")) || is_truthy(item.get("episodeId"))
}

pub fn queue_item_kind(item: &Value) -> MediaKind {
    MediaKind::from_tv_flag(is_tv_queue_item(item))
}

pub fn history_item_kind(item: &Value) -> MediaKind {
    MediaKind::from_tv_flag(is_tv_history_item(item))
}

/// A session is streaming when it has a now-playing item.
pub fn is_active_session(session: &Value) -> bool {
    is_truthy(session.get("NowPlayingItem"))
}

pub fn is_transcoding(session: &Value) -> bool {
    session
        .get("TranscodingInfo")
        .is_some_and(|info| !info.is_null())
}

/// Interfaces worth listing: external, physical and up.
pub fn is_visible_interface(iface: &InterfaceReading) -> bool {
    !iface.internal && !iface.is_virtual && iface.operstate == "up"
}

/// Sockets worth listing: established or listening.
pub fn is_reported_connection(conn: &Connection) -> bool {
    conn.state == "ESTABLISHED" || conn.state == "LISTEN"
}
