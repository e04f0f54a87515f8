//! Media pages: download queues, calendar, history and streaming sessions.

use super::classify::{history_item_kind, is_active_session, is_transcoding, queue_item_kind, MediaKind};
use super::derivations::{
    bytes_to_mb, count_matching, download_progress, next_upcoming, ratio_percent, sort_by_timestamp,
};
use super::schema::{ActivityLogPage, ArrPage, QueueItemFields, SessionFields, UserFields};
use super::{into_record, lenient, read_payload};
use crate::aggregate::Snapshot;
use crate::catalog::names;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

const AIR_DATE_FIELD: &str = "airDateUtc";

/// Both download queues, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArrQueuesView {
    pub sonarr: Value,
    pub radarr: Value,
}

pub fn shape_arr_queues(snapshot: &Snapshot) -> ArrQueuesView {
    let raw = |name| snapshot.payload(name).cloned().unwrap_or(Value::Null);
    ArrQueuesView {
        sonarr: raw(names::SONARR_QUEUE),
        radarr: raw(names::RADARR_QUEUE),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrFullView {
    pub queue: Vec<QueueEntry>,
    /// Sorted by air date, undated entries last
    pub calendar: Vec<Value>,
    pub next_airing: Option<Value>,
    pub history: Vec<HistoryEntry>,
    pub queue_count: usize,
    pub history_count: usize,
}

/// A queue record with derived fields alongside the upstream ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub media_kind: MediaKind,
    pub progress_percent: f64,
    pub remaining_mb: f64,
    #[serde(flatten)]
    pub record: Map<String, Value>,
}

impl QueueEntry {
    fn from_record(record: Value) -> Self {
        let fields: QueueItemFields = lenient(&record, "queue record");
        Self {
            media_kind: queue_item_kind(&record),
            progress_percent: download_progress(fields.size, fields.sizeleft),
            remaining_mb: bytes_to_mb(fields.sizeleft.unwrap_or(0.0)),
            record: into_record(record),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub media_kind: MediaKind,
    #[serde(flatten)]
    pub record: Map<String, Value>,
}

pub fn shape_arr_full(snapshot: &Snapshot) -> ArrFullView {
    let queue: Vec<QueueEntry> = [names::SONARR_QUEUE, names::RADARR_QUEUE]
        .into_iter()
        .flat_map(|name| read_payload::<ArrPage>(snapshot, name).into_records())
        .map(QueueEntry::from_record)
        .collect();

    let mut calendar: Vec<Value> = read_payload(snapshot, names::SONARR_CALENDAR);
    let next_airing = next_upcoming(&calendar, AIR_DATE_FIELD).cloned();
    sort_by_timestamp(&mut calendar, AIR_DATE_FIELD);

    let history: Vec<HistoryEntry> = read_payload::<ArrPage>(snapshot, names::RADARR_HISTORY)
        .into_records()
        .into_iter()
        .map(|record| HistoryEntry {
            media_kind: history_item_kind(&record),
            record: into_record(record),
        })
        .collect();

    ArrFullView {
        queue_count: queue.len(),
        history_count: history.len(),
        queue,
        calendar,
        next_airing,
        history,
    }
}

/// Raw session list; empty when the server is unreachable.
pub fn shape_sessions(snapshot: &Snapshot) -> Vec<Value> {
    read_payload(snapshot, names::JELLYFIN_SESSIONS)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JellyfinPowerView {
    pub sessions: Vec<Value>,
    pub active_streams: Vec<StreamEntry>,
    pub users: Vec<UserEntry>,
    pub total_users: usize,
    pub active_user_count: usize,
    pub activity_rate: f64,
    pub logs: Vec<Value>,
}

/// A session with something playing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEntry {
    pub progress_percent: f64,
    pub transcoding: bool,
    #[serde(flatten)]
    pub session: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    /// The user owns at least one active stream
    pub is_active: bool,
    #[serde(flatten)]
    pub user: Map<String, Value>,
}

pub fn shape_jellyfin_power(snapshot: &Snapshot) -> JellyfinPowerView {
    let sessions: Vec<Value> = read_payload(snapshot, names::JELLYFIN_SESSIONS);
    let users: Vec<Value> = read_payload(snapshot, names::JELLYFIN_USERS);
    let logs = read_payload::<ActivityLogPage>(snapshot, names::JELLYFIN_ACTIVITY).items;

    let active_user_count = count_matching(&sessions, is_active_session);

    let mut streaming_users = HashSet::new();
    let active_streams: Vec<StreamEntry> = sessions
        .iter()
        .filter(|s| is_active_session(s))
        .map(|session| {
            let fields: SessionFields = lenient(session, "session");
            if let Some(user) = &fields.user_id {
                streaming_users.insert(user.clone());
            }
            let position = fields.play_state.and_then(|p| p.position_ticks);
            let runtime = fields.now_playing_item.and_then(|n| n.run_time_ticks);
            StreamEntry {
                progress_percent: ratio_percent(position, runtime),
                transcoding: is_transcoding(session),
                session: into_record(session.clone()),
            }
        })
        .collect();

    let total_users = users.len();
    let users = users
        .into_iter()
        .map(|user| {
            let fields: UserFields = lenient(&user, "user");
            UserEntry {
                is_active: fields
                    .id
                    .is_some_and(|id| streaming_users.contains(&id)),
                user: into_record(user),
            }
        })
        .collect();

    JellyfinPowerView {
        activity_rate: ratio_percent(Some(active_user_count as f64), Some(total_users as f64)),
        sessions,
        active_streams,
        users,
        total_users,
        active_user_count,
        logs,
    }
}
