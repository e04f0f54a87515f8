//! Expected upstream payload shapes.
//!
//! Only the fields the shaper derives from are typed. Every field is optional
//! and records stay as raw JSON so they can be passed through to the UI.

use serde::Deserialize;
use serde_json::Value;

/// Paged list returned by the *arr queue and history endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrPage {
    pub total_records: Option<u64>,
    pub records: Option<Vec<Value>>,
}

impl ArrPage {
    /// `totalRecords`, else the number of records, else 0.
    pub fn count(&self) -> u64 {
        self.total_records
            .or_else(|| self.records.as_ref().map(|r| r.len() as u64))
            .unwrap_or(0)
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct QueueItemFields {
    pub size: Option<f64>,
    pub sizeleft: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ActivityLogPage {
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SessionFields {
    pub user_id: Option<String>,
    pub now_playing_item: Option<NowPlayingFields>,
    pub play_state: Option<PlayStateFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NowPlayingFields {
    pub run_time_ticks: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PlayStateFields {
    pub position_ticks: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UserFields {
    pub id: Option<String>,
}
