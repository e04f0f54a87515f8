//! Game-server console status and command replies.

use super::derivations::parse_player_list;
use super::read_payload;
use crate::aggregate::Snapshot;
use crate::catalog::names;
use crate::upstream::UpstreamResult;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const UNKNOWN_VERSION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinecraftStatus {
    pub online: bool,
    pub version: String,
    pub players: Vec<String>,
    /// Verbatim `list` reply; `None` when offline
    pub raw_list: Option<String>,
}

impl Default for MinecraftStatus {
    fn default() -> Self {
        Self {
            online: false,
            version: UNKNOWN_VERSION.to_string(),
            players: Vec::new(),
            raw_list: None,
        }
    }
}

pub fn shape_minecraft_status(snapshot: &Snapshot) -> MinecraftStatus {
    if !snapshot.succeeded(names::MINECRAFT_STATUS) {
        return MinecraftStatus::default();
    }

    let replies: HashMap<String, String> = read_payload(snapshot, names::MINECRAFT_STATUS);
    let list = replies.get("list").cloned().unwrap_or_default();
    let version = replies
        .get("version")
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_VERSION)
        .to_string();

    MinecraftStatus {
        online: true,
        version,
        players: parse_player_list(&list),
        raw_list: Some(list),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub response: String,
}

/// Reply to one forwarded console command.
///
/// Failures become `success: false` with an `Error: <reason>` response.
pub fn shape_command(command: &str, result: &UpstreamResult) -> CommandOutcome {
    match result {
        UpstreamResult::Success(payload) => CommandOutcome {
            success: true,
            response: payload
                .get(command)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        UpstreamResult::Failure(reason) => CommandOutcome {
            success: false,
            response: format!("Error: {}", reason),
        },
    }
}
