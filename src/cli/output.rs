//! Output formatting helpers for CLI commands

use crate::aggregate::{Plan, Policy, Snapshot};
use crate::upstream::UpstreamResult;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

/// One row of the snapshot summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeView {
    pub upstream: String,
    pub policy: Policy,
    pub status: OutcomeStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    /// An Optional target failed
    Degraded,
    /// A Critical target failed
    Failed,
}

/// Per-upstream outcomes, in plan order.
pub fn outcome_views(plan: &Plan, snapshot: &Snapshot) -> Vec<OutcomeView> {
    plan.entries()
        .iter()
        .map(|entry| {
            let name = entry.target.name();
            let (status, detail) = match snapshot.get(name) {
                Some(UpstreamResult::Success(_)) => (OutcomeStatus::Ok, String::new()),
                Some(UpstreamResult::Failure(reason)) => {
                    let status = match entry.policy {
                        Policy::Critical => OutcomeStatus::Failed,
                        Policy::Optional => OutcomeStatus::Degraded,
                    };
                    (status, reason.to_string())
                }
                None => (OutcomeStatus::Failed, "not settled".to_string()),
            };
            OutcomeView {
                upstream: name.to_string(),
                policy: entry.policy,
                status,
                detail,
            }
        })
        .collect()
}

/// Format outcomes as a table
pub fn format_outcomes_table(outcomes: &[OutcomeView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Upstream", "Policy", "Status", "Detail"]);

    for o in outcomes {
        let policy = match o.policy {
            Policy::Critical => "critical",
            Policy::Optional => "optional",
        };
        table.add_row(vec![
            Cell::new(&o.upstream),
            Cell::new(policy),
            Cell::new(status_label(o.status)),
            Cell::new(&o.detail),
        ]);
    }

    table.to_string()
}

fn status_label(status: OutcomeStatus) -> String {
    match status {
        OutcomeStatus::Ok => "OK".green().to_string(),
        OutcomeStatus::Degraded => "Degraded".yellow().to_string(),
        OutcomeStatus::Failed => "Failed".red().to_string(),
    }
}

/// Get status icon for an outcome
pub fn status_icon(status: OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Ok => "✓",
        OutcomeStatus::Degraded => "~",
        OutcomeStatus::Failed => "✗",
    }
}
