//! Snapshot command implementation

use crate::aggregate::{apply_policy, AggregateError, Aggregator};
use crate::api::ApiError;
use crate::catalog::TargetCatalog;
use crate::cli::output::{format_outcomes_table, outcome_views, status_icon, OutcomeStatus};
use crate::cli::serve::load_config;
use crate::cli::SnapshotArgs;
use crate::pages::Page;
use crate::telemetry::SysinfoProbe;
use crate::upstream::{Upstream, UpstreamClient};
use chrono::Utc;
use colored::Colorize;
use std::sync::Arc;

/// Rendered output of one page aggregate.
#[derive(Debug)]
pub struct SnapshotReport {
    pub output: String,
    /// Set when the page's policy rejected the aggregate
    pub failure: Option<AggregateError>,
}

/// Handle `homelab snapshot` command
///
/// Prints the report and fails when a critical upstream failed.
pub async fn handle_snapshot(args: &SnapshotArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let client = UpstreamClient::new(
        config.services.minecraft.clone(),
        Arc::new(SysinfoProbe::new()),
    )?;
    let catalog = TargetCatalog::from_config(&config);

    let report = run_snapshot(args.page, &catalog, Arc::new(client), args.json).await?;
    println!("{}", report.output);

    match report.failure {
        Some(e) => Err(anyhow::anyhow!("{} page failed: {}", args.page, e)),
        None => Ok(()),
    }
}

/// Aggregate `page` once and render it.
pub async fn run_snapshot(
    page: Page,
    catalog: &TargetCatalog,
    upstream: Arc<dyn Upstream>,
    json: bool,
) -> anyhow::Result<SnapshotReport> {
    let plan = page.plan(catalog, Utc::now());
    let snapshot = Aggregator::new(upstream).collect(&plan).await;
    let outcomes = outcome_views(&plan, &snapshot);

    let (view, failure) = match apply_policy(&plan, snapshot) {
        Ok(snapshot) => (Some(page.render(&snapshot)), None),
        Err(e) => (None, Some(e)),
    };

    let output = if json {
        match &view {
            Some(view) => serde_json::to_string_pretty(view)?,
            None => serde_json::to_string_pretty(&ApiError::page_failure(page))?,
        }
    } else {
        let succeeded = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Ok)
            .count();
        let headline = format!(
            "{} {}: {}/{} upstreams succeeded",
            if failure.is_some() {
                status_icon(OutcomeStatus::Failed)
            } else {
                status_icon(OutcomeStatus::Ok)
            },
            page.name().bold(),
            succeeded,
            outcomes.len()
        );
        format!("{}\n{}", headline, format_outcomes_table(&outcomes))
    };

    Ok(SnapshotReport { output, failure })
}
