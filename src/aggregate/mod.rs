//! Fan-out aggregation with settle-all semantics.
//!
//! An [`Aggregator`] launches every target of a [`Plan`] at once, waits until
//! each has either succeeded or failed, and collects the outcomes into a
//! [`Snapshot`]. A failing call never cancels its siblings. Only after all
//! calls have settled is the degradation policy applied.

mod policy;
mod snapshot;


pub use policy::{Plan, PlannedTarget, Policy};
pub use snapshot::Snapshot;

use crate::upstream::{FailureReason, Upstream, UpstreamResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::task::AbortOnDropHandle;

/// Why an aggregate as a whole failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("critical upstream '{upstream}' failed: {reason}")]
    CriticalFailure {
        upstream: String,
        reason: FailureReason,
    },

    #[error("no upstream succeeded")]
    NoSuccess,
}

/// Runs plans against an [`Upstream`].
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Clone)]
pub struct Aggregator {
    upstream: Arc<dyn Upstream>,
}

impl Aggregator {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Settle every target in the plan without applying any policy.
    ///
    /// The returned snapshot's key set equals the plan's name set. Each call
    /// runs on its own task so a panicking upstream shows up as a failure for
    /// that name only. Dropping the returned future aborts calls still in
    /// flight.
    pub async fn collect(&self, plan: &Plan) -> Snapshot {
        let handles: Vec<_> = plan
            .entries()
            .iter()
            .map(|entry| {
                let upstream = Arc::clone(&self.upstream);
                let target = entry.target.clone();
                AbortOnDropHandle::new(tokio::spawn(async move {
                    upstream.invoke(&target).await
                }))
            })
            .collect();

        let settled = futures::future::join_all(handles).await;

        let results = plan
            .names()
            .zip(settled)
            .map(|(name, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    tracing::error!(upstream = %name, error = %e, "Upstream task aborted");
                    UpstreamResult::Failure(FailureReason::ProtocolError(format!(
                        "upstream task failed: {}",
                        e
                    )))
                });
                (name.to_string(), result)
            })
            .collect::<BTreeMap<_, _>>();

        Snapshot::new(results)
    }

    /// Settle the plan, then apply its degradation policy.
    ///
    /// Fails with [`AggregateError::CriticalFailure`] naming the first
    /// critical target (in plan order) that failed. When the plan requires
    /// at least one success and none occurred, fails with
    /// [`AggregateError::NoSuccess`]. Otherwise returns the full snapshot,
    /// optional failures included.
    pub async fn aggregate(&self, plan: &Plan) -> Result<Snapshot, AggregateError> {
        let start = Instant::now();
        let snapshot = self.collect(plan).await;

        tracing::debug!(
            targets = snapshot.len(),
            succeeded = snapshot.success_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Aggregate settled"
        );

        apply_policy(plan, snapshot)
    }
}

/// Apply a plan's policies to an already settled snapshot.
pub fn apply_policy(plan: &Plan, snapshot: Snapshot) -> Result<Snapshot, AggregateError> {
    let critical_failure = plan
        .entries()
        .iter()
        .filter(|e| e.policy == Policy::Critical)
        .find_map(|e| {
            snapshot
                .failure(e.target.name())
                .map(|reason| (e.target.name(), reason))
        });

    if let Some((upstream, reason)) = critical_failure {
        tracing::error!(upstream = %upstream, reason = %reason, "Critical upstream failed");
        return Err(AggregateError::CriticalFailure {
            upstream: upstream.to_string(),
            reason: reason.clone(),
        });
    }

    if plan.requires_any_success() && !plan.is_empty() && snapshot.success_count() == 0 {
        tracing::error!(targets = plan.len(), "Every upstream failed");
        return Err(AggregateError::NoSuccess);
    }

    Ok(snapshot)
}
