//! Degradation policy and target sets.

use crate::upstream::UpstreamTarget;
use serde::Serialize;

/// How a failed call affects the whole aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Failure turns the whole aggregate into an error
    Critical,
    /// Failure is recorded in the snapshot and defaulted by the shaper
    Optional,
}

/// A target together with its declared policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTarget {
    pub target: UpstreamTarget,
    pub policy: Policy,
}

/// The set of targets one aggregate request settles.
///
/// Names are unique: adding a target whose name is already planned replaces
/// the earlier entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    entries: Vec<PlannedTarget>,
    require_any_success: bool,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, target: UpstreamTarget, policy: Policy) -> Self {
        let entry = PlannedTarget { target, policy };
        match self
            .entries
            .iter_mut()
            .find(|e| e.target.name() == entry.target.name())
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn critical(self, target: UpstreamTarget) -> Self {
        self.add(target, Policy::Critical)
    }

    pub fn optional(self, target: UpstreamTarget) -> Self {
        self.add(target, Policy::Optional)
    }

    /// Fail the aggregate when not a single target succeeds.
    pub fn require_any_success(mut self) -> Self {
        self.require_any_success = true;
        self
    }

    pub fn requires_any_success(&self) -> bool {
        self.require_any_success
    }

    pub fn entries(&self) -> &[PlannedTarget] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.target.name())
    }

    pub fn policy_of(&self, name: &str) -> Option<Policy> {
        self.entries
            .iter()
            .find(|e| e.target.name() == name)
            .map(|e| e.policy)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
