//! Settled outcomes of one aggregate request.

use crate::upstream::{FailureReason, UpstreamResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome per logical upstream name.
///
/// Holds exactly the names that were planned: failed calls are present as
/// [`UpstreamResult::Failure`], never dropped. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    results: BTreeMap<String, UpstreamResult>,
}

impl Snapshot {
    pub fn new(results: BTreeMap<String, UpstreamResult>) -> Self {
        Self { results }
    }

    pub fn get(&self, name: &str) -> Option<&UpstreamResult> {
        self.results.get(name)
    }

    /// Payload of a successful call; `None` for failures and unknown names.
    pub fn payload(&self, name: &str) -> Option<&Value> {
        self.results.get(name).and_then(UpstreamResult::payload)
    }

    pub fn succeeded(&self, name: &str) -> bool {
        self.results.get(name).is_some_and(UpstreamResult::is_success)
    }

    pub fn failure(&self, name: &str) -> Option<&FailureReason> {
        self.results.get(name).and_then(UpstreamResult::failure)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UpstreamResult)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn success_count(&self) -> usize {
        self.results.values().filter(|r| r.is_success()).count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Snapshot {
        let mut results = BTreeMap::new();
        results.insert("ok".to_string(), UpstreamResult::Success(json!({"n": 1})));
        results.insert(
            "down".to_string(),
            UpstreamResult::Failure(FailureReason::Timeout),
        );
        Snapshot::new(results)
    }

    #[test]
    fn test_lookup() {
        let snap = sample();
        assert!(snap.succeeded("ok"));
        assert!(!snap.succeeded("down"));
        assert!(!snap.succeeded("missing"));
        assert_eq!(snap.payload("ok").unwrap()["n"], 1);
        assert!(snap.payload("down").is_none());
        assert_eq!(snap.failure("down"), Some(&FailureReason::Timeout));
    }

    #[test]
    fn test_counts_and_names() {
        let snap = sample();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.success_count(), 1);
        assert_eq!(snap.names().collect::<Vec<_>>(), vec!["down", "ok"]);
    }
}
