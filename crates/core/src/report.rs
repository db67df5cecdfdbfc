//! Per-item accounting for batch write operations.

use serde::{Deserialize, Serialize};

use crate::error::MarketplaceError;

/// A single failed item in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Identifier of the item as supplied by the caller (usually the SKU).
    pub id: String,
    /// Why the item failed.
    pub reason: String,
}

/// Success/failure accounting returned by batch writes.
///
/// Built incrementally while a batch runs. Once the batch completes every
/// input identifier appears in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Identifiers that were written successfully.
    pub successful: Vec<String>,
    /// Identifiers that failed, with reasons.
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Create an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            successful: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Report where every id failed for the same reason.
    ///
    /// Used when the whole batch fails before any item is processed
    /// (for example, the adapter is not initialized).
    #[must_use]
    pub fn all_failed<I, S>(ids: I, error: &MarketplaceError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reason = error.to_string();
        Self {
            successful: Vec::new(),
            failed: ids
                .into_iter()
                .map(|id| BatchFailure {
                    id: id.into(),
                    reason: reason.clone(),
                })
                .collect(),
        }
    }

    /// Record a successful item.
    pub fn record_success(&mut self, id: impl Into<String>) {
        self.successful.push(id.into());
    }

    /// Record a failed item.
    pub fn record_failure(&mut self, id: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(BatchFailure {
            id: id.into(),
            reason: reason.into(),
        });
    }

    /// Record the outcome of one item.
    pub fn record<T>(&mut self, id: impl Into<String>, outcome: &Result<T, MarketplaceError>) {
        match outcome {
            Ok(_) => self.record_success(id),
            Err(e) => self.record_failure(id, e.to_string()),
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.successful.extend(other.successful);
        self.failed.extend(other.failed);
    }

    /// Total number of items accounted for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    /// Whether every item succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Failure reason for an id, if it failed.
    #[must_use]
    pub fn failure_reason(&self, id: &str) -> Option<&str> {
        self.failed
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.reason.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut report = BatchReport::new();
        report.record("A", &Ok::<(), MarketplaceError>(()));
        report.record::<()>("B", &Err(MarketplaceError::NotFound("SKU B".to_string())));

        assert_eq!(report.successful, vec!["A".to_string()]);
        assert_eq!(report.failure_reason("B"), Some("Not found: SKU B"));
        assert_eq!(report.total(), 2);
        assert!(!report.is_success());
    }

    #[test]
    fn test_all_failed_accounts_for_every_id() {
        let report = BatchReport::all_failed(["A", "B", "C"], &MarketplaceError::NotInitialized);

        assert!(report.successful.is_empty());
        assert_eq!(report.failed.len(), 3);
        assert!(
            report
                .failed
                .iter()
                .all(|f| f.reason == "Adapter not initialized")
        );
    }

    #[test]
    fn test_merge() {
        let mut first = BatchReport::new();
        first.record_success("A");
        let mut second = BatchReport::new();
        second.record_failure("B", "boom");

        first.merge(second);
        assert_eq!(first.total(), 2);
        assert_eq!(first.failure_reason("B"), Some("boom"));
    }
}
