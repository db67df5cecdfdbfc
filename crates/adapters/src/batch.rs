//! Batch orchestration for multi-item writes.
//!
//! Each item is processed independently with bounded concurrency. One item's
//! failure never aborts the others, and every item lands in exactly one list
//! of the returned [`BatchReport`], in input order.
//!
//! Concurrency only overlaps requests; each request still acquires from the
//! adapter's shared rate limiter.

use std::future::Future;

use futures::stream::{self, StreamExt};
use marketsync_core::{BatchReport, MarketplaceError};
use tracing::{info, warn};

/// Default number of items processed concurrently.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Drives a batch of independent item operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOrchestrator {
    concurrency: usize,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_CONCURRENCY)
    }
}

impl BatchOrchestrator {
    /// Create an orchestrator; `concurrency` is clamped to at least 1.
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Items processed at once.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `op` for every item and account for each outcome.
    ///
    /// `id` extracts the identifier recorded in the report (usually the SKU).
    pub fn run<'a, T, I, F, Fut>(
        &self,
        operation: &'static str,
        items: &'a [T],
        id: I,
        op: F,
    ) -> impl Future<Output = BatchReport>
    where
        I: Fn(&T) -> String,
        F: Fn(&'a T) -> Fut,
        Fut: Future<Output = Result<(), MarketplaceError>>,
    {
        // Item futures are created up front; the returned future holds
        // neither `id` nor `op`, so it is `Send` whenever `Fut` is.
        let mut pending = Vec::with_capacity(items.len());
        for item in items {
            let item_id = id(item);
            let fut = op(item);
            pending.push(async move { (item_id, fut.await) });
        }
        let concurrency = self.concurrency;

        async move {
            let mut report = BatchReport::new();
            let mut outcomes = stream::iter(pending).buffered(concurrency);

            while let Some((item_id, outcome)) = outcomes.next().await {
                if let Err(e) = &outcome {
                    warn!(operation, item = %item_id, error = %e, "Batch item failed");
                }
                report.record(item_id, &outcome);
            }

            info!(
                operation,
                total = report.total(),
                succeeded = report.successful.len(),
                failed = report.failed.len(),
                "Batch complete"
            );
            report
        }
    }
}
