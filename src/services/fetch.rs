//! Transaction fetching
//!
//! Walks a report period chunk by chunk, strictly in order, pausing between
//! chunks to stay under the upstream rate limit. Any failed chunk aborts the
//! fetch.

use std::thread;
use std::time::Duration;

use crate::api::BookkeepingApi;
use crate::error::BudgetResult;
use crate::models::{DateRange, Transaction};

/// Service for sequential, throttled transaction retrieval
pub struct TransactionFetcher<'a> {
    api: &'a dyn BookkeepingApi,
    chunk_days: u32,
    delay: Duration,
}

impl<'a> TransactionFetcher<'a> {
    /// Create a fetcher
    pub fn new(api: &'a dyn BookkeepingApi, chunk_days: u32, delay: Duration) -> Self {
        Self {
            api,
            chunk_days,
            delay,
        }
    }

    /// Fetch every transaction in `period`, in chunk order
    pub fn fetch(&self, period: &DateRange) -> BudgetResult<Vec<Transaction>> {
        let mut all = Vec::new();

        for (index, chunk) in period.chunks_of(self.chunk_days).enumerate() {
            if index > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }

            let transactions = self.api.financial_mutations(&chunk).map_err(|e| {
                tracing::error!(
                    chunk = index + 1,
                    range = %chunk,
                    error = %e,
                    "Failed to fetch transaction chunk"
                );
                e
            })?;

            tracing::info!(
                chunk = index + 1,
                range = %chunk,
                count = transactions.len(),
                "Fetched transaction chunk"
            );
            all.extend(transactions);
        }

        tracing::info!(total = all.len(), "Fetched all transactions");
        Ok(all)
    }
}
