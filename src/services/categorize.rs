//! Categorization engine
//!
//! Reconciles the two ways the bookkeeping system classifies a transaction
//! into one per-account ledger:
//!
//! - direct bookings carry an account and an amount already signed by
//!   accounting convention (expenses negative), and are added as-is;
//! - payments reference a document. Sales-invoice payments are revenue.
//!   Generic-document payments are resolved through the document's line
//!   items, whose amounts are positive for expenses too, so each line amount
//!   is **subtracted** from its account. Any other payment is credited to its
//!   own ledger account, which is usually a bank or clearing account; those
//!   totals are low confidence and tracked separately.

use std::collections::BTreeMap;

use serde::Serialize;

use super::documents::DocumentCache;
use crate::models::{AccountKind, AccountTable, DocumentKind, Money, Transaction};

/// Account id → accumulated signed amount for the run
///
/// Only accounts that received at least one contribution have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTotals {
    totals: BTreeMap<String, Money>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, account_id: &str, amount: Money) {
        *self.totals.entry(account_id.to_string()).or_default() += amount;
    }

    pub fn subtract(&mut self, account_id: &str, amount: Money) {
        *self.totals.entry(account_id.to_string()).or_default() -= amount;
    }

    pub fn get(&self, account_id: &str) -> Option<Money> {
        self.totals.get(account_id).copied()
    }

    /// Total for an account, zero when it has no entry
    pub fn amount(&self, account_id: &str) -> Money {
        self.get(account_id).unwrap_or_default()
    }

    /// Iterate in account id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.totals.iter().map(|(id, amount)| (id.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of the totals of every known account of `kind`
    pub fn sum_by_kind(&self, accounts: &AccountTable, kind: AccountKind) -> Money {
        self.iter()
            .filter(|(id, _)| accounts.get(id).map(|a| a.kind) == Some(kind))
            .map(|(_, amount)| amount)
            .sum()
    }
}

/// Counters describing how the transactions were categorized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizationStats {
    pub transactions: usize,
    pub bookings: usize,
    pub sales_payments: usize,
    pub document_payments: usize,
    /// Generic-document payments whose document was not in the cache
    pub skipped_payments: usize,
    /// Other-kind payments credited to their own ledger account
    pub fallback_payments: usize,
    pub fallback_amount: Money,
    /// Other-kind payments without any account; contribute nothing
    pub unassigned_payments: usize,
}

impl CategorizationStats {
    pub fn payments_processed(&self) -> usize {
        self.sales_payments + self.document_payments + self.fallback_payments
    }

    pub fn has_low_confidence(&self) -> bool {
        self.fallback_payments > 0
    }
}

/// Result of categorizing a period
#[derive(Debug, Clone, Default)]
pub struct Categorization {
    pub totals: CategoryTotals,
    pub stats: CategorizationStats,
    /// Per fallback account, the amount credited through the low-confidence path
    pub low_confidence: BTreeMap<String, Money>,
}

/// Converts transactions into per-account totals
pub struct CategorizationEngine<'a> {
    documents: &'a DocumentCache,
    revenue_account_id: &'a str,
}

impl<'a> CategorizationEngine<'a> {
    /// Create an engine crediting sales-invoice payments to `revenue_account_id`
    pub fn new(documents: &'a DocumentCache, revenue_account_id: &'a str) -> Self {
        Self {
            documents,
            revenue_account_id,
        }
    }

    /// Categorize every transaction
    pub fn categorize(&self, transactions: &[Transaction]) -> Categorization {
        let mut result = Categorization::default();

        for transaction in transactions {
            self.categorize_one(transaction, &mut result);
        }

        tracing::info!(
            bookings = result.stats.bookings,
            payments = result.stats.payments_processed(),
            skipped = result.stats.skipped_payments,
            categories = result.totals.len(),
            "Categorized transactions"
        );
        if result.stats.has_low_confidence() {
            tracing::warn!(
                count = result.stats.fallback_payments,
                amount = %result.stats.fallback_amount,
                "Payments credited to their own ledger account; these totals are low confidence"
            );
        }

        result
    }

    fn categorize_one(&self, transaction: &Transaction, result: &mut Categorization) {
        let totals = &mut result.totals;
        let stats = &mut result.stats;
        stats.transactions += 1;

        for booking in &transaction.bookings {
            totals.add(&booking.account_id, booking.amount);
            stats.bookings += 1;
        }

        for payment in &transaction.payments {
            match payment.document_kind {
                DocumentKind::SalesInvoice => {
                    totals.add(self.revenue_account_id, payment.amount);
                    stats.sales_payments += 1;
                }
                DocumentKind::GenericDocument => match self.documents.get(&payment.document_id) {
                    Some(lines) => {
                        for line in lines.iter().filter(|l| !l.account_id.is_empty()) {
                            totals.subtract(&line.account_id, line.amount);
                        }
                        stats.document_payments += 1;
                    }
                    None => {
                        tracing::debug!(
                            transaction = %transaction.id,
                            document = %payment.document_id,
                            "Document not available, payment skipped"
                        );
                        stats.skipped_payments += 1;
                    }
                },
                DocumentKind::Other => {
                    if payment.fallback_account_id.is_empty() {
                        stats.unassigned_payments += 1;
                        continue;
                    }
                    totals.add(&payment.fallback_account_id, payment.amount);
                    *result
                        .low_confidence
                        .entry(payment.fallback_account_id.clone())
                        .or_default() += payment.amount;
                    stats.fallback_payments += 1;
                    stats.fallback_amount += payment.amount;
                }
            }
        }
    }
}
