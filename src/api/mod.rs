//! Bookkeeping API access
//!
//! The engine only talks to [`BookkeepingApi`]; [`MoneybirdClient`] is the
//! networked implementation.

pub mod moneybird;
pub mod wire;

pub use moneybird::MoneybirdClient;

use crate::error::BudgetResult;
use crate::models::{DateRange, Document, DocumentCollection, LedgerAccount, Transaction};

/// Read access to the bookkeeping system
///
/// Every call is blocking and independent; callers decide ordering and pacing.
pub trait BookkeepingApi {
    /// All ledger accounts of the administration
    fn ledger_accounts(&self) -> BudgetResult<Vec<LedgerAccount>>;

    /// Transactions booked within `range` (inclusive)
    fn financial_mutations(&self, range: &DateRange) -> BudgetResult<Vec<Transaction>>;

    /// Documents from one collection, fetched by id in a single call
    ///
    /// Ids the collection does not know are simply absent from the result.
    fn documents(
        &self,
        collection: DocumentCollection,
        ids: &[String],
    ) -> BudgetResult<Vec<Document>>;
}
