//! Service layer for family-budget
//!
//! The service layer turns raw bookkeeping data into the family budget:
//! chunked fetching, document resolution, categorization, hierarchy rollup
//! and the budget calculation, tied together by [`BudgetRun`].

pub mod budget;
pub mod categorize;
pub mod documents;
pub mod fetch;
pub mod hierarchy;
pub mod run;

pub use budget::{BudgetCalculator, BudgetFigures, BudgetUsage, RevenueSource, TaxRates};
pub use categorize::{Categorization, CategorizationEngine, CategorizationStats, CategoryTotals};
pub use documents::{DocumentCache, DocumentResolver, ResolvedDocuments};
pub use fetch::TransactionFetcher;
pub use hierarchy::{find_root, HierarchyAggregator, RootTotal, RootTotals, RootWalk};
pub use run::{BudgetRun, RunRequest};
