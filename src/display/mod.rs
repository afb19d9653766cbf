//! Display formatting for terminal output
//!
//! Provides tree and table views of the ledger accounts. The report text
//! itself lives with [`crate::reports::MonthlyReport`].

pub mod account;

pub use account::{format_account_table, format_account_tree};
