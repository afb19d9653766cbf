//! Core data models for family-budget
//!
//! This module contains the data structures of the bookkeeping domain:
//! ledger accounts, transactions with their bookings and payments,
//! external documents, money amounts and report periods.

pub mod account;
pub mod document;
pub mod money;
pub mod period;
pub mod transaction;

pub use account::{AccountKind, AccountTable, LedgerAccount};
pub use document::{Document, DocumentCollection, DocumentLine};
pub use money::{Money, MoneyParseError};
pub use period::{DateRange, PeriodChunks, MAX_CHUNK_DAYS};
pub use transaction::{DirectBooking, DocumentKind, PaymentRecord, Transaction};
