//! External document model (purchase invoices, receipts)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Upstream collection a document can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCollection {
    PurchaseInvoices,
    Receipts,
}

impl DocumentCollection {
    /// Collections in the order they are fetched
    pub const FETCH_ORDER: [DocumentCollection; 2] = [Self::PurchaseInvoices, Self::Receipts];

    /// Path segment used by the upstream API
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::PurchaseInvoices => "purchase_invoices",
            Self::Receipts => "receipts",
        }
    }
}

impl fmt::Display for DocumentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PurchaseInvoices => write!(f, "purchase invoices"),
            Self::Receipts => write!(f, "receipts"),
        }
    }
}

/// One line of a document
///
/// Amounts use the document convention: positive for both revenue and
/// expense lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLine {
    #[serde(default)]
    pub account_id: String,
    pub amount: Money,
}

impl DocumentLine {
    pub fn new(account_id: impl Into<String>, amount: Money) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
        }
    }
}

/// A fetched document with its ordered line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub lines: Vec<DocumentLine>,
}

impl Document {
    pub fn new(id: impl Into<String>, lines: Vec<DocumentLine>) -> Self {
        Self {
            id: id.into(),
            lines,
        }
    }
}
