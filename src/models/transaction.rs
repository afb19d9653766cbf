//! Transaction model
//!
//! A transaction is one bank-ledger event ("financial mutation"). It is
//! categorized either directly through bookings, or indirectly through
//! payments that point at an invoice or a document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// What a payment record points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A sales invoice; the payment is revenue
    SalesInvoice,
    /// A purchase invoice or receipt whose line items carry the categories
    GenericDocument,
    /// Anything else; only the payment's own ledger account is known
    Other,
}

impl DocumentKind {
    /// Map an upstream `invoice_type` value onto a kind
    pub fn from_invoice_type(s: &str) -> Self {
        match s {
            "SalesInvoice" => Self::SalesInvoice,
            "Document" => Self::GenericDocument,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SalesInvoice => write!(f, "sales invoice"),
            Self::GenericDocument => write!(f, "document"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A transaction line booked straight onto a ledger account
///
/// The amount is signed by accounting convention: expenses negative,
/// income positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectBooking {
    pub account_id: String,
    pub amount: Money,
}

impl DirectBooking {
    pub fn new(account_id: impl Into<String>, amount: Money) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
        }
    }
}

/// A transaction line that settles an external document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// What the referenced document is
    pub document_kind: DocumentKind,

    /// Identifier of the referenced document
    pub document_id: String,

    /// Paid amount, not sign-adjusted
    pub amount: Money,

    /// Ledger account of the payment itself (usually a bank/clearing account)
    #[serde(default)]
    pub fallback_account_id: String,
}

impl PaymentRecord {
    pub fn new(document_kind: DocumentKind, document_id: impl Into<String>, amount: Money) -> Self {
        Self {
            document_kind,
            document_id: document_id.into(),
            amount,
            fallback_account_id: String::new(),
        }
    }

    /// Builder-style fallback account assignment
    pub fn with_fallback_account(mut self, account_id: impl Into<String>) -> Self {
        self.fallback_account_id = account_id.into();
        self
    }
}

/// A bank-ledger event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Upstream identifier
    pub id: String,

    /// Booking date
    pub date: NaiveDate,

    /// Total amount of the bank mutation
    #[serde(default)]
    pub amount: Money,

    /// Bank description / message
    #[serde(default)]
    pub message: String,

    /// Direct categorizations
    #[serde(default)]
    pub bookings: Vec<DirectBooking>,

    /// Document settlements
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl Transaction {
    /// Create an empty transaction on a date
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            amount: Money::zero(),
            message: String::new(),
            bookings: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Builder-style booking
    pub fn with_booking(mut self, account_id: impl Into<String>, amount: Money) -> Self {
        self.bookings.push(DirectBooking::new(account_id, amount));
        self
    }

    /// Builder-style payment
    pub fn with_payment(mut self, payment: PaymentRecord) -> Self {
        self.payments.push(payment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_mapping() {
        assert_eq!(
            DocumentKind::from_invoice_type("SalesInvoice"),
            DocumentKind::SalesInvoice
        );
        assert_eq!(
            DocumentKind::from_invoice_type("Document"),
            DocumentKind::GenericDocument
        );
        assert_eq!(
            DocumentKind::from_invoice_type("ExternalSalesInvoice"),
            DocumentKind::Other
        );
        assert_eq!(DocumentKind::from_invoice_type(""), DocumentKind::Other);
    }

    #[test]
    fn test_builder() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let txn = Transaction::new("m1", date)
            .with_booking("a1", Money::from_cents(-1250))
            .with_payment(
                PaymentRecord::new(DocumentKind::Other, "x", Money::from_cents(100))
                    .with_fallback_account("bank"),
            );

        assert_eq!(txn.bookings[0].amount.cents(), -1250);
        assert_eq!(txn.payments[0].fallback_account_id, "bank");
        assert!(Transaction::new("m2", date).bookings.is_empty());
    }
}
