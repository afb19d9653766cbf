//! Wire records of the Moneybird API
//!
//! These mirror the JSON the API returns, with every field the budget does
//! not need left out. Conversion into the domain models happens here, and
//! that is where textual amounts are parsed.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{
    AccountKind, DirectBooking, Document, DocumentKind, DocumentLine, LedgerAccount, Money,
    PaymentRecord, Transaction,
};

#[derive(Debug, Clone, Deserialize)]
pub struct WireLedgerAccount {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub account_type: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl From<WireLedgerAccount> for LedgerAccount {
    fn from(wire: WireLedgerAccount) -> Self {
        LedgerAccount {
            kind: AccountKind::from_account_type(&wire.account_type),
            id: wire.id,
            name: wire.name,
            parent_id: wire.parent_id.filter(|p| !p.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePayment {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub invoice_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub invoice_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price: String,
    #[serde(default)]
    pub ledger_account_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireBooking {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ledger_account_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireFinancialMutation {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub amount: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payments: Vec<WirePayment>,
    #[serde(default)]
    pub ledger_account_bookings: Vec<WireBooking>,
}

impl WireFinancialMutation {
    /// Convert into a domain transaction, parsing amounts leniently
    pub fn into_transaction(self) -> Transaction {
        let amount = lenient_amount(&self.amount, "mutation", &self.id);

        let bookings = self
            .ledger_account_bookings
            .into_iter()
            .map(|b| {
                let amount = lenient_amount(&b.price, "booking", &b.id);
                DirectBooking::new(b.ledger_account_id, amount)
            })
            .collect();

        let payments = self
            .payments
            .into_iter()
            .map(|p| {
                let amount = lenient_amount(&p.price, "payment", &p.id);
                let kind = DocumentKind::from_invoice_type(&p.invoice_type);
                PaymentRecord::new(kind, p.invoice_id, amount)
                    .with_fallback_account(p.ledger_account_id.unwrap_or_default())
            })
            .collect();

        Transaction {
            id: self.id,
            date: self.date,
            amount,
            message: self.message.unwrap_or_default(),
            bookings,
            payments,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDocumentDetail {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default)]
    pub ledger_account_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDocument {
    pub id: String,
    #[serde(default)]
    pub details: Vec<WireDocumentDetail>,
}

impl From<WireDocument> for Document {
    fn from(wire: WireDocument) -> Self {
        let lines = wire
            .details
            .into_iter()
            .map(|d| {
                let amount = lenient_amount(&d.price, "document detail", &d.id);
                DocumentLine::new(d.ledger_account_id.unwrap_or_default(), amount)
            })
            .collect();
        Document::new(wire.id, lines)
    }
}

/// `null` and absent string fields both read as empty
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a document synchronization request
#[derive(Debug, Serialize)]
pub struct SynchronizationRequest<'a> {
    pub ids: &'a [String],
}

/// Parse an amount field; unparsable input is logged and counts as zero
pub fn lenient_amount(raw: &str, record: &str, record_id: &str) -> Money {
    if raw.trim().is_empty() {
        return Money::zero();
    }
    match Money::parse(raw) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(
                record,
                record_id,
                raw,
                error = %e,
                "Unparsable amount, treating as zero"
            );
            Money::zero()
        }
    }
}
