//! In-memory bookkeeping API for tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing_subscriber::fmt::MakeWriter;

use crate::api::BookkeepingApi;
use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AccountKind, DateRange, Document, DocumentCollection, DocumentKind, LedgerAccount, Money,
    PaymentRecord, Transaction,
};
use crate::reports::MonthlyReport;
use crate::services::{BudgetRun, RunRequest};

/// A call made against [`FakeApi`], in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LedgerAccounts,
    Mutations(DateRange),
    Documents(DocumentCollection, Vec<String>),
}

#[derive(Default)]
pub struct FakeApi {
    pub accounts: Vec<LedgerAccount>,
    pub transactions: Vec<Transaction>,
    pub documents: HashMap<DocumentCollection, Vec<Document>>,
    pub failing_collections: Vec<DocumentCollection>,
    pub failing_chunk_start: Option<NaiveDate>,
    pub fail_accounts: bool,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(mut self, collection: DocumentCollection, docs: Vec<Document>) -> Self {
        self.documents.insert(collection, docs);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl BookkeepingApi for FakeApi {
    fn ledger_accounts(&self) -> BudgetResult<Vec<LedgerAccount>> {
        self.calls.borrow_mut().push(Call::LedgerAccounts);
        if self.fail_accounts {
            return Err(BudgetError::Http("connection refused".into()));
        }
        Ok(self.accounts.clone())
    }

    fn financial_mutations(&self, range: &DateRange) -> BudgetResult<Vec<Transaction>> {
        self.calls.borrow_mut().push(Call::Mutations(*range));
        if self.failing_chunk_start == Some(range.start) {
            return Err(BudgetError::Api {
                status: 429,
                body: "Too many requests".into(),
            });
        }
        Ok(self
            .transactions
            .iter()
            .filter(|t| range.contains(t.date))
            .cloned()
            .collect())
    }

    fn documents(
        &self,
        collection: DocumentCollection,
        ids: &[String],
    ) -> BudgetResult<Vec<Document>> {
        self.calls
            .borrow_mut()
            .push(Call::Documents(collection, ids.to_vec()));
        if self.failing_collections.contains(&collection) {
            return Err(BudgetError::Api {
                status: 500,
                body: "Internal server error".into(),
            });
        }
        Ok(self
            .documents
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| ids.contains(&d.id)).cloned().collect())
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A small chart of accounts: revenue, two business expenses, and a
/// family tree "Wonen" (Huur, Energie) plus "Boodschappen"
pub fn sample_accounts() -> Vec<LedgerAccount> {
    vec![
        LedgerAccount::new("rev", "Omzet", AccountKind::Revenue),
        LedgerAccount::new("exp-sw", "Software", AccountKind::Expense),
        LedgerAccount::new("exp-tr", "Reiskosten", AccountKind::Expense),
        LedgerAccount::new("fam-wonen", "Wonen", AccountKind::Equity),
        LedgerAccount::new("fam-huur", "Huur", AccountKind::Equity).with_parent("fam-wonen"),
        LedgerAccount::new("fam-energie", "Energie", AccountKind::Equity).with_parent("fam-wonen"),
        LedgerAccount::new("fam-bood", "Boodschappen", AccountKind::Equity),
        LedgerAccount::new("bank", "Bankrekening", AccountKind::Other),
    ]
}

/// A March 2025 report: 12850.20 revenue, 2000.00 business expenses and
/// 2300.00 family spending across "Wonen" and "Boodschappen"
pub fn sample_report() -> MonthlyReport {
    let mut api = FakeApi::new();
    api.accounts = sample_accounts();
    api.transactions = vec![
        Transaction::new("m1", date(2025, 3, 3)).with_payment(PaymentRecord::new(
            DocumentKind::SalesInvoice,
            "si1",
            Money::from_cents(1_285_020),
        )),
        Transaction::new("m2", date(2025, 3, 4))
            .with_booking("exp-sw", Money::from_cents(-200_000)),
        Transaction::new("m3", date(2025, 3, 5))
            .with_booking("fam-huur", Money::from_cents(-150_000))
            .with_booking("fam-energie", Money::from_cents(-20_000))
            .with_booking("fam-bood", Money::from_cents(-60_000)),
    ];
    let settings = Settings {
        chunk_delay_ms: 0,
        ..Settings::default()
    };

    BudgetRun::new(&api, &settings)
        .execute(&RunRequest::new(DateRange::new(date(2025, 3, 1), date(2025, 3, 31))))
        .unwrap()
}

/// Shared in-memory sink for captured log output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` under a thread-local subscriber and return what it logged
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
