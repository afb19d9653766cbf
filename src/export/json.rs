//! JSON Export functionality
//!
//! Exports the detail of a monthly run to JSON with schema versioning.
//! Amounts are integer cents.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, Transaction};
use crate::reports::{CategoryLine, MonthlyReport, RunStats};
use crate::services::{BudgetFigures, RootTotals};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Detail of one monthly run
#[derive(Debug, Clone, Serialize)]
pub struct FinancialExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    pub period_start: NaiveDate,
    pub period_end: NaiveDate,

    pub stats: &'a RunStats,

    /// Account kind → account name → total
    pub totals: BTreeMap<String, BTreeMap<String, Money>>,

    /// Every categorized account with id, kind and root
    pub categories: &'a [CategoryLine],

    /// Root category totals, largest first
    pub root_totals: &'a RootTotals,

    pub budget: &'a BudgetFigures,

    /// Raw transactions of the period
    pub transactions: &'a [Transaction],
}

impl<'a> FinancialExport<'a> {
    /// Build the export view of a report
    pub fn from_report(report: &'a MonthlyReport) -> Self {
        let mut totals: BTreeMap<String, BTreeMap<String, Money>> = BTreeMap::new();
        for line in &report.categories {
            *totals
                .entry(line.kind.to_string())
                .or_default()
                .entry(line.name.clone())
                .or_default() += line.amount;
        }

        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            period_start: report.period.start,
            period_end: report.period.end,
            stats: &report.stats,
            totals,
            categories: &report.categories,
            root_totals: &report.root_totals,
            budget: &report.budget,
            transactions: &report.transactions,
        }
    }
}

/// Export a report to JSON
pub fn export_json<W: Write>(
    report: &MonthlyReport,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let export = FinancialExport::from_report(report);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}
