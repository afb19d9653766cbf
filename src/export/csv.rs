//! CSV Export functionality
//!
//! Exports the category totals of a monthly run, one row per account.

use std::io::Write;

use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::reports::MonthlyReport;

#[derive(Serialize)]
struct CategoryRecord<'a> {
    account_id: &'a str,
    name: &'a str,
    kind: String,
    root: &'a str,
    amount: String,
}

/// Export the category totals to CSV
pub fn export_categories_csv<W: Write>(report: &MonthlyReport, writer: W) -> BudgetResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for line in &report.categories {
        csv_writer
            .serialize(CategoryRecord {
                account_id: &line.account_id,
                name: &line.name,
                kind: line.kind.to_string(),
                root: line.root.as_deref().unwrap_or(""),
                amount: line.amount.to_string(),
            })
            .map_err(|e| BudgetError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}
