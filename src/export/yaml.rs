//! YAML Export functionality
//!
//! Exports the detail of a monthly run to YAML for human reading.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::FinancialExport;
use crate::reports::MonthlyReport;

/// Export a report to YAML
pub fn export_yaml<W: Write>(report: &MonthlyReport, writer: &mut W) -> BudgetResult<()> {
    let export = FinancialExport::from_report(report);

    writeln!(writer, "# family-budget export for {}", report.period.month_label())
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer, "# Amounts are in cents.").map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}
