//! Export module for family-budget
//!
//! Writes the detail of a monthly run next to the chart:
//! - JSON: full run detail, machine-readable (default)
//! - CSV: category totals, spreadsheet-compatible
//! - YAML: full run detail, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub use self::csv::export_categories_csv;
pub use json::{export_json, FinancialExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;

use crate::config::paths::export_file;
use crate::error::{BudgetError, BudgetResult};
use crate::reports::MonthlyReport;

/// Export file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Yaml => "yaml",
        }
    }
}

/// Write `financial_data_YYYY-MM.<ext>` into `output_dir`
pub fn write_export(
    report: &MonthlyReport,
    format: ExportFormat,
    output_dir: &Path,
) -> BudgetResult<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| {
            BudgetError::Export(format!("Failed to create {}: {}", output_dir.display(), e))
        })?;

    let path = export_file(output_dir, &report.period, format.extension());
    let file = File::create(&path)
        .map_err(|e| BudgetError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => export_json(report, &mut writer, true)?,
        ExportFormat::Csv => export_categories_csv(report, &mut writer)?,
        ExportFormat::Yaml => export_yaml(report, &mut writer)?,
    }

    std::io::Write::flush(&mut writer).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(path)
}
