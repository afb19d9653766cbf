//! Path management for family-budget
//!
//! ## Path Resolution Order
//!
//! 1. `FAMILY_BUDGET_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (e.g. `~/.config/family-budget` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::BudgetError;
use crate::models::DateRange;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "FAMILY_BUDGET_CONFIG_DIR";

/// Manages all paths used by family-budget
#[derive(Debug, Clone)]
pub struct BudgetPaths {
    /// Directory holding `config.json`
    config_dir: PathBuf,
}

impl BudgetPaths {
    /// Resolve the config directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "family-budget")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    BudgetError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { config_dir })
    }

    /// Create paths with a custom config directory (useful for testing)
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.config_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create config directory: {}", e)))
    }
}

/// Chart image path for a period, e.g. `budget_chart_2025-03.png`
pub fn chart_file(output_dir: &Path, period: &DateRange) -> PathBuf {
    output_dir.join(format!("budget_chart_{}.png", period.month_key()))
}

/// Data export path for a period, e.g. `financial_data_2025-03.json`
pub fn export_file(output_dir: &Path, period: &DateRange, extension: &str) -> PathBuf {
    output_dir.join(format!("financial_data_{}.{}", period.month_key(), extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_custom_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_config_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.config_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let paths = BudgetPaths::with_config_dir(nested.clone());

        paths.ensure_directories().unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_output_file_names() {
        let period = DateRange::month_to_date(NaiveDate::from_ymd_opt(2025, 3, 18).unwrap());
        let dir = Path::new("/tmp/out");

        assert_eq!(
            chart_file(dir, &period),
            PathBuf::from("/tmp/out/budget_chart_2025-03.png")
        );
        assert_eq!(
            export_file(dir, &period, "csv"),
            PathBuf::from("/tmp/out/financial_data_2025-03.csv")
        );
    }
}
