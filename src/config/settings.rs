//! User settings for family-budget
//!
//! Settings come from `config.json` in the config directory, with
//! environment variables layered on top. Credentials are only ever read
//! from the environment (or a `.env` file loaded into it).

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use super::secret::SecretString;
use crate::error::BudgetError;
use crate::models::{AccountKind, MAX_CHUNK_DAYS};

/// Bearer token for the bookkeeping API
pub const API_TOKEN_ENV: &str = "MONEYBIRD_API_TOKEN";
/// Administration (ledger) identifier
pub const ADMINISTRATION_ENV: &str = "MONEYBIRD_ADMINISTRATION_ID";
/// Telegram bot token
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
/// Telegram chat the summary is posted to
pub const TELEGRAM_CHAT_ENV: &str = "TELEGRAM_CHAT_ID";

/// User settings for family-budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the bookkeeping API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Administration whose books are read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administration_id: Option<String>,

    /// Name of the account sales-invoice payments are credited to
    #[serde(default = "default_revenue_account_name")]
    pub revenue_account_name: String,

    /// Kind of that account
    #[serde(default = "default_revenue_account_kind")]
    pub revenue_account_kind: AccountKind,

    /// VAT fraction backed out of gross revenue
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,

    /// Income-tax fraction applied to revenue excluding VAT
    #[serde(default = "default_income_tax_rate")]
    pub income_tax_rate: Decimal,

    /// Days per transaction fetch
    #[serde(default = "default_chunk_days")]
    pub chunk_days: u32,

    /// Pause between transaction fetches, in milliseconds
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,

    /// Per-request network timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Currency symbol used in reports
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Where the chart image and data export are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Telegram chat receiving the summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "https://moneybird.com/api/v2".to_string()
}

fn default_revenue_account_name() -> String {
    "Omzet".to_string()
}

fn default_revenue_account_kind() -> AccountKind {
    AccountKind::Revenue
}

fn default_vat_rate() -> Decimal {
    Decimal::new(21, 2)
}

fn default_income_tax_rate() -> Decimal {
    Decimal::new(30, 2)
}

fn default_chunk_days() -> u32 {
    MAX_CHUNK_DAYS
}

fn default_chunk_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_base_url: default_api_base_url(),
            administration_id: None,
            revenue_account_name: default_revenue_account_name(),
            revenue_account_kind: default_revenue_account_kind(),
            vat_rate: default_vat_rate(),
            income_tax_rate: default_income_tax_rate(),
            chunk_days: default_chunk_days(),
            chunk_delay_ms: default_chunk_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            currency_symbol: default_currency(),
            output_dir: default_output_dir(),
            telegram_chat_id: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_default(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BudgetError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Load settings and apply environment overrides, then validate
    pub fn resolve(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let mut settings = Self::load_or_default(paths)?;
        settings.apply_env();
        settings.validate()?;
        Ok(settings)
    }

    /// Apply non-secret environment overrides
    pub fn apply_env(&mut self) {
        if let Some(id) = non_empty_env(ADMINISTRATION_ENV) {
            self.administration_id = Some(id);
        }
        if let Some(chat) = non_empty_env(TELEGRAM_CHAT_ENV) {
            self.telegram_chat_id = Some(chat);
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), BudgetError> {
        let unit_range = |rate: Decimal| rate >= Decimal::ZERO && rate < Decimal::ONE;

        if !unit_range(self.vat_rate) {
            return Err(BudgetError::Config(format!(
                "vat_rate must be in [0, 1), got {}",
                self.vat_rate
            )));
        }
        if !unit_range(self.income_tax_rate) {
            return Err(BudgetError::Config(format!(
                "income_tax_rate must be in [0, 1), got {}",
                self.income_tax_rate
            )));
        }
        if self.chunk_days == 0 || self.chunk_days > MAX_CHUNK_DAYS {
            return Err(BudgetError::Config(format!(
                "chunk_days must be between 1 and {}, got {}",
                MAX_CHUNK_DAYS, self.chunk_days
            )));
        }
        if self.revenue_account_name.trim().is_empty() {
            return Err(BudgetError::Config(
                "revenue_account_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Administration id, required for any API call
    pub fn require_administration_id(&self) -> Result<&str, BudgetError> {
        self.administration_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                BudgetError::Config(format!(
                    "No administration configured. \
                     Set {} or administration_id in the settings file",
                    ADMINISTRATION_ENV
                ))
            })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BudgetError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            BudgetError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

/// The API bearer token from the environment
pub fn api_token() -> Result<SecretString, BudgetError> {
    SecretString::from_env(API_TOKEN_ENV).ok_or_else(|| {
        BudgetError::Config(format!(
            "{} environment variable not set. Usage: export {}='your-token-here'",
            API_TOKEN_ENV, API_TOKEN_ENV
        ))
    })
}

/// The Telegram bot token from the environment, if any
pub fn telegram_token() -> Option<SecretString> {
    SecretString::from_env(TELEGRAM_TOKEN_ENV)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.revenue_account_name, "Omzet");
        assert_eq!(settings.revenue_account_kind, AccountKind::Revenue);
        assert_eq!(settings.vat_rate, Decimal::new(21, 2));
        assert_eq!(settings.income_tax_rate, Decimal::new(30, 2));
        assert_eq!(settings.chunk_days, 7);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_config_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.administration_id = Some("341884047915484822".into());
        settings.chunk_delay_ms = 250;
        settings.vat_rate = Decimal::new(9, 2);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.administration_id.as_deref(), Some("341884047915484822"));
        assert_eq!(loaded.chunk_delay_ms, 250);
        assert_eq!(loaded.vat_rate, Decimal::new(9, 2));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_config_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"revenue_account_name": "Sales"}"#).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.revenue_account_name, "Sales");
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.request_timeout_secs, 10);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_config_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        let err = Settings::load_or_default(&paths).unwrap_err();
        assert!(matches!(err, BudgetError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.vat_rate = Decimal::ONE;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.income_tax_rate = Decimal::new(-1, 1);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.chunk_days = 8;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_require_administration_id() {
        let mut settings = Settings::default();
        assert!(settings.require_administration_id().is_err());
        settings.administration_id = Some("42".into());
        assert_eq!(settings.require_administration_id().unwrap(), "42");
    }
}
