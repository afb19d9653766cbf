//! CLI command showing the resolved configuration

use std::fmt::Write as _;

use crate::config::settings::{API_TOKEN_ENV, TELEGRAM_TOKEN_ENV};
use crate::config::{BudgetPaths, SecretString, Settings};

/// Describe paths and settings; secrets only as set / not set
pub fn format_config(
    paths: &BudgetPaths,
    settings: &Settings,
    api_token_set: bool,
    bot_token_set: bool,
) -> String {
    let set = |flag: bool| if flag { "set" } else { "not set" };
    let mut out = String::new();

    let _ = writeln!(out, "family-budget Configuration");
    let _ = writeln!(out, "===========================");
    let _ = writeln!(out, "Config directory: {}", paths.config_dir().display());
    let _ = writeln!(out, "Settings file:    {}", paths.settings_file().display());
    let _ = writeln!(out);
    let _ = writeln!(out, "Settings:");
    let _ = writeln!(out, "  API base URL:      {}", settings.api_base_url);
    let _ = writeln!(
        out,
        "  Administration:    {}",
        settings.administration_id.as_deref().unwrap_or("(not set)")
    );
    let _ = writeln!(
        out,
        "  Revenue account:   {} ({})",
        settings.revenue_account_name, settings.revenue_account_kind
    );
    let _ = writeln!(out, "  VAT rate:          {}", settings.vat_rate);
    let _ = writeln!(out, "  Income tax rate:   {}", settings.income_tax_rate);
    let _ = writeln!(
        out,
        "  Fetch chunks:      {} days, {} ms apart",
        settings.chunk_days, settings.chunk_delay_ms
    );
    let _ = writeln!(out, "  Request timeout:   {} s", settings.request_timeout_secs);
    let _ = writeln!(out, "  Output directory:  {}", settings.output_dir.display());
    let _ = writeln!(
        out,
        "  Telegram chat:     {}",
        settings.telegram_chat_id.as_deref().unwrap_or("(not set)")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Secrets:");
    let _ = writeln!(out, "  {}: {}", API_TOKEN_ENV, set(api_token_set));
    let _ = writeln!(out, "  {}: {}", TELEGRAM_TOKEN_ENV, set(bot_token_set));

    out
}

/// Handle `family-budget config`
pub fn handle_config_command(paths: &BudgetPaths, settings: &Settings) {
    let api_token_set = SecretString::from_env(API_TOKEN_ENV).is_some();
    let bot_token_set = SecretString::from_env(TELEGRAM_TOKEN_ENV).is_some();
    print!("{}", format_config(paths, settings, api_token_set, bot_token_set));
}
