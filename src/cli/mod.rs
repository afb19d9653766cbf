//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod accounts;
pub mod config;
pub mod report;

pub use accounts::{handle_accounts_command, AccountsArgs};
pub use config::handle_config_command;
pub use report::{handle_report_command, ReportArgs};
