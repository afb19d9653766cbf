//! family-budget - Monthly family budget from bookkeeping transactions
//!
//! This library reads a month of transactions from the Moneybird
//! bookkeeping API, reclassifies them into family spending categories,
//! backs VAT and income tax out of the revenue to find the disposable
//! family budget, and reports the result as text, a pie chart and a chat
//! message.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration, paths and secrets
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, documents, money)
//! - `api`: Bookkeeping API trait and the Moneybird client
//! - `services`: Fetching, categorization, rollup and budget calculation
//! - `reports`: The monthly report and its text renderings
//! - `chart`, `notify`, `export`: Report delivery
//! - `display`, `cli`: Terminal presentation and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use family_budget::api::MoneybirdClient;
//! use family_budget::config::{settings::api_token, BudgetPaths, Settings};
//! use family_budget::services::{BudgetRun, RunRequest};
//!
//! let paths = BudgetPaths::new()?;
//! let settings = Settings::resolve(&paths)?;
//! let client = MoneybirdClient::from_settings(&settings, api_token()?)?;
//! let report = BudgetRun::new(&client, &settings).execute(&RunRequest::new(period))?;
//! println!("{}", report.format_terminal());
//! ```

pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod notify;
pub mod reports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{BudgetError, BudgetResult};
