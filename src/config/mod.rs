//! Configuration module for family-budget
//!
//! This module provides configuration management including:
//! - Config directory resolution
//! - User settings with environment overrides
//! - Secret handling for API tokens

pub mod paths;
pub mod secret;
pub mod settings;

pub use paths::BudgetPaths;
pub use secret::SecretString;
pub use settings::Settings;
