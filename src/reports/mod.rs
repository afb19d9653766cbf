//! Reports module for family-budget
//!
//! Provides the monthly family budget report and its text renderings.

pub mod monthly;

pub use monthly::{CategoryLine, MonthlyReport, RunStats};
