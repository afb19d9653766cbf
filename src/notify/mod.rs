//! Chat delivery of the monthly summary

pub mod telegram;

pub use telegram::TelegramNotifier;

use crate::error::BudgetResult;

/// Posts the report summary, with the chart when there is one
pub trait Notifier {
    fn send(&self, message: &str, chart_png: Option<&[u8]>) -> BudgetResult<()>;
}
