//! Monthly run
//!
//! Drives one report run end to end: accounts, chunked transactions,
//! documents, categorization, hierarchy rollup and budget. Loading the
//! accounts, locating the revenue account and every transaction chunk are
//! required; anything else degrades the report instead of failing it.

use std::time::Duration;

use super::budget::{BudgetCalculator, TaxRates};
use super::categorize::CategorizationEngine;
use super::documents::DocumentResolver;
use super::fetch::TransactionFetcher;
use super::hierarchy::HierarchyAggregator;
use crate::api::BookkeepingApi;
use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{AccountKind, AccountTable, DateRange, Money};
use crate::reports::MonthlyReport;

/// What to report on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    pub period: DateRange,
    /// Operator-supplied gross revenue; replaces the computed revenue
    pub revenue_override: Option<Money>,
}

impl RunRequest {
    pub fn new(period: DateRange) -> Self {
        Self {
            period,
            revenue_override: None,
        }
    }

    pub fn with_revenue_override(mut self, revenue: Option<Money>) -> Self {
        self.revenue_override = revenue;
        self
    }
}

/// Service producing a [`MonthlyReport`] from the bookkeeping API
pub struct BudgetRun<'a> {
    api: &'a dyn BookkeepingApi,
    settings: &'a Settings,
}

impl<'a> BudgetRun<'a> {
    pub fn new(api: &'a dyn BookkeepingApi, settings: &'a Settings) -> Self {
        Self { api, settings }
    }

    /// Load the account table
    pub fn load_accounts(&self) -> BudgetResult<AccountTable> {
        let accounts = self.api.ledger_accounts().map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch ledger accounts");
            e
        })?;
        tracing::info!(count = accounts.len(), "Fetched ledger accounts");
        Ok(AccountTable::new(accounts))
    }

    /// Id of the account sales-invoice payments are credited to
    pub fn revenue_account_id(&self, accounts: &AccountTable) -> BudgetResult<String> {
        let name = &self.settings.revenue_account_name;
        let kind = self.settings.revenue_account_kind;
        accounts
            .find_by_name_and_kind(name, kind)
            .map(|account| account.id.clone())
            .ok_or_else(|| BudgetError::account_not_found(format!("{} ({})", name, kind)))
    }

    /// Execute the run
    pub fn execute(&self, request: &RunRequest) -> BudgetResult<MonthlyReport> {
        tracing::info!(period = %request.period, "Fetching financial data");

        let accounts = self.load_accounts()?;
        let revenue_account_id = self.revenue_account_id(&accounts)?;
        tracing::debug!(account = %revenue_account_id, "Found revenue account");

        let fetcher = TransactionFetcher::new(
            self.api,
            self.settings.chunk_days,
            Duration::from_millis(self.settings.chunk_delay_ms),
        );
        let transactions = fetcher.fetch(&request.period)?;

        let documents = DocumentResolver::new(self.api).resolve(&transactions);

        let categorization = CategorizationEngine::new(&documents.cache, &revenue_account_id)
            .categorize(&transactions);
        let root_totals = HierarchyAggregator::new(&accounts).aggregate(&categorization.totals);

        let totals = &categorization.totals;
        let budget = BudgetCalculator::new(TaxRates::from_settings(self.settings)).calculate(
            totals.sum_by_kind(&accounts, AccountKind::Revenue),
            request.revenue_override,
            totals.sum_by_kind(&accounts, AccountKind::Expense),
            totals.sum_by_kind(&accounts, AccountKind::Equity),
        );

        Ok(MonthlyReport::build(
            request.period,
            &accounts,
            transactions,
            &documents,
            &categorization,
            root_totals,
            budget,
            self.settings.currency_symbol.clone(),
        ))
    }
}
