//! Monthly Report
//!
//! Everything a run produced, in one value: run statistics, category totals
//! grouped by account kind, root category totals and the budget figures.
//! Renders the full terminal summary and the condensed chat message.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{AccountKind, AccountTable, DateRange, DocumentCollection, Money, Transaction};
use crate::services::budget::{BudgetFigures, BudgetUsage, RevenueSource};
use crate::services::categorize::Categorization;
use crate::services::documents::ResolvedDocuments;
use crate::services::hierarchy::{find_root, RootTotals};

/// How a run went
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub accounts: usize,
    pub transactions: usize,
    pub bookings_processed: usize,
    pub payments_processed: usize,
    /// Document payments whose document could not be resolved
    pub payments_skipped: usize,
    /// Payments credited to their own (bank/clearing) account
    pub fallback_payments: usize,
    pub fallback_amount: Money,
    pub documents_requested: usize,
    pub documents_mapped: usize,
    pub failed_collections: Vec<DocumentCollection>,
}

impl RunStats {
    /// True when some input was lost or classified on a best-effort basis
    pub fn is_degraded(&self) -> bool {
        self.payments_skipped > 0
            || self.fallback_payments > 0
            || !self.failed_collections.is_empty()
    }
}

/// One account's total in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLine {
    pub account_id: String,
    pub name: String,
    pub kind: AccountKind,
    /// Root category name, for family accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub amount: Money,
}

/// Monthly family budget report
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub period: DateRange,
    pub stats: RunStats,
    /// Every categorized account, grouped by kind, largest first
    pub categories: Vec<CategoryLine>,
    pub root_totals: RootTotals,
    pub budget: BudgetFigures,
    pub transactions: Vec<Transaction>,
    #[serde(skip)]
    pub currency_symbol: String,
}

impl MonthlyReport {
    /// Assemble the report from the outputs of a run
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        period: DateRange,
        accounts: &AccountTable,
        transactions: Vec<Transaction>,
        documents: &ResolvedDocuments,
        categorization: &Categorization,
        root_totals: RootTotals,
        budget: BudgetFigures,
        currency_symbol: impl Into<String>,
    ) -> Self {
        let stats = RunStats {
            accounts: accounts.len(),
            transactions: transactions.len(),
            bookings_processed: categorization.stats.bookings,
            payments_processed: categorization.stats.payments_processed(),
            payments_skipped: categorization.stats.skipped_payments,
            fallback_payments: categorization.stats.fallback_payments,
            fallback_amount: categorization.stats.fallback_amount,
            documents_requested: documents.requested,
            documents_mapped: documents.cache.len(),
            failed_collections: documents.failed_collections.clone(),
        };

        let mut categories: Vec<CategoryLine> = categorization
            .totals
            .iter()
            .map(|(account_id, amount)| match accounts.get(account_id) {
                Some(account) => CategoryLine {
                    account_id: account_id.to_string(),
                    name: account.name.clone(),
                    kind: account.kind,
                    root: (account.kind == AccountKind::Equity)
                        .then(|| find_root(accounts, account).0.name.clone()),
                    amount,
                },
                None => CategoryLine {
                    account_id: account_id.to_string(),
                    name: account_id.to_string(),
                    kind: AccountKind::Other,
                    root: None,
                    amount,
                },
            })
            .collect();
        categories.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| b.amount.abs().cmp(&a.amount.abs()))
                .then_with(|| a.name.cmp(&b.name))
        });

        Self {
            period,
            stats,
            categories,
            root_totals,
            budget,
            transactions,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Category lines of one kind
    pub fn lines_of(&self, kind: AccountKind) -> impl Iterator<Item = &CategoryLine> {
        self.categories.iter().filter(move |l| l.kind == kind)
    }

    /// Sum of the category lines of one kind
    pub fn total_of(&self, kind: AccountKind) -> Money {
        self.lines_of(kind).map(|l| l.amount).sum()
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Full textual summary for the terminal
    pub fn format_terminal(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "=== Monthly Summary: {} ===", self.period.month_label());
        let _ = writeln!(out, "Period: {}", self.period);
        let _ = writeln!(
            out,
            "Transactions: {} | Bookings: {} | Payments: {} | Skipped: {}",
            self.stats.transactions,
            self.stats.bookings_processed,
            self.stats.payments_processed,
            self.stats.payments_skipped
        );
        let _ = writeln!(
            out,
            "Documents mapped: {}/{}",
            self.stats.documents_mapped, self.stats.documents_requested
        );
        for collection in &self.stats.failed_collections {
            let _ = writeln!(out, "Warning: {} could not be fetched", collection);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Family Expenses (by root category):");
        for root in self.root_totals.ordered() {
            let _ = writeln!(out, "   {}: {}", root.name, self.money(root.amount));
        }
        let _ = writeln!(out, "   TOTAL: {}", self.money(self.root_totals.total()));

        self.write_kind_section(&mut out, AccountKind::Equity, "Family Expenses (detailed)");
        self.write_kind_section(&mut out, AccountKind::Revenue, "Revenue");
        self.write_kind_section(&mut out, AccountKind::Expense, "Business Expenses");

        if self.lines_of(AccountKind::Other).next().is_some() {
            self.write_kind_section(&mut out, AccountKind::Other, "Other accounts");
        }
        if self.stats.fallback_payments > 0 {
            let _ = writeln!(
                out,
                "   Note: {} payment(s) totalling {} were credited to their \
                 bank/clearing account (low confidence)",
                self.stats.fallback_payments,
                self.money(self.stats.fallback_amount)
            );
        }

        let budget = &self.budget;
        let _ = writeln!(out);
        let _ = writeln!(out, "=== Family Budget Calculation ===");
        if budget.revenue_source == RevenueSource::Override {
            let _ = writeln!(out, "Using manual revenue: {}", self.money(budget.gross_revenue));
        }
        let _ = writeln!(out, "Gross Revenue: {}", self.money(budget.gross_revenue));
        let _ = writeln!(
            out,
            "VAT ({}%): {}",
            rate_percent(budget.rates.vat_rate),
            self.money(-budget.vat_amount)
        );
        let _ = writeln!(out, "Revenue excl. VAT: {}", self.money(budget.revenue_excl_vat));
        let _ = writeln!(
            out,
            "Income Tax ({}%): {}",
            rate_percent(budget.rates.income_tax_rate),
            self.money(-budget.income_tax)
        );
        let _ = writeln!(out, "Business Expenses: {}", self.money(budget.business_expenses));
        let _ = writeln!(out);
        let _ = writeln!(out, "💰 Available Family Budget: {}", self.money(budget.family_budget));
        let _ = writeln!(out);
        let _ = writeln!(out, "💸 Family Spending: {}", self.money(budget.family_spending));
        let _ = writeln!(out, "📊 Budget Used: {}", usage_text(&budget.usage));
        let _ = writeln!(out, "{}", self.remaining_line());

        out
    }

    /// Condensed summary for the chat message
    pub fn format_message(&self) -> String {
        let budget = &self.budget;
        let mut out = String::new();

        let _ = writeln!(out, "📅 Family budget {}", self.period.month_label());
        let _ = writeln!(out, "({})", self.period);
        let _ = writeln!(out);
        let _ = writeln!(out, "💰 Available: {}", self.money(budget.family_budget));
        let _ = writeln!(out, "💸 Spent: {}", self.money(budget.family_spending));
        let _ = writeln!(out, "📊 Used: {}", usage_text(&budget.usage));
        let _ = writeln!(out, "{}", self.remaining_line());

        if !self.root_totals.is_empty() {
            let _ = writeln!(out);
            for root in self.root_totals.ordered() {
                let _ = writeln!(out, "• {}: {}", root.name, self.money(root.amount));
            }
        }

        let mut notes = Vec::new();
        if budget.revenue_source == RevenueSource::Override {
            notes.push(format!(
                "ℹ️ Manual revenue used: {}",
                self.money(budget.gross_revenue)
            ));
        }
        if self.stats.fallback_payments > 0 {
            notes.push(format!(
                "⚠️ {} payment(s) ({}) categorized by bank account, low confidence",
                self.stats.fallback_payments,
                self.money(self.stats.fallback_amount)
            ));
        }
        if self.stats.payments_skipped > 0 {
            notes.push(format!(
                "⚠️ {} payment(s) skipped, document not found",
                self.stats.payments_skipped
            ));
        }
        if !notes.is_empty() {
            let _ = writeln!(out);
            for note in notes {
                let _ = writeln!(out, "{}", note);
            }
        }

        out
    }

    fn write_kind_section(&self, out: &mut String, kind: AccountKind, title: &str) {
        let mut lines = self.lines_of(kind).peekable();
        if lines.peek().is_none() {
            return;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", title);
        for line in lines {
            let _ = writeln!(out, "   {}: {}", line.name, self.money(line.amount));
        }
        let _ = writeln!(out, "   TOTAL: {}", self.money(self.total_of(kind)));
    }

    fn remaining_line(&self) -> String {
        let remaining = self.budget.remaining;
        if remaining.is_negative() {
            format!("🚨 Over Budget: {}", self.money(remaining.abs()))
        } else {
            format!("💵 Remaining: {}", self.money(remaining))
        }
    }
}

/// "21" for 0.21
fn rate_percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

fn usage_text(usage: &BudgetUsage) -> String {
    match usage {
        BudgetUsage::Percent(p) => format!("{:.1}%", p),
        BudgetUsage::Undefined => "undefined (family budget is zero or negative)".to_string(),
    }
}
