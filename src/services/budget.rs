//! Budget calculation
//!
//! Backs VAT and income tax out of gross revenue, applies business
//! expenses, and compares the resulting family budget with family spending.
//!
//! ```text
//! revenue_excl_vat = gross_revenue / (1 + vat_rate)
//! vat_amount       = gross_revenue - revenue_excl_vat
//! income_tax       = revenue_excl_vat * income_tax_rate
//! family_budget    = revenue_excl_vat - income_tax + business_expenses
//! remaining        = family_budget + family_spending
//! percent_used     = -(family_spending / family_budget) * 100
//! ```
//!
//! Business expenses and family spending are stored negative. Intermediate
//! figures are rounded to cents before they feed the next step.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::Settings;
use crate::models::Money;

/// Fixed tax configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRates {
    /// Fraction applied to back VAT out of gross revenue
    pub vat_rate: Decimal,
    /// Fraction of revenue excluding VAT withheld as income tax
    pub income_tax_rate: Decimal,
}

impl TaxRates {
    pub fn new(vat_rate: Decimal, income_tax_rate: Decimal) -> Self {
        Self {
            vat_rate,
            income_tax_rate,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.vat_rate, settings.income_tax_rate)
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        Self::new(Decimal::new(21, 2), Decimal::new(30, 2))
    }
}

/// Where gross revenue came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueSource {
    /// Sum of the revenue category totals
    Computed,
    /// Supplied by the operator; the computed total is not used
    Override,
}

/// Share of the family budget already spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "percent", rename_all = "snake_case")]
pub enum BudgetUsage {
    /// Percentage of a positive family budget (may exceed 100)
    Percent(Decimal),
    /// Family budget is zero or negative; no percentage exists
    Undefined,
}

impl BudgetUsage {
    pub fn percent(&self) -> Option<Decimal> {
        match self {
            Self::Percent(p) => Some(*p),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// Derived budget record for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetFigures {
    pub gross_revenue: Money,
    pub revenue_source: RevenueSource,
    pub vat_amount: Money,
    pub revenue_excl_vat: Money,
    pub income_tax: Money,
    pub business_expenses: Money,
    pub family_budget: Money,
    pub family_spending: Money,
    pub remaining: Money,
    pub usage: BudgetUsage,
    pub rates: RatesUsed,
}

/// Rates the figures were computed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatesUsed {
    pub vat_rate: Decimal,
    pub income_tax_rate: Decimal,
}

impl BudgetFigures {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }

    /// True when the family budget itself is zero or negative
    pub fn budget_undefined(&self) -> bool {
        self.usage.is_undefined()
    }
}

/// Pure budget calculator
pub struct BudgetCalculator {
    rates: TaxRates,
}

impl BudgetCalculator {
    pub fn new(rates: TaxRates) -> Self {
        Self { rates }
    }

    /// Pick gross revenue: an override always wins over the computed total
    pub fn gross_revenue(
        computed: Money,
        override_revenue: Option<Money>,
    ) -> (Money, RevenueSource) {
        match override_revenue {
            Some(amount) => (amount, RevenueSource::Override),
            None => (computed, RevenueSource::Computed),
        }
    }

    /// Compute the budget figures
    ///
    /// `business_expenses` and `family_spending` are the (negative) category
    /// sums.
    pub fn calculate(
        &self,
        computed_revenue: Money,
        override_revenue: Option<Money>,
        business_expenses: Money,
        family_spending: Money,
    ) -> BudgetFigures {
        let (gross_revenue, revenue_source) =
            Self::gross_revenue(computed_revenue, override_revenue);

        let revenue_excl_vat =
            Money::from_decimal(gross_revenue.to_decimal() / (Decimal::ONE + self.rates.vat_rate));
        let vat_amount = gross_revenue - revenue_excl_vat;
        let income_tax =
            Money::from_decimal(revenue_excl_vat.to_decimal() * self.rates.income_tax_rate);
        let family_budget = revenue_excl_vat - income_tax + business_expenses;
        let remaining = family_budget + family_spending;

        let usage = if family_budget.is_positive() {
            let percent = -(family_spending.to_decimal() / family_budget.to_decimal())
                * Decimal::ONE_HUNDRED;
            BudgetUsage::Percent(percent.round_dp(1))
        } else {
            tracing::warn!(
                family_budget = %family_budget,
                "Family budget is not positive; usage percentage is undefined"
            );
            BudgetUsage::Undefined
        };

        BudgetFigures {
            gross_revenue,
            revenue_source,
            vat_amount,
            revenue_excl_vat,
            income_tax,
            business_expenses,
            family_budget,
            family_spending,
            remaining,
            usage,
            rates: RatesUsed {
                vat_rate: self.rates.vat_rate,
                income_tax_rate: self.rates.income_tax_rate,
            },
        }
    }
}
