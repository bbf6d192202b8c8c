//! Spending budgets.
//!
//! A budget caps spending for one category over a period. Its status is never
//! set by hand: it follows the share of the limit already spent.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    MoneyCents, ResultEngine,
    util::{normalize_display, normalize_optional_text},
    validation,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    /// Last day of the period starting on `start`.
    pub fn end_from(self, start: NaiveDate) -> Option<NaiveDate> {
        let next = match self {
            Self::Weekly => start.checked_add_days(Days::new(7)),
            Self::Monthly => start.checked_add_months(Months::new(1)),
            Self::Yearly => start.checked_add_months(Months::new(12)),
        };
        next.and_then(|d| d.pred_opt())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[default]
    Active,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    /// Spent share at which a budget turns into a warning, in percent.
    pub const WARNING_PERCENT: i128 = 80;

    /// Status for `spent` out of `limit`.
    ///
    /// - `>= 100%` spent: exceeded
    /// - `>= 80%` spent: warning
    /// - otherwise: active
    ///
    /// A zero limit is exceeded by any spending.
    pub fn from_usage(spent: MoneyCents, limit: MoneyCents) -> Self {
        let spent = i128::from(spent.cents());
        let limit = i128::from(limit.cents());
        if limit <= 0 {
            return if spent > 0 { Self::Exceeded } else { Self::Active };
        }
        if spent >= limit {
            Self::Exceeded
        } else if spent * 100 >= limit * Self::WARNING_PERCENT {
            Self::Warning
        } else {
            Self::Active
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub category: String,
    pub amount: MoneyCents,
    #[serde(default)]
    pub spent: MoneyCents,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: BudgetStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetNew {
    pub category: Option<String>,
    pub amount: Option<MoneyCents>,
    pub spent: Option<MoneyCents>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub amount: Option<MoneyCents>,
    pub spent: Option<MoneyCents>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Budget {
    /// Build a budget from form input.
    ///
    /// The period starts `today` unless given, and ends at the end of the
    /// period unless given. Nothing is spent yet unless given.
    pub fn new(input: BudgetNew, today: NaiveDate) -> ResultEngine<Self> {
        let period = input.period.unwrap_or_default();
        let start_date = input.start_date.unwrap_or(today);
        let end_date = input
            .end_date
            .or_else(|| period.end_from(start_date))
            .unwrap_or(start_date);
        let mut budget = Self {
            id: Uuid::new_v4(),
            category: input
                .category
                .as_deref()
                .and_then(normalize_display)
                .unwrap_or_default(),
            amount: input.amount.unwrap_or_default(),
            spent: input.spent.unwrap_or_default(),
            period,
            start_date,
            end_date,
            status: BudgetStatus::Active,
            notes: normalize_optional_text(input.notes.as_deref()),
        };
        budget.refresh_status();
        validation::validate_budget(&budget)?;
        Ok(budget)
    }

    pub fn patched(&self, patch: BudgetPatch) -> ResultEngine<Self> {
        let mut budget = self.clone();
        if let Some(category) = patch.category {
            budget.category = normalize_display(&category).unwrap_or_default();
        }
        if let Some(amount) = patch.amount {
            budget.amount = amount;
        }
        if let Some(spent) = patch.spent {
            budget.spent = spent;
        }
        if let Some(period) = patch.period {
            budget.period = period;
        }
        if let Some(start_date) = patch.start_date {
            budget.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            budget.end_date = end_date;
        }
        if let Some(notes) = patch.notes {
            budget.notes = normalize_optional_text(Some(&notes));
        }
        budget.refresh_status();
        validation::validate_budget(&budget)?;
        Ok(budget)
    }

    /// Recompute `status` from `spent` and `amount`.
    pub fn refresh_status(&mut self) {
        self.status = BudgetStatus::from_usage(self.spent, self.amount);
    }

    /// Share of the limit already spent, in percent.
    pub fn usage_percent(&self) -> f64 {
        self.spent.percent_of(self.amount)
    }

    /// Money left before the limit; negative once exceeded.
    pub fn remaining(&self) -> MoneyCents {
        self.amount - self.spent
    }
}
