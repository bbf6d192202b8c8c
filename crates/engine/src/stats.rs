//! Dashboard statistics.
//!
//! Cancelled transactions never count towards any figure. Recurring
//! expenses repeat monthly on the day of their original date.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MoneyCents, Transaction, TransactionKind, TransactionStatus, util::compare_text};

const TOP_CATEGORIES: usize = 5;
const RECENT_TRANSACTIONS: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    pub total_income: MoneyCents,
    pub total_expenses: MoneyCents,
    /// Income minus expenses. Negative when overspending.
    pub balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    pub amount: MoneyCents,
    /// Share of total expenses, in percent.
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingDay {
    pub date: NaiveDate,
    pub amount: MoneyCents,
    pub transactions: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub category: String,
    /// First monthly occurrence on or after today.
    pub next_due_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: Statistic,
    pub top_categories: Vec<CategoryShare>,
    pub monthly: Vec<MonthlyTotals>,
    pub highest_spending_day: Option<SpendingDay>,
    /// Expense total per day, chronological.
    pub daily: Vec<DailyTotal>,
    /// Soonest due first.
    pub recurring: Vec<RecurringExpense>,
    pub recent: Vec<Transaction>,
}

fn counted(tx: &&Transaction) -> bool {
    tx.status != TransactionStatus::Cancelled
}

/// Next monthly occurrence of `start` that is not before `today`.
///
/// Days past the end of a shorter month clamp to its last day.
fn next_monthly_due(start: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    if start >= today {
        return Some(start);
    }
    let elapsed = (today.year() - start.year()) * 12 + today.month() as i32
        - start.month() as i32;
    let mut months = u32::try_from(elapsed).ok()?;
    loop {
        let due = start.checked_add_months(Months::new(months))?;
        if due >= today {
            return Some(due);
        }
        months += 1;
    }
}

/// Summarize both collections for the dashboard as of `today`.
pub fn dashboard(expenses: &[Transaction], incomes: &[Transaction], today: NaiveDate) -> Dashboard {
    let total_expenses: MoneyCents = expenses.iter().filter(counted).map(|tx| tx.amount).sum();
    let total_income: MoneyCents = incomes.iter().filter(counted).map(|tx| tx.amount).sum();

    let mut by_category: BTreeMap<&str, MoneyCents> = BTreeMap::new();
    let mut by_day: BTreeMap<NaiveDate, (MoneyCents, usize)> = BTreeMap::new();
    for tx in expenses.iter().filter(counted) {
        *by_category.entry(tx.category.as_str()).or_default() += tx.amount;
        let day = by_day.entry(tx.date).or_default();
        day.0 += tx.amount;
        day.1 += 1;
    }

    let mut top_categories: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(name, amount)| CategoryShare {
            name: name.to_string(),
            amount,
            percentage: amount.percent_of(total_expenses),
        })
        .collect();
    top_categories.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| compare_text(&a.name, &b.name))
    });
    top_categories.truncate(TOP_CATEGORIES);

    let daily = by_day
        .iter()
        .map(|(&date, &(amount, _))| DailyTotal { date, amount })
        .collect();

    // Earliest day wins a tie.
    let highest_spending_day = by_day
        .into_iter()
        .fold(None::<SpendingDay>, |best, (date, (amount, transactions))| {
            match best {
                Some(best) if best.amount >= amount => Some(best),
                _ => Some(SpendingDay {
                    date,
                    amount,
                    transactions,
                }),
            }
        });

    let mut months: BTreeMap<(i32, u32), (MoneyCents, MoneyCents)> = BTreeMap::new();
    for tx in expenses.iter().chain(incomes).filter(counted) {
        let entry = months.entry((tx.date.year(), tx.date.month())).or_default();
        match tx.kind {
            TransactionKind::Income => entry.0 += tx.amount,
            TransactionKind::Expense => entry.1 += tx.amount,
        }
    }
    let monthly = months
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyTotals {
            month: format!("{year:04}-{month:02}"),
            income,
            expense,
        })
        .collect();

    let mut recurring: Vec<RecurringExpense> = expenses
        .iter()
        .filter(counted)
        .filter(|tx| tx.is_recurring)
        .filter_map(|tx| {
            Some(RecurringExpense {
                id: tx.id,
                description: tx.description.clone(),
                amount: tx.amount,
                category: tx.category.clone(),
                next_due_date: next_monthly_due(tx.date, today)?,
            })
        })
        .collect();
    recurring.sort_by(|a, b| {
        a.next_due_date
            .cmp(&b.next_due_date)
            .then_with(|| compare_text(&a.description, &b.description))
    });

    let mut recent: Vec<&Transaction> = expenses.iter().chain(incomes).filter(counted).collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    let recent = recent
        .into_iter()
        .take(RECENT_TRANSACTIONS)
        .cloned()
        .collect();

    Dashboard {
        stats: Statistic {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        },
        top_categories,
        monthly,
        highest_spending_day,
        daily,
        recurring,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::PaymentMethod;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn tx(kind: TransactionKind, cents: i64, category: &str, m: u32, d: u32) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            kind,
            description: format!("{category} {m}/{d}"),
            amount: MoneyCents::new(cents),
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
            status: TransactionStatus::Completed,
            payment_method: PaymentMethod::Cash,
            is_recurring: false,
            tags: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn totals_skip_cancelled() {
        let mut cancelled = tx(TransactionKind::Expense, 9_999, "Food", 1, 3);
        cancelled.status = TransactionStatus::Cancelled;
        let expenses = vec![
            tx(TransactionKind::Expense, 3_000, "Food", 1, 2),
            tx(TransactionKind::Expense, 1_000, "Transport", 1, 2),
            cancelled,
        ];
        let incomes = vec![tx(TransactionKind::Income, 10_000, "Salary", 1, 1)];

        let dash = dashboard(&expenses, &incomes, today());
        assert_eq!(dash.stats.total_expenses, MoneyCents::new(4_000));
        assert_eq!(dash.stats.total_income, MoneyCents::new(10_000));
        assert_eq!(dash.stats.balance, MoneyCents::new(6_000));
        assert_eq!(dash.recent.len(), 3);
    }

    #[test]
    fn top_categories_sorted_with_percentages() {
        let expenses = vec![
            tx(TransactionKind::Expense, 1_000, "Transport", 1, 2),
            tx(TransactionKind::Expense, 2_000, "Food", 1, 3),
            tx(TransactionKind::Expense, 1_000, "Food", 1, 4),
        ];
        let dash = dashboard(&expenses, &[], today());
        let names: Vec<&str> = dash.top_categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Food", "Transport"]);
        assert_eq!(dash.top_categories[0].percentage, 75.0);
        assert_eq!(dash.top_categories[1].percentage, 25.0);
    }

    #[test]
    fn monthly_series_is_chronological() {
        let expenses = vec![
            tx(TransactionKind::Expense, 500, "Food", 3, 1),
            tx(TransactionKind::Expense, 700, "Food", 1, 15),
        ];
        let incomes = vec![tx(TransactionKind::Income, 2_000, "Salary", 1, 1)];
        let dash = dashboard(&expenses, &incomes, today());
        assert_eq!(
            dash.monthly,
            vec![
                MonthlyTotals {
                    month: "2024-01".to_string(),
                    income: MoneyCents::new(2_000),
                    expense: MoneyCents::new(700),
                },
                MonthlyTotals {
                    month: "2024-03".to_string(),
                    income: MoneyCents::ZERO,
                    expense: MoneyCents::new(500),
                },
            ]
        );
    }

    #[test]
    fn highest_spending_day_prefers_earliest_on_tie() {
        let expenses = vec![
            tx(TransactionKind::Expense, 600, "Food", 2, 1),
            tx(TransactionKind::Expense, 400, "Food", 2, 1),
            tx(TransactionKind::Expense, 1_000, "Food", 2, 5),
            tx(TransactionKind::Expense, 200, "Food", 2, 7),
        ];
        let day = dashboard(&expenses, &[], today()).highest_spending_day.unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(day.amount, MoneyCents::new(1_000));
        assert_eq!(day.transactions, 2);
    }

    #[test]
    fn daily_series_sums_each_day() {
        let expenses = vec![
            tx(TransactionKind::Expense, 300, "Food", 2, 9),
            tx(TransactionKind::Expense, 600, "Food", 2, 1),
            tx(TransactionKind::Expense, 400, "Transport", 2, 1),
        ];
        let dash = dashboard(&expenses, &[], today());
        assert_eq!(
            dash.daily,
            vec![
                DailyTotal {
                    date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    amount: MoneyCents::new(1_000),
                },
                DailyTotal {
                    date: NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(),
                    amount: MoneyCents::new(300),
                },
            ]
        );
    }

    #[test]
    fn recurring_expenses_roll_forward_monthly() {
        let mut rent = tx(TransactionKind::Expense, 120_000, "Housing", 1, 5);
        rent.is_recurring = true;
        let mut gym = tx(TransactionKind::Expense, 3_000, "Health", 1, 31);
        gym.is_recurring = true;
        let mut cancelled = tx(TransactionKind::Expense, 999, "Media", 3, 1);
        cancelled.is_recurring = true;
        cancelled.status = TransactionStatus::Cancelled;
        let one_off = tx(TransactionKind::Expense, 500, "Food", 3, 2);

        let dash = dashboard(&[rent, gym, cancelled, one_off], &[], today());
        let due: Vec<(&str, NaiveDate)> = dash
            .recurring
            .iter()
            .map(|r| (r.category.as_str(), r.next_due_date))
            .collect();
        assert_eq!(
            due,
            [
                ("Health", NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()),
                ("Housing", NaiveDate::from_ymd_opt(2024, 4, 5).unwrap()),
            ]
        );
    }

    #[test]
    fn next_due_clamps_and_keeps_future_dates() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let feb10 = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(
            next_monthly_due(jan31, feb10),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(next_monthly_due(jan31, jan31), Some(jan31));
        let later = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(next_monthly_due(later, feb10), Some(later));
    }

    #[test]
    fn empty_collections() {
        let dash = dashboard(&[], &[], today());
        assert_eq!(dash.stats, Statistic::default());
        assert!(dash.top_categories.is_empty());
        assert!(dash.highest_spending_day.is_none());
        assert!(dash.daily.is_empty());
        assert!(dash.recurring.is_empty());
    }
}
