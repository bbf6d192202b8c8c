//! Dashboard API endpoint

use api_types::stats::{
    CategoryShare, DailyTotal, DashboardResponse, MonthlyTotals, RecurringExpense, SpendingDay,
    Statistic,
};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, transactions::map_transaction};

/// Handle requests for the dashboard summary
pub async fn get(State(state): State<ServerState>) -> Result<Json<DashboardResponse>, ServerError> {
    let dashboard = state.engine.dashboard().await?;

    Ok(Json(DashboardResponse {
        stats: Statistic {
            balance_minor: dashboard.stats.balance.cents(),
            total_income_minor: dashboard.stats.total_income.cents(),
            total_expenses_minor: dashboard.stats.total_expenses.cents(),
        },
        top_categories: dashboard
            .top_categories
            .into_iter()
            .map(|share| CategoryShare {
                name: share.name,
                amount_minor: share.amount.cents(),
                percentage: share.percentage,
            })
            .collect(),
        monthly: dashboard
            .monthly
            .into_iter()
            .map(|month| MonthlyTotals {
                month: month.month,
                income_minor: month.income.cents(),
                expense_minor: month.expense.cents(),
            })
            .collect(),
        highest_spending_day: dashboard.highest_spending_day.map(|day| SpendingDay {
            date: day.date,
            amount_minor: day.amount.cents(),
            transactions: day.transactions,
        }),
        daily: dashboard
            .daily
            .into_iter()
            .map(|day| DailyTotal {
                date: day.date,
                amount_minor: day.amount.cents(),
            })
            .collect(),
        recurring: dashboard
            .recurring
            .into_iter()
            .map(|expense| RecurringExpense {
                id: expense.id,
                description: expense.description,
                amount_minor: expense.amount.cents(),
                category: expense.category,
                next_due_date: expense.next_due_date,
            })
            .collect(),
        recent: dashboard.recent.into_iter().map(map_transaction).collect(),
    }))
}
