//! Budgets API endpoints

use api_types::budget::{
    BudgetListResponse, BudgetNew, BudgetPeriod, BudgetStatus, BudgetUpdate, BudgetView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::MoneyCents;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_period(period: engine::BudgetPeriod) -> BudgetPeriod {
    match period {
        engine::BudgetPeriod::Weekly => BudgetPeriod::Weekly,
        engine::BudgetPeriod::Monthly => BudgetPeriod::Monthly,
        engine::BudgetPeriod::Yearly => BudgetPeriod::Yearly,
    }
}

fn engine_period(period: BudgetPeriod) -> engine::BudgetPeriod {
    match period {
        BudgetPeriod::Weekly => engine::BudgetPeriod::Weekly,
        BudgetPeriod::Monthly => engine::BudgetPeriod::Monthly,
        BudgetPeriod::Yearly => engine::BudgetPeriod::Yearly,
    }
}

fn map_status(status: engine::BudgetStatus) -> BudgetStatus {
    match status {
        engine::BudgetStatus::Active => BudgetStatus::Active,
        engine::BudgetStatus::Warning => BudgetStatus::Warning,
        engine::BudgetStatus::Exceeded => BudgetStatus::Exceeded,
    }
}

fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        remaining_minor: budget.remaining().cents(),
        usage_percent: budget.usage_percent(),
        category: budget.category,
        amount_minor: budget.amount.cents(),
        spent_minor: budget.spent.cents(),
        period: map_period(budget.period),
        start_date: budget.start_date,
        end_date: budget.end_date,
        status: map_status(budget.status),
        notes: budget.notes,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets()
        .await?
        .into_iter()
        .map(map_budget)
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .create_budget(engine::BudgetNew {
            category: payload.category,
            amount: payload.amount_minor.map(MoneyCents::new),
            spent: payload.spent_minor.map(MoneyCents::new),
            period: payload.period.map(engine_period),
            start_date: payload.start_date,
            end_date: payload.end_date,
            notes: payload.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_budget(budget))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget(
            id,
            engine::BudgetPatch {
                category: payload.category,
                amount: payload.amount_minor.map(MoneyCents::new),
                spent: payload.spent_minor.map(MoneyCents::new),
                period: payload.period.map(engine_period),
                start_date: payload.start_date,
                end_date: payload.end_date,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(map_budget(budget)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
