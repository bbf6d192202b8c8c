//! Categories API endpoints.

use api_types::{
    TransactionKind,
    category::{CategoryList, CategoryListResponse, CategoryNew, CategoryUpdate, CategoryView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, transactions::map_kind};

fn engine_kind(kind: TransactionKind) -> engine::TransactionKind {
    match kind {
        TransactionKind::Expense => engine::TransactionKind::Expense,
        TransactionKind::Income => engine::TransactionKind::Income,
    }
}

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        color: category.color,
        icon: category.icon,
        description: category.description,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<CategoryList>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(params.kind.map(engine_kind))
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(engine::CategoryNew {
            name: payload.name,
            kind: payload.kind.map(engine_kind),
            color: payload.color,
            icon: payload.icon,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(
            id,
            engine::CategoryPatch {
                name: payload.name,
                kind: payload.kind.map(engine_kind),
                color: payload.color,
                icon: payload.icon,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(map_category(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
