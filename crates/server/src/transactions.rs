//! Expense and income endpoints.
//!
//! Both kinds share the same handlers; the route decides the kind.

use api_types::transaction::{
    ExpenseListResponse, IncomeListResponse, ListParams, PaymentMethod, TransactionNew,
    TransactionStatus, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    MoneyCents, PageRequest, QueryResult, SortDirection, SortField, SortSpec, Transaction,
    TransactionFilter, TransactionKind,
    query::{parse_choice, parse_date, parse_flag},
};
use uuid::Uuid;

use crate::{ServerError, auth::Claims, server::ServerState};

const DEFAULT_PAGE_SIZE: usize = 10;

pub(crate) fn map_kind(kind: TransactionKind) -> api_types::TransactionKind {
    match kind {
        TransactionKind::Expense => api_types::TransactionKind::Expense,
        TransactionKind::Income => api_types::TransactionKind::Income,
    }
}

fn map_status(status: engine::TransactionStatus) -> TransactionStatus {
    match status {
        engine::TransactionStatus::Completed => TransactionStatus::Completed,
        engine::TransactionStatus::Pending => TransactionStatus::Pending,
        engine::TransactionStatus::Cancelled => TransactionStatus::Cancelled,
    }
}

fn engine_status(status: TransactionStatus) -> engine::TransactionStatus {
    match status {
        TransactionStatus::Completed => engine::TransactionStatus::Completed,
        TransactionStatus::Pending => engine::TransactionStatus::Pending,
        TransactionStatus::Cancelled => engine::TransactionStatus::Cancelled,
    }
}

fn map_payment_method(method: engine::PaymentMethod) -> PaymentMethod {
    match method {
        engine::PaymentMethod::Cash => PaymentMethod::Cash,
        engine::PaymentMethod::Credit => PaymentMethod::Credit,
        engine::PaymentMethod::Debit => PaymentMethod::Debit,
        engine::PaymentMethod::Online => PaymentMethod::Online,
        engine::PaymentMethod::BankTransfer => PaymentMethod::BankTransfer,
    }
}

fn engine_payment_method(method: PaymentMethod) -> engine::PaymentMethod {
    match method {
        PaymentMethod::Cash => engine::PaymentMethod::Cash,
        PaymentMethod::Credit => engine::PaymentMethod::Credit,
        PaymentMethod::Debit => engine::PaymentMethod::Debit,
        PaymentMethod::Online => engine::PaymentMethod::Online,
        PaymentMethod::BankTransfer => engine::PaymentMethod::BankTransfer,
    }
}

pub(crate) fn map_transaction(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        description: tx.description,
        amount_minor: tx.amount.cents(),
        category: tx.category,
        date: tx.date,
        status: map_status(tx.status),
        payment_method: map_payment_method(tx.payment_method),
        is_recurring: tx.is_recurring,
        tags: tx.tags,
        notes: tx.notes,
    }
}

fn parse_amount(raw: Option<&str>) -> Result<Option<MoneyCents>, ServerError> {
    Ok(raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<MoneyCents>)
        .transpose()?)
}

/// Turn the raw query string into the pipeline inputs.
fn list_request(
    params: ListParams,
) -> Result<(TransactionFilter, Option<SortSpec>, PageRequest), ServerError> {
    let filter = TransactionFilter {
        start_date: parse_date(params.start_date.as_deref())?,
        end_date: parse_date(params.end_date.as_deref())?,
        category: params.category,
        payment_method: parse_choice(params.payment_method.as_deref())?,
        status: parse_choice(params.status.as_deref())?,
        search_term: params.search_term,
        is_recurring: parse_flag(params.is_recurring.as_deref())?,
        min_amount: parse_amount(params.min_amount.as_deref())?,
        max_amount: parse_amount(params.max_amount.as_deref())?,
    };

    let direction: SortDirection = parse_choice(params.sort_direction.as_deref())?.unwrap_or_default();
    let sort = parse_choice::<SortField>(params.sort_field.as_deref())?
        .map(|field| SortSpec::new(field, direction));

    let page = PageRequest::new(
        params.page.unwrap_or(0),
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )?;

    Ok((filter, sort, page))
}

async fn list(
    state: &ServerState,
    kind: TransactionKind,
    params: ListParams,
) -> Result<(QueryResult<Transaction>, usize), ServerError> {
    let (filter, sort, page) = list_request(params)?;
    let result = state
        .engine
        .list_transactions(kind, &filter, sort.as_ref(), &page)
        .await?;
    let page_count = result.page_count(page.size());
    Ok((result, page_count))
}

fn new_input(payload: TransactionNew) -> engine::TransactionNew {
    engine::TransactionNew {
        description: payload.description,
        amount: payload.amount_minor.map(MoneyCents::new),
        category: payload.category,
        date: payload.date,
        status: payload.status.map(engine_status),
        payment_method: payload.payment_method.map(engine_payment_method),
        is_recurring: payload.is_recurring,
        tags: payload.tags,
        notes: payload.notes,
    }
}

fn patch_input(payload: TransactionUpdate) -> engine::TransactionPatch {
    engine::TransactionPatch {
        description: payload.description,
        amount: payload.amount_minor.map(MoneyCents::new),
        category: payload.category,
        date: payload.date,
        status: payload.status.map(engine_status),
        payment_method: payload.payment_method.map(engine_payment_method),
        is_recurring: payload.is_recurring,
        tags: payload.tags,
        notes: payload.notes,
    }
}

async fn create(
    state: &ServerState,
    claims: &Claims,
    kind: TransactionKind,
    payload: TransactionNew,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(kind, new_input(payload))
        .await?;
    tracing::debug!(user = %claims.sub, %kind, id = %tx.id, "transaction created");

    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

async fn get_one(
    state: &ServerState,
    kind: TransactionKind,
    id: Uuid,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(kind, id).await?;
    Ok(Json(map_transaction(tx)))
}

async fn update(
    state: &ServerState,
    kind: TransactionKind,
    id: Uuid,
    payload: TransactionUpdate,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(kind, id, patch_input(payload))
        .await?;
    Ok(Json(map_transaction(tx)))
}

async fn delete(
    state: &ServerState,
    kind: TransactionKind,
    id: Uuid,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_expenses(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let (result, page_count) = list(&state, TransactionKind::Expense, params).await?;
    Ok(Json(ExpenseListResponse {
        expenses: result.items.into_iter().map(map_transaction).collect(),
        total: result.total,
        page_count,
        categories: result.categories,
    }))
}

pub async fn list_incomes(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<IncomeListResponse>, ServerError> {
    let (result, page_count) = list(&state, TransactionKind::Income, params).await?;
    Ok(Json(IncomeListResponse {
        incomes: result.items.into_iter().map(map_transaction).collect(),
        total: result.total,
        page_count,
        categories: result.categories,
    }))
}

pub async fn create_expense(
    Extension(claims): Extension<Claims>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    create(&state, &claims, TransactionKind::Expense, payload).await
}

pub async fn create_income(
    Extension(claims): Extension<Claims>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    create(&state, &claims, TransactionKind::Income, payload).await
}

pub async fn get_expense(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    get_one(&state, TransactionKind::Expense, id).await
}

pub async fn get_income(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    get_one(&state, TransactionKind::Income, id).await
}

pub async fn update_expense(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    update(&state, TransactionKind::Expense, id, payload).await
}

pub async fn update_income(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    update(&state, TransactionKind::Income, id, payload).await
}

pub async fn delete_expense(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    delete(&state, TransactionKind::Expense, id).await
}

pub async fn delete_income(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    delete(&state, TransactionKind::Income, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_request_maps_all_sentinel_and_defaults() {
        let (filter, sort, page) = list_request(ListParams {
            category: Some("all".to_string()),
            payment_method: Some("all".to_string()),
            status: Some("pending".to_string()),
            min_amount: Some("10.50".to_string()),
            max_amount: Some("".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(filter.payment_method, None);
        assert_eq!(filter.status, Some(engine::TransactionStatus::Pending));
        assert_eq!(filter.min_amount, Some(MoneyCents::new(1_050)));
        assert_eq!(filter.max_amount, None);
        assert!(sort.is_none());
        assert_eq!(page.index(), 0);
        assert_eq!(page.size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn list_request_ignores_blank_dates_and_flag() {
        let (filter, _, _) = list_request(ListParams {
            start_date: Some(String::new()),
            end_date: Some("2024-03-31".to_string()),
            is_recurring: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.start_date, None);
        assert_eq!(filter.end_date, chrono::NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(filter.is_recurring, None);

        let (filter, _, _) = list_request(ListParams {
            is_recurring: Some("true".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.is_recurring, Some(true));
    }

    #[test]
    fn list_request_builds_sort() {
        let (_, sort, _) = list_request(ListParams {
            sort_field: Some("paymentMethod".to_string()),
            sort_direction: Some("desc".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            sort,
            Some(SortSpec::new(SortField::PaymentMethod, SortDirection::Desc))
        );
    }

    #[test]
    fn list_request_rejects_bad_input() {
        assert!(
            list_request(ListParams {
                page_size: Some(0),
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            list_request(ListParams {
                sort_field: Some("colour".to_string()),
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            list_request(ListParams {
                start_date: Some("yesterday".to_string()),
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            list_request(ListParams {
                min_amount: Some("ten".to_string()),
                ..Default::default()
            })
            .is_err()
        );
    }
}
