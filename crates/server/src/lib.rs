use api_types::{ErrorResponse, FieldErrorView};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use auth::AuthSettings;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod auth;
mod budgets;
mod categories;
mod dashboard;
mod server;
mod transactions;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{AuthResponse, LoginRequest, RegisterRequest, UserView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            ExpenseListResponse, IncomeListResponse, ListParams, PaymentMethod, TransactionNew,
            TransactionStatus, TransactionUpdate, TransactionView,
        };
    }

    pub mod budget {
        pub use api_types::budget::{
            BudgetListResponse, BudgetNew, BudgetPeriod, BudgetStatus, BudgetUpdate, BudgetView,
        };
    }

    pub mod category {
        pub use api_types::category::{
            CategoryList, CategoryListResponse, CategoryNew, CategoryUpdate, CategoryView,
        };
    }

    pub mod stats {
        pub use api_types::stats::{
            CategoryShare, DailyTotal, DashboardResponse, MonthlyTotals, RecurringExpense,
            SpendingDay, Statistic,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    Unauthorized(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidPage(_)
        | EngineError::InvalidField(_)
        | EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorResponse {
    let fields = match &err {
        EngineError::Validation(errors) => errors
            .fields()
            .iter()
            .map(|e| FieldErrorView {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };
    ErrorResponse {
        error: err.to_string(),
        fields,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error,
                    fields: Vec::new(),
                },
            ),
            ServerError::Unauthorized(error) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error,
                    fields: Vec::new(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
