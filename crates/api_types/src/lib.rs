use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

/// Body returned by every failing request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field messages, only for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldErrorView {
    pub field: String,
    pub message: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub password: String,
        pub confirm_password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub email: String,
        pub first_name: String,
        pub last_name: String,
    }

    /// Returned by login and register.
    ///
    /// `access_token` goes into `Authorization: Bearer <token>` on every
    /// other request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub access_token: String,
        pub user: UserView,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        #[default]
        Completed,
        Pending,
        Cancelled,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum PaymentMethod {
        #[default]
        Cash,
        Credit,
        Debit,
        Online,
        BankTransfer,
    }

    /// Query string of `GET /expenses` and `GET /incomes`.
    ///
    /// Everything is optional and an empty value does not constrain.
    /// Enum-like filters and `is_recurring` accept `all` for "no
    /// constraint", dates are `YYYY-MM-DD`, amounts are decimal strings
    /// (`12.50`).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ListParams {
        /// Zero-based page index.
        pub page: Option<usize>,
        pub page_size: Option<usize>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub category: Option<String>,
        pub payment_method: Option<String>,
        pub status: Option<String>,
        pub search_term: Option<String>,
        pub is_recurring: Option<String>,
        pub min_amount: Option<String>,
        pub max_amount: Option<String>,
        pub sort_field: Option<String>,
        pub sort_direction: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub description: String,
        pub amount_minor: i64,
        pub category: String,
        pub date: NaiveDate,
        pub status: TransactionStatus,
        pub payment_method: PaymentMethod,
        pub is_recurring: bool,
        pub tags: Vec<String>,
        pub notes: Option<String>,
    }

    /// Create body. Missing fields get the form defaults, the date defaults
    /// to today.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub description: Option<String>,
        pub amount_minor: Option<i64>,
        pub category: Option<String>,
        pub date: Option<NaiveDate>,
        pub status: Option<TransactionStatus>,
        pub payment_method: Option<PaymentMethod>,
        pub is_recurring: Option<bool>,
        pub tags: Option<Vec<String>>,
        pub notes: Option<String>,
    }

    /// Update body. Only present fields change.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub description: Option<String>,
        pub amount_minor: Option<i64>,
        pub category: Option<String>,
        pub date: Option<NaiveDate>,
        pub status: Option<TransactionStatus>,
        pub payment_method: Option<PaymentMethod>,
        pub is_recurring: Option<bool>,
        pub tags: Option<Vec<String>>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<TransactionView>,
        /// Matches before pagination.
        pub total: usize,
        pub page_count: usize,
        pub categories: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeListResponse {
        pub incomes: Vec<TransactionView>,
        /// Matches before pagination.
        pub total: usize,
        pub page_count: usize,
        pub categories: Vec<String>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetPeriod {
        Weekly,
        #[default]
        Monthly,
        Yearly,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetStatus {
        Active,
        Warning,
        Exceeded,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub amount_minor: i64,
        pub spent_minor: i64,
        pub remaining_minor: i64,
        pub usage_percent: f64,
        pub period: BudgetPeriod,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub status: BudgetStatus,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: Option<String>,
        pub amount_minor: Option<i64>,
        pub spent_minor: Option<i64>,
        pub period: Option<BudgetPeriod>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub category: Option<String>,
        pub amount_minor: Option<i64>,
        pub spent_minor: Option<i64>,
        pub period: Option<BudgetPeriod>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        pub kind: Option<TransactionKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: TransactionKind,
        /// `#rrggbb`
        pub color: String,
        pub icon: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: Option<String>,
        pub kind: Option<TransactionKind>,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub kind: Option<TransactionKind>,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod stats {
    use super::*;
    use crate::transaction::TransactionView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub balance_minor: i64,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryShare {
        pub name: String,
        pub amount_minor: i64,
        /// Percent of total expenses.
        pub percentage: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTotals {
        /// `YYYY-MM`
        pub month: String,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingDay {
        pub date: NaiveDate,
        pub amount_minor: i64,
        pub transactions: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyTotal {
        pub date: NaiveDate,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringExpense {
        pub id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub category: String,
        pub next_due_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        pub stats: Statistic,
        pub top_categories: Vec<CategoryShare>,
        pub monthly: Vec<MonthlyTotals>,
        pub highest_spending_day: Option<SpendingDay>,
        pub daily: Vec<DailyTotal>,
        pub recurring: Vec<RecurringExpense>,
        pub recent: Vec<TransactionView>,
    }
}
