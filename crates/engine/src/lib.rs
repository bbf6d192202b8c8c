pub use budgets::{Budget, BudgetNew, BudgetPatch, BudgetPeriod, BudgetStatus};
pub use categories::{Category, CategoryNew, CategoryPatch};
pub use error::EngineError;
pub use latency::Latency;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use query::{
    PageRequest, QueryResult, SortDirection, SortField, SortSpec, TransactionFilter,
};
pub use stats::{
    CategoryShare, DailyTotal, Dashboard, MonthlyTotals, RecurringExpense, SpendingDay, Statistic,
};
pub use store::{Seed, Store, User};
pub use transactions::{
    PaymentMethod, Transaction, TransactionKind, TransactionNew, TransactionPatch,
    TransactionStatus,
};
pub use validation::{FieldError, Registration, ValidationErrors};

mod budgets;
mod categories;
mod error;
mod latency;
mod money;
mod ops;
pub mod query;
pub mod stats;
mod store;
mod transactions;
mod util;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;
