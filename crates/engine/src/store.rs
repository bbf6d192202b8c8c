//! In-memory mock data store.
//!
//! The store is a plain value: whoever owns it decides how it is shared. The
//! [`Engine`](crate::Engine) keeps it behind a lock and is the only writer.
//! Nothing here survives a restart.

use serde::{Deserialize, Serialize};

use crate::{Budget, Category, Transaction, TransactionKind};

/// A registered account. The password never leaves the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub(crate) password: String,
}

/// Initial content for a [`Store`], usually read from a JSON file.
///
/// Records in `expenses` and `incomes` get their kind from the list they are
/// in, whatever their own `kind` field says.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub expenses: Vec<Transaction>,
    #[serde(default)]
    pub incomes: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, Default)]
pub struct Store {
    expenses: Vec<Transaction>,
    incomes: Vec<Transaction>,
    budgets: Vec<Budget>,
    categories: Vec<Category>,
    users: Vec<User>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        let with_kind = |kind: TransactionKind, txs: Vec<Transaction>| {
            txs.into_iter()
                .map(|mut tx| {
                    tx.kind = kind;
                    tx
                })
                .collect()
        };
        let budgets = seed
            .budgets
            .into_iter()
            .map(|mut budget| {
                budget.refresh_status();
                budget
            })
            .collect();

        Self {
            expenses: with_kind(TransactionKind::Expense, seed.expenses),
            incomes: with_kind(TransactionKind::Income, seed.incomes),
            budgets,
            categories: seed.categories,
            users: Vec::new(),
        }
    }

    pub fn transactions(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Expense => &self.expenses,
            TransactionKind::Income => &self.incomes,
        }
    }

    pub(crate) fn transactions_mut(&mut self, kind: TransactionKind) -> &mut Vec<Transaction> {
        match kind {
            TransactionKind::Expense => &mut self.expenses,
            TransactionKind::Income => &mut self.incomes,
        }
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub(crate) fn budgets_mut(&mut self) -> &mut Vec<Budget> {
        &mut self.budgets
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub(crate) fn categories_mut(&mut self) -> &mut Vec<Category> {
        &mut self.categories
    }

    pub(crate) fn users(&self) -> &[User] {
        &self.users
    }

    pub(crate) fn users_mut(&mut self) -> &mut Vec<User> {
        &mut self.users
    }
}
