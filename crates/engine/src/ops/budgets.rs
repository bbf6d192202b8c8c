use uuid::Uuid;

use crate::{Budget, BudgetNew, BudgetPatch, EngineError, ResultEngine, store::Store};

use super::{Engine, today, with_store};

fn position(store: &Store, id: Uuid) -> ResultEngine<usize> {
    store
        .budgets()
        .iter()
        .position(|budget| budget.id == id)
        .ok_or_else(|| {
            tracing::warn!(%id, "budget not found");
            EngineError::KeyNotFound(format!("budget {id}"))
        })
}

impl Engine {
    /// Every budget, with its status derived from the current usage.
    pub async fn list_budgets(&self) -> ResultEngine<Vec<Budget>> {
        with_store!(self, read |store| {
            Ok(store
                .budgets()
                .iter()
                .cloned()
                .map(|mut budget| {
                    budget.refresh_status();
                    budget
                })
                .collect())
        })
    }

    pub async fn create_budget(&self, input: BudgetNew) -> ResultEngine<Budget> {
        let budget = Budget::new(input, today())?;
        with_store!(self, write |store| {
            store.budgets_mut().insert(0, budget.clone());
            tracing::debug!(id = %budget.id, category = %budget.category, "created budget");
            Ok(budget)
        })
    }

    pub async fn update_budget(&self, id: Uuid, patch: BudgetPatch) -> ResultEngine<Budget> {
        with_store!(self, write |store| {
            let idx = position(&store, id)?;
            let budgets = store.budgets_mut();
            let updated = budgets[idx].patched(patch)?;
            budgets[idx] = updated.clone();
            tracing::debug!(%id, status = ?updated.status, "updated budget");
            Ok(updated)
        })
    }

    pub async fn delete_budget(&self, id: Uuid) -> ResultEngine<()> {
        with_store!(self, write |store| {
            let idx = position(&store, id)?;
            store.budgets_mut().remove(idx);
            tracing::debug!(%id, "deleted budget");
            Ok(())
        })
    }
}
