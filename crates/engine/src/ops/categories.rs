use uuid::Uuid;

use crate::{
    Category, CategoryNew, CategoryPatch, EngineError, ResultEngine, TransactionKind,
    store::Store, util::compare_text,
};

use super::{Engine, with_store};

/// Fail when another category of the same kind already uses the name.
fn ensure_unique(store: &Store, candidate: &Category) -> ResultEngine<()> {
    let key = candidate.name_key();
    let taken = store.categories().iter().any(|existing| {
        existing.id != candidate.id && existing.kind == candidate.kind && existing.name_key() == key
    });
    if taken {
        return Err(EngineError::ExistingKey(candidate.name.clone()));
    }
    Ok(())
}

fn position(store: &Store, id: Uuid) -> ResultEngine<usize> {
    store
        .categories()
        .iter()
        .position(|category| category.id == id)
        .ok_or_else(|| {
            tracing::warn!(%id, "category not found");
            EngineError::KeyNotFound(format!("category {id}"))
        })
}

impl Engine {
    /// Registered categories sorted by name, optionally of one kind only.
    pub async fn list_categories(
        &self,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_store!(self, read |store| {
            let mut categories: Vec<Category> = store
                .categories()
                .iter()
                .filter(|c| kind.is_none_or(|k| c.kind == k))
                .cloned()
                .collect();
            categories.sort_by(|a, b| compare_text(&a.name, &b.name));
            Ok(categories)
        })
    }

    pub async fn create_category(&self, input: CategoryNew) -> ResultEngine<Category> {
        let category = Category::new(input)?;
        with_store!(self, write |store| {
            ensure_unique(&store, &category)?;
            store.categories_mut().push(category.clone());
            tracing::debug!(id = %category.id, name = %category.name, "created category");
            Ok(category)
        })
    }

    pub async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> ResultEngine<Category> {
        with_store!(self, write |store| {
            let idx = position(&store, id)?;
            let updated = store.categories()[idx].patched(patch)?;
            ensure_unique(&store, &updated)?;
            store.categories_mut()[idx] = updated.clone();
            tracing::debug!(%id, "updated category");
            Ok(updated)
        })
    }

    /// Remove a category from the registry. Records already using the name
    /// keep it.
    pub async fn delete_category(&self, id: Uuid) -> ResultEngine<()> {
        with_store!(self, write |store| {
            let idx = position(&store, id)?;
            store.categories_mut().remove(idx);
            tracing::debug!(%id, "deleted category");
            Ok(())
        })
    }
}
