use uuid::Uuid;

use crate::{
    EngineError, PageRequest, QueryResult, ResultEngine, SortSpec, Transaction, TransactionFilter,
    TransactionKind, TransactionNew, TransactionPatch,
    query::{self, distinct_categories},
    store::Store,
};

use super::{Engine, today, with_store};

fn not_found(kind: TransactionKind, id: Uuid) -> EngineError {
    tracing::warn!(%kind, %id, "transaction not found");
    EngineError::KeyNotFound(format!("{kind} {id}"))
}

fn position(store: &Store, kind: TransactionKind, id: Uuid) -> ResultEngine<usize> {
    store
        .transactions(kind)
        .iter()
        .position(|tx| tx.id == id)
        .ok_or_else(|| not_found(kind, id))
}

impl Engine {
    /// One page of `kind` records matching `filter`, sorted by `sort`.
    ///
    /// `categories` lists every category used by the collection plus the
    /// registered categories of the same kind.
    pub async fn list_transactions(
        &self,
        kind: TransactionKind,
        filter: &TransactionFilter,
        sort: Option<&SortSpec>,
        page: &PageRequest,
    ) -> ResultEngine<QueryResult<Transaction>> {
        with_store!(self, read |store| {
            let mut result = query::query(store.transactions(kind), filter, sort, page);
            let registered = store
                .categories()
                .iter()
                .filter(|c| c.kind == kind)
                .map(|c| c.name.as_str());
            result.categories = distinct_categories(
                result.categories.iter().map(String::as_str).chain(registered),
            );
            tracing::debug!(
                %kind,
                total = result.total,
                page = page.index(),
                "listed transactions"
            );
            Ok(result)
        })
    }

    pub async fn transaction(&self, kind: TransactionKind, id: Uuid) -> ResultEngine<Transaction> {
        with_store!(self, read |store| {
            let idx = position(&store, kind, id)?;
            Ok(store.transactions(kind)[idx].clone())
        })
    }

    /// Validate and store a new record. Newest records come first.
    pub async fn create_transaction(
        &self,
        kind: TransactionKind,
        input: TransactionNew,
    ) -> ResultEngine<Transaction> {
        let tx = Transaction::new(kind, input, today())?;
        with_store!(self, write |store| {
            store.transactions_mut(kind).insert(0, tx.clone());
            tracing::debug!(%kind, id = %tx.id, "created transaction");
            Ok(tx)
        })
    }

    pub async fn update_transaction(
        &self,
        kind: TransactionKind,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        with_store!(self, write |store| {
            let idx = position(&store, kind, id)?;
            let txs = store.transactions_mut(kind);
            let updated = txs[idx].patched(patch)?;
            txs[idx] = updated.clone();
            tracing::debug!(%kind, %id, "updated transaction");
            Ok(updated)
        })
    }

    pub async fn delete_transaction(&self, kind: TransactionKind, id: Uuid) -> ResultEngine<()> {
        with_store!(self, write |store| {
            let idx = position(&store, kind, id)?;
            store.transactions_mut(kind).remove(idx);
            tracing::debug!(%kind, %id, "deleted transaction");
            Ok(())
        })
    }
}
