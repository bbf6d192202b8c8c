use crate::{Dashboard, ResultEngine, TransactionKind, stats};

use super::{Engine, today, with_store};

impl Engine {
    pub async fn dashboard(&self) -> ResultEngine<Dashboard> {
        with_store!(self, read |store| {
            Ok(stats::dashboard(
                store.transactions(TransactionKind::Expense),
                store.transactions(TransactionKind::Income),
                today(),
            ))
        })
    }
}
