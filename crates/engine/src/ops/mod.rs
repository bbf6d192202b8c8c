use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;

use crate::{Latency, Store};

mod budgets;
mod categories;
mod dashboard;
mod transactions;
mod users;

/// Run a block against the store once the simulated latency has elapsed.
///
/// The block is the single point where the call resolves: its `Ok` or `Err`
/// is the outcome of the whole operation.
macro_rules! with_store {
    ($self:expr, read |$store:ident| $body:expr) => {{
        $self.latency.wait().await;
        let $store = $self.store.read().await;
        $body
    }};
    ($self:expr, write |$store:ident| $body:expr) => {{
        $self.latency.wait().await;
        #[allow(unused_mut)]
        let mut $store = $self.store.write().await;
        $body
    }};
}

pub(crate) use with_store;

/// Mock backend: the data store plus the simulated network around it.
///
/// Every public operation is `async`, waits the configured [`Latency`] and
/// then settles exactly once. Independent calls are not ordered relative to
/// each other.
#[derive(Debug)]
pub struct Engine {
    store: Arc<RwLock<Store>>,
    latency: Latency,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Store,
    latency: Latency,
}

impl EngineBuilder {
    /// Pass the initial store content
    pub fn store(mut self, store: Store) -> EngineBuilder {
        self.store = store;
        self
    }

    /// Pass the simulated latency
    pub fn latency(mut self, latency: Latency) -> EngineBuilder {
        self.latency = latency;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            store: Arc::new(RwLock::new(self.store)),
            latency: self.latency,
        }
    }
}
