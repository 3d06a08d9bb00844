//! Module containing some extension traits to support code instrumentation
//! using the `tracing` crate.

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::instrument;

use crate::resource::{Patch, Resource, Versioned};
use crate::store::{GetError, Store, UpdateError};
use crate::version::Token;

/// [`Store`] type wrapper that provides instrumentation
/// features through the `tracing` crate.
#[derive(Debug, Clone)]
pub struct InstrumentedStore<T> {
    store: T,
}

#[async_trait]
impl<T, R> Store<R> for InstrumentedStore<T>
where
    T: Store<R>,
    R: Resource + Debug + 'static,
{
    #[allow(clippy::blocks_in_conditions)]
    #[instrument(name = "Store.get", err, skip(self))]
    async fn get(&self, id: &R::Id) -> Result<Versioned<R>, GetError> {
        self.store.get(id).await
    }

    #[allow(clippy::blocks_in_conditions)]
    #[instrument(name = "Store.compare_and_swap", ret, err, skip(self, patch))]
    async fn compare_and_swap<P>(
        &self,
        id: &R::Id,
        expected: Option<Token>,
        patch: P,
    ) -> Result<Versioned<R>, UpdateError>
    where
        P: Patch<R> + 'static,
    {
        self.store.compare_and_swap(id, expected, patch).await
    }

    #[allow(clippy::blocks_in_conditions)]
    #[instrument(name = "Store.insert", err, skip(self))]
    async fn insert(&self, resource: R) -> anyhow::Result<Versioned<R>> {
        self.store.insert(resource).await
    }

    #[allow(clippy::blocks_in_conditions)]
    #[instrument(name = "Store.list", err, skip(self))]
    async fn list(&self) -> anyhow::Result<Vec<Versioned<R>>> {
        self.store.list().await
    }
}

/// Extension trait for any [`Store`] type to provide
/// instrumentation features through the `tracing` crate.
pub trait StoreExt<R>: Store<R> + Sized
where
    R: Resource + Debug,
{
    /// Returns an instrumented version of the [`Store`] instance.
    fn with_tracing(self) -> InstrumentedStore<Self> {
        InstrumentedStore { store: self }
    }
}

impl<T, R> StoreExt<R> for T
where
    T: Store<R>,
    R: Resource + Debug,
{
}
