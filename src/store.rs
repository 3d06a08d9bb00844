//! Contains the [`Store`] abstraction used to read and conditionally update
//! [`Resource`]s, and its [`InMemory`] implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::precondition::{self, PreconditionError};
use crate::resource::{self, Patch, Resource, Versioned};
use crate::version::Token;

/// Error returned by [`Store::get`].
#[derive(Debug, thiserror::Error)]
pub enum GetError {
    /// The requested resource does not exist in the store.
    #[error("resource was not found")]
    NotFound,

    /// Error returned when the [`Store`] implementation has encountered an error.
    #[error("failed to get resource, an error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error returned by [`Store::compare_and_swap`].
///
/// Whatever the variant, the stored resource is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The resource to update does not exist in the store.
    #[error("resource was not found")]
    NotFound,

    /// The write was not admitted by the precondition check.
    #[error("failed to update resource: {0}")]
    Precondition(#[from] PreconditionError),

    /// Error returned when the [`Store`] implementation has encountered an error.
    #[error("failed to update resource, an error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A Store owns [`Resource`]s and serializes conditional updates
/// on each of them.
///
/// Implementations must run the precondition check and the mutation of
/// [`Store::compare_and_swap`] as one critical section per resource id, and
/// replace the stored record in one indivisible step, so that readers never
/// observe a partially-applied mutation.
#[async_trait]
pub trait Store<R>: Send + Sync
where
    R: Resource,
{
    /// Returns the current state of the resource and its freshly computed [`Token`].
    async fn get(&self, id: &R::Id) -> Result<Versioned<R>, GetError>;

    /// Applies `patch` on the resource only if `expected` matches its current [`Token`].
    ///
    /// The result is the new state of the resource with its new [`Token`].
    async fn compare_and_swap<P>(
        &self,
        id: &R::Id,
        expected: Option<Token>,
        patch: P,
    ) -> Result<Versioned<R>, UpdateError>
    where
        P: Patch<R> + 'static;

    /// Stores `resource`, replacing any record with the same id.
    ///
    /// A replacement is stamped strictly later than the record it replaces,
    /// so its [`Token`] differs from every token issued for that id so far.
    async fn insert(&self, resource: R) -> anyhow::Result<Versioned<R>>;

    /// Returns all the stored resources, ordered by id.
    async fn list(&self) -> anyhow::Result<Vec<Versioned<R>>>;
}

type Slot<R> = Arc<RwLock<Arc<R>>>;

/// In-memory implementation of the [`Store`] trait,
/// backed by a thread-safe [`BTreeMap`].
///
/// Each resource lives in its own lock: writers to the same id are serialized,
/// writers to different ids and all readers proceed concurrently.
#[derive(Debug)]
pub struct InMemory<R>
where
    R: Resource,
{
    backend: Arc<RwLock<BTreeMap<R::Id, Slot<R>>>>,
}

impl<R> Default for InMemory<R>
where
    R: Resource,
{
    fn default() -> Self {
        Self {
            backend: Arc::default(),
        }
    }
}

impl<R> Clone for InMemory<R>
where
    R: Resource,
{
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

impl<R> InMemory<R>
where
    R: Resource,
{
    fn slot(&self, id: &R::Id) -> Option<Slot<R>> {
        self.backend.read().get(id).cloned()
    }
}

#[async_trait]
impl<R> Store<R> for InMemory<R>
where
    R: Resource + 'static,
{
    async fn get(&self, id: &R::Id) -> Result<Versioned<R>, GetError> {
        let slot = self.slot(id).ok_or(GetError::NotFound)?;
        let snapshot = slot.read().clone();

        Versioned::compute(snapshot).map_err(|err| GetError::Internal(err.into()))
    }

    async fn compare_and_swap<P>(
        &self,
        id: &R::Id,
        expected: Option<Token>,
        patch: P,
    ) -> Result<Versioned<R>, UpdateError>
    where
        P: Patch<R> + 'static,
    {
        let slot = self.slot(id).ok_or(UpdateError::NotFound)?;
        let mut current = slot.write();

        // The token is recomputed under the lock: no other writer can
        // change the resource between this check and the swap below.
        precondition::admit(current.as_ref(), expected.as_ref())?;

        let updated = Arc::new(resource::apply(current.as_ref(), patch));
        let versioned =
            Versioned::compute(updated.clone()).map_err(|err| UpdateError::Internal(err.into()))?;

        *current = updated;

        Ok(versioned)
    }

    async fn insert(&self, mut resource: R) -> anyhow::Result<Versioned<R>> {
        let id = resource.id().clone();
        let mut backend = self.backend.write();

        if let Some(slot) = backend.get(&id) {
            let mut current = slot.write();

            // Replacements move forward in time, so the new content never
            // reproduces a token handed out for an earlier version.
            let at = resource::succeeding(current.last_modified(), resource.last_modified());
            resource.set_last_modified(at);

            let data = Arc::new(resource);
            let versioned = Versioned::compute(data.clone())?;
            *current = data;

            return Ok(versioned);
        }

        let data = Arc::new(resource);
        let versioned = Versioned::compute(data.clone())?;
        backend.insert(id, Arc::new(RwLock::new(data)));

        Ok(versioned)
    }

    async fn list(&self) -> anyhow::Result<Vec<Versioned<R>>> {
        let snapshots: Vec<Arc<R>> = self
            .backend
            .read()
            .values()
            .map(|slot| slot.read().clone())
            .collect();

        snapshots
            .into_iter()
            .map(|snapshot| Versioned::compute(snapshot).map_err(anyhow::Error::from))
            .collect()
    }
}
