//! Contains the [`Resource`] and [`Patch`] contracts, and [`apply`], the only
//! way new versions of a [`Resource`] are created.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::version::{Token, TokenError};

/// A mutable record with an identity, a set of editable fields and
/// a last-modified timestamp.
///
/// The serialized form of a [`Resource`] is its content: every serialized
/// field, last-modified included, participates in its [`Token`].
pub trait Resource: Serialize + Clone + Send + Sync {
    /// Type of the unique identifier of the resource.
    type Id: Debug + Clone + Eq + Ord + Hash + Send + Sync;

    /// Returns the unique identifier of the resource.
    fn id(&self) -> &Self::Id;

    /// Returns the instant of the last successful mutation.
    fn last_modified(&self) -> DateTime<Utc>;

    /// Overwrites the last-modified marker.
    fn set_last_modified(&mut self, at: DateTime<Utc>);
}

/// A partial set of field changes for a [`Resource`].
///
/// Only the fields present in the patch are written; absent fields
/// are left untouched.
pub trait Patch<R>: Send
where
    R: Resource,
{
    /// Writes the present fields onto `resource`.
    fn apply_to(self, resource: &mut R);
}

/// Applies `patch` on a copy of `resource`, refreshing its last-modified
/// marker to the current time.
pub fn apply<R, P>(resource: &R, patch: P) -> R
where
    R: Resource,
    P: Patch<R>,
{
    apply_at(resource, patch, Utc::now())
}

/// Same as [`apply`], using `now` as the current time.
///
/// The new last-modified marker is always strictly later than the previous
/// one, so the [`Token`] changes even when no field changed value and the
/// clock did not advance.
pub fn apply_at<R, P>(resource: &R, patch: P, now: DateTime<Utc>) -> R
where
    R: Resource,
    P: Patch<R>,
{
    let mut updated = resource.clone();
    patch.apply_to(&mut updated);
    updated.set_last_modified(succeeding(resource.last_modified(), now));

    updated
}

/// Returns `now` if it is later than `previous`, or the instant right after
/// `previous` otherwise.
pub(crate) fn succeeding(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

/// A [`Resource`] snapshot together with the [`Token`] computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<R> {
    data: Arc<R>,
    token: Token,
}

impl<R> Versioned<R>
where
    R: Serialize,
{
    /// Computes the token of `data` and wraps them together.
    pub fn compute(data: Arc<R>) -> Result<Self, TokenError> {
        let token = Token::compute(data.as_ref())?;
        Ok(Self { data, token })
    }
}

impl<R> Versioned<R> {
    /// Returns the token of the wrapped snapshot.
    #[inline]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Extracts the wrapped snapshot.
    #[inline]
    pub fn take(self) -> Arc<R> {
        self.data
    }

    /// Splits into the snapshot and its token.
    #[inline]
    pub fn into_parts(self) -> (Arc<R>, Token) {
        (self.data, self.token)
    }
}

impl<R> Deref for Versioned<R> {
    type Target = R;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
