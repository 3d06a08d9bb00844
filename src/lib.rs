//! `precondition` exposes a few building blocks to protect resources from
//! lost updates using Optimistic Concurrency Control, the way HTTP does it
//! with `ETag` and `If-Match`:
//!
//! 1. every read returns a [`Token`] computed from the resource content,
//! 2. every write must present the [`Token`] it was based on,
//! 3. a [`Store`] admits the write only if that [`Token`] still matches,
//!    and applies it in the same critical section.
//!
//! It also ships offset-based [`pagination`] helpers used to serve large
//! collections in bounded pages.

#![deny(unsafe_code, unused_qualifications, trivial_casts)]
#![warn(clippy::all)]

pub mod pagination;
pub mod precondition;
pub mod report;
pub mod resource;
pub mod store;
#[cfg(feature = "tracing")]
pub mod tracing;
pub mod version;

#[cfg(test)]
mod fixtures;

pub use {
    precondition::{admit, PreconditionError},
    resource::{apply, Patch, Resource, Versioned},
    store::{InMemory, Store},
    version::{ConflictError, Token},
};
