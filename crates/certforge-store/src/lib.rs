#![forbid(unsafe_code)]
//! Single-instance in-process stores behind async locks.
//!
//! The norm registry and validation registry are the only owners of
//! their state; every mutation is visible to subsequent reads issued
//! after the mutation completes.

mod documents;
mod norms;
mod validations;

pub use documents::{DirDocumentStore, DocumentStore, MemoryDocumentStore};
pub use norms::NormStore;
pub use validations::ValidationStore;

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unknown id on update/delete/get. Surfaced, never retried.
    NotFound(String),
    /// Uniqueness or version conflict.
    Conflict(String),
    /// Malformed input rejected before any state change.
    Invalid(String),
    /// Storage failure during document persistence; retryable by the
    /// engine, fail-fast for intake.
    Io(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "not found: {what}"),
            StoreError::Conflict(msg) => write!(f, "conflict: {msg}"),
            StoreError::Invalid(msg) => write!(f, "invalid: {msg}"),
            StoreError::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<certforge_model::ValidationError> for StoreError {
    fn from(err: certforge_model::ValidationError) -> Self {
        StoreError::Invalid(err.0)
    }
}
