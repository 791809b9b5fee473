//! Domain-level failures surfaced unchanged to callers.

use crate::domain::ports::StorageError;
use std::fmt;
use thiserror::Error;

/// The entity kinds a lookup can fail to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Pos,
    Review,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::User => "User",
            EntityKind::Pos => "POS",
            EntityKind::Review => "Review",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// A business rule was violated. Maps to a bad-request response.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity could not be resolved by its lookup.
    #[error("{kind} with ID '{id}' could not be found")]
    NotFound { kind: EntityKind, id: i64 },

    /// An unexpected storage fault, propagated raw.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DomainError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        DomainError::NotFound { kind, id }
    }
}
