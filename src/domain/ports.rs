//! Store ports consumed by the domain services.
//!
//! These traits abstract the persistence backend so the services can be
//! exercised against in-memory fakes. Implementations provide the actual
//! storage (Postgres, in-memory).
//!
//! Conventions shared by all ports:
//! - `get_by_id` signals a missing row as `Ok(None)`; only infrastructure
//!   faults become `Err`.
//! - `upsert` assigns the id and `created_at` on first insert, refreshes
//!   `updated_at` on every write, and preserves `created_at` on update.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::model::{Pos, Review, User};

/// Infrastructure-level storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert(&self, user: User) -> Result<User, StorageError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;

    async fn get_all(&self) -> Result<Vec<User>, StorageError>;

    /// Delete a user, returning the deleted row if it existed.
    async fn delete(&self, id: i64) -> Result<Option<User>, StorageError>;
}

#[async_trait]
pub trait PosStore: Send + Sync {
    async fn upsert(&self, pos: Pos) -> Result<Pos, StorageError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Pos>, StorageError>;

    async fn get_all(&self) -> Result<Vec<Pos>, StorageError>;

    async fn delete(&self, id: i64) -> Result<Option<Pos>, StorageError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn upsert(&self, review: Review) -> Result<Review, StorageError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Review>, StorageError>;

    async fn get_all(&self) -> Result<Vec<Review>, StorageError>;

    async fn delete(&self, id: i64) -> Result<Option<Review>, StorageError>;

    /// All reviews of a POS with the given approval status, in storage order.
    async fn filter_by_approval(
        &self,
        pos_id: i64,
        approved: bool,
    ) -> Result<Vec<Review>, StorageError>;

    /// All reviews a user wrote for a POS. Used for duplicate detection.
    async fn filter_by_author(
        &self,
        pos_id: i64,
        author_id: i64,
    ) -> Result<Vec<Review>, StorageError>;

    /// The review authored by the given user, if any.
    async fn get_by_author(&self, author_id: i64) -> Result<Option<Review>, StorageError>;
}
