//! In-memory implementations of the store ports.
//!
//! Rows live in a `HashMap` protected by a `RwLock`; ids are assigned
//! sequentially. All state is lost on restart. Used by the test suites and
//! usable as a throwaway backend for local experiments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::model::{Pos, Review, User};
use crate::domain::ports::{PosStore, ReviewStore, StorageError, UserStore};

pub struct InMemoryUserStore {
    rows: RwLock<HashMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InMemoryPosStore {
    rows: RwLock<HashMap<i64, Pos>>,
    next_id: AtomicI64,
}

impl InMemoryPosStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryPosStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InMemoryReviewStore {
    rows: RwLock<HashMap<i64, Review>>,
    next_id: AtomicI64,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Claim the next id, keeping the counter ahead of explicitly supplied ids.
fn claim_id(next_id: &AtomicI64, requested: Option<i64>) -> i64 {
    match requested {
        Some(id) => {
            next_id.fetch_max(id + 1, Ordering::Relaxed);
            id
        }
        None => next_id.fetch_add(1, Ordering::Relaxed),
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert(&self, mut user: User) -> Result<User, StorageError> {
        let mut rows = self.rows.write().await;
        let id = claim_id(&self.next_id, user.id);
        let now = Utc::now();
        user.id = Some(id);
        user.created_at = rows
            .get(&id)
            .and_then(|existing| existing.created_at)
            .or(Some(now));
        user.updated_at = Some(now);
        rows.insert(id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>, StorageError> {
        let rows = self.rows.read().await;
        let mut all: Vec<User> = rows.values().cloned().collect();
        all.sort_by_key(|user| user.id);
        Ok(all)
    }

    async fn delete(&self, id: i64) -> Result<Option<User>, StorageError> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&id))
    }
}

#[async_trait]
impl PosStore for InMemoryPosStore {
    async fn upsert(&self, mut pos: Pos) -> Result<Pos, StorageError> {
        let mut rows = self.rows.write().await;
        let id = claim_id(&self.next_id, pos.id);
        let now = Utc::now();
        pos.id = Some(id);
        pos.created_at = rows
            .get(&id)
            .and_then(|existing| existing.created_at)
            .or(Some(now));
        pos.updated_at = Some(now);
        rows.insert(id, pos.clone());
        Ok(pos)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Pos>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Pos>, StorageError> {
        let rows = self.rows.read().await;
        let mut all: Vec<Pos> = rows.values().cloned().collect();
        all.sort_by_key(|pos| pos.id);
        Ok(all)
    }

    async fn delete(&self, id: i64) -> Result<Option<Pos>, StorageError> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&id))
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn upsert(&self, mut review: Review) -> Result<Review, StorageError> {
        let mut rows = self.rows.write().await;
        let id = claim_id(&self.next_id, review.id);
        let now = Utc::now();
        review.id = Some(id);
        review.created_at = rows
            .get(&id)
            .and_then(|existing| existing.created_at)
            .or(Some(now));
        review.updated_at = Some(now);
        rows.insert(id, review.clone());
        Ok(review)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Review>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Review>, StorageError> {
        let rows = self.rows.read().await;
        let mut all: Vec<Review> = rows.values().cloned().collect();
        all.sort_by_key(|review| review.id);
        Ok(all)
    }

    async fn delete(&self, id: i64) -> Result<Option<Review>, StorageError> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&id))
    }

    async fn filter_by_approval(
        &self,
        pos_id: i64,
        approved: bool,
    ) -> Result<Vec<Review>, StorageError> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Review> = rows
            .values()
            .filter(|review| review.pos_id == pos_id && review.approved == approved)
            .cloned()
            .collect();
        matches.sort_by_key(|review| review.id);
        Ok(matches)
    }

    async fn filter_by_author(
        &self,
        pos_id: i64,
        author_id: i64,
    ) -> Result<Vec<Review>, StorageError> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Review> = rows
            .values()
            .filter(|review| review.pos_id == pos_id && review.author_id == author_id)
            .cloned()
            .collect();
        matches.sort_by_key(|review| review.id);
        Ok(matches)
    }

    async fn get_by_author(&self, author_id: i64) -> Result<Option<Review>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|review| review.author_id == author_id)
            .min_by_key(|review| review.id)
            .cloned())
    }
}
