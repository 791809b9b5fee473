//! The review service: approval workflow and review invariants.
//!
//! This is the only place with business rules. Validation runs against the
//! user/POS lookups, duplicate detection against the review store, and the
//! approval quorum against [`ApprovalConfig`]. Persistence is delegated to
//! the [`ReviewStore`] port.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::error::{DomainError, EntityKind};
use crate::domain::model::{Review, ReviewDraft};
use crate::domain::ports::{PosStore, ReviewStore, UserStore};

/// Quorum configuration for review approval.
///
/// The threshold is read at call time, never captured when a review is
/// created, so retuning it affects the next approval of every review.
#[derive(Debug)]
pub struct ApprovalConfig {
    min_count: AtomicU32,
}

impl ApprovalConfig {
    /// `min_count` is clamped to at least 1.
    pub fn new(min_count: u32) -> Self {
        Self {
            min_count: AtomicU32::new(min_count.max(1)),
        }
    }

    pub fn min_count(&self) -> u32 {
        self.min_count.load(Ordering::Relaxed)
    }

    pub fn set_min_count(&self, min_count: u32) {
        self.min_count.store(min_count.max(1), Ordering::Relaxed);
    }
}

/// True when persisting a review with `candidate_id` would violate the
/// one-review-per-author-per-POS rule, given the author's existing reviews
/// for that POS. Updating the existing review (same id) is not a conflict.
pub fn conflicts_with_existing(existing: &[Review], candidate_id: Option<i64>) -> bool {
    match existing.first() {
        None => false,
        Some(existing_review) => match (existing_review.id, candidate_id) {
            (Some(existing_id), Some(id)) => existing_id != id,
            // An unsaved draft next to an existing review is always a duplicate.
            _ => true,
        },
    }
}

/// True once the approval count reaches the configured quorum.
pub fn meets_quorum(approval_count: u32, min_count: u32) -> bool {
    approval_count >= min_count
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    users: Arc<dyn UserStore>,
    pos: Arc<dyn PosStore>,
    approval: Arc<ApprovalConfig>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        users: Arc<dyn UserStore>,
        pos: Arc<dyn PosStore>,
        approval: Arc<ApprovalConfig>,
    ) -> Self {
        Self {
            reviews,
            users,
            pos,
            approval,
        }
    }

    /// Create or update a review.
    ///
    /// Storage faults are reclassified as validation errors here (and only
    /// here); domain errors pass through unchanged.
    pub async fn upsert(&self, draft: ReviewDraft) -> Result<Review, DomainError> {
        let draft_id = draft.id;
        match self.upsert_checked(draft).await {
            Err(DomainError::Storage(err)) => {
                warn!("storing review {} failed: {err}", format_draft_id(draft_id));
                Err(DomainError::Validation(format!(
                    "could not process review with ID '{}'",
                    format_draft_id(draft_id)
                )))
            }
            other => other,
        }
    }

    async fn upsert_checked(&self, draft: ReviewDraft) -> Result<Review, DomainError> {
        let (author_id, pos_id) = match (draft.author_id, draft.pos_id) {
            (Some(author_id), Some(pos_id)) => (author_id, pos_id),
            _ => {
                return Err(DomainError::Validation(
                    "review must reference a valid POS and author".to_string(),
                ))
            }
        };

        if self.pos.get_by_id(pos_id).await?.is_none() {
            return Err(DomainError::not_found(EntityKind::Pos, pos_id));
        }

        let existing = self.reviews.filter_by_author(pos_id, author_id).await?;
        if conflicts_with_existing(&existing, draft.id) {
            return Err(DomainError::Validation(
                "a user cannot create more than one review per POS".to_string(),
            ));
        }

        let review = Review {
            id: draft.id,
            text: draft.text,
            author_id,
            pos_id,
            approval_count: draft.approval_count,
            approved: draft.approved,
            created_at: None,
            updated_at: None,
        };
        Ok(self.reviews.upsert(review).await?)
    }

    /// All reviews of a POS with the given approval status, in storage order.
    pub async fn filter(&self, pos_id: i64, approved: bool) -> Result<Vec<Review>, DomainError> {
        if self.pos.get_by_id(pos_id).await?.is_none() {
            return Err(DomainError::not_found(EntityKind::Pos, pos_id));
        }
        Ok(self.reviews.filter_by_approval(pos_id, approved).await?)
    }

    /// Register one approval vote by `user_id` on the review `review_id`.
    ///
    /// The authoritative review state is re-read from storage before the
    /// mutation; the approval status is recomputed against the currently
    /// configured quorum on every call.
    pub async fn approve(&self, review_id: i64, user_id: i64) -> Result<Review, DomainError> {
        info!("processing approval request for review '{review_id}' by user '{user_id}'");

        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found(EntityKind::User, user_id));
        }

        let Some(mut review) = self.reviews.get_by_id(review_id).await? else {
            return Err(DomainError::not_found(EntityKind::Review, review_id));
        };

        // Defends against a dangling POS reference.
        if self.pos.get_by_id(review.pos_id).await?.is_none() {
            return Err(DomainError::not_found(EntityKind::Pos, review.pos_id));
        }

        if review.author_id == user_id {
            return Err(DomainError::Validation(format!(
                "user with ID '{user_id}' cannot approve their own review"
            )));
        }

        review.approval_count += 1;
        review.approved = meets_quorum(review.approval_count, self.approval.min_count());
        if review.approved {
            debug!("review '{review_id}' reached the approval quorum");
        }

        Ok(self.reviews.upsert(review).await?)
    }

    /// The single review authored by the given user.
    pub async fn get_by_author(&self, author_id: i64) -> Result<Review, DomainError> {
        debug!("retrieving review by author '{author_id}'");
        self.reviews
            .get_by_author(author_id)
            .await?
            .ok_or(DomainError::NotFound {
                kind: EntityKind::Review,
                id: author_id,
            })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Review, DomainError> {
        self.reviews
            .get_by_id(id)
            .await?
            .ok_or(DomainError::not_found(EntityKind::Review, id))
    }

    pub async fn get_all(&self) -> Result<Vec<Review>, DomainError> {
        Ok(self.reviews.get_all().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.reviews
            .delete(id)
            .await?
            .ok_or(DomainError::not_found(EntityKind::Review, id))?;
        Ok(())
    }
}

fn format_draft_id(id: Option<i64>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "new".to_string(),
    }
}
