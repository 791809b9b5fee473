//! End-to-end workflow tests for the review approval lifecycle, run against
//! the in-memory storage backend through the public service API.

use std::sync::Arc;

use campus_coffee::storage::memory::{InMemoryPosStore, InMemoryReviewStore, InMemoryUserStore};
use campus_coffee::{
    ApprovalConfig, Campus, DomainError, EntityKind, Pos, PosService, PosType, ReviewDraft,
    ReviewService, User, UserService,
};

struct App {
    users: UserService,
    pos: PosService,
    reviews: ReviewService,
    approval: Arc<ApprovalConfig>,
}

fn app(min_count: u32) -> App {
    let user_store = Arc::new(InMemoryUserStore::new());
    let pos_store = Arc::new(InMemoryPosStore::new());
    let review_store = Arc::new(InMemoryReviewStore::new());
    let approval = Arc::new(ApprovalConfig::new(min_count));
    App {
        users: UserService::new(user_store.clone()),
        pos: PosService::new(pos_store.clone()),
        reviews: ReviewService::new(review_store, user_store, pos_store, approval.clone()),
        approval,
    }
}

async fn create_user(app: &App, login_name: &str) -> i64 {
    let user = app
        .users
        .upsert(User {
            id: None,
            login_name: login_name.to_string(),
            email: format!("{login_name}@uni-heidelberg.de"),
            first_name: login_name.to_string(),
            last_name: "Tester".to_string(),
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();
    user.id.unwrap()
}

async fn create_pos(app: &App, name: &str) -> i64 {
    let pos = app
        .pos
        .upsert(Pos {
            id: None,
            name: name.to_string(),
            description: "espresso and cake".to_string(),
            campus: Campus::Altstadt,
            pos_type: PosType::Cafe,
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();
    pos.id.unwrap()
}

fn draft(author_id: i64, pos_id: i64, text: &str) -> ReviewDraft {
    ReviewDraft {
        id: None,
        text: text.to_string(),
        author_id: Some(author_id),
        pos_id: Some(pos_id),
        approval_count: 0,
        approved: false,
    }
}

#[tokio::test]
async fn full_approval_lifecycle_with_quorum_of_two() {
    let app = app(2);
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let carol = create_user(&app, "carol").await;
    let pos = create_pos(&app, "marstall").await;

    let review = app
        .reviews
        .upsert(draft(alice, pos, "good_filter_coffee"))
        .await
        .unwrap();
    let review_id = review.id.unwrap();
    assert_eq!(review.approval_count, 0);
    assert!(!review.approved);
    assert!(review.created_at.is_some());

    let after_bob = app.reviews.approve(review_id, bob).await.unwrap();
    assert_eq!(after_bob.approval_count, 1);
    assert!(!after_bob.approved);

    let after_carol = app.reviews.approve(review_id, carol).await.unwrap();
    assert_eq!(after_carol.approval_count, 2);
    assert!(after_carol.approved);

    let err = app.reviews.approve(review_id, alice).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    let stored = app.reviews.get_by_id(review_id).await.unwrap();
    assert_eq!(stored.approval_count, 2);
    assert!(stored.approved);
}

#[tokio::test]
async fn duplicate_review_is_rejected_but_updates_pass() {
    let app = app(2);
    let alice = create_user(&app, "alice").await;
    let pos = create_pos(&app, "marstall").await;

    let first = app
        .reviews
        .upsert(draft(alice, pos, "good_filter_coffee"))
        .await
        .unwrap();
    let first_id = first.id.unwrap();

    // A fresh draft for the same (author, POS) pair must fail.
    let err = app
        .reviews
        .upsert(draft(alice, pos, "second_attempt"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // Updating the existing review under its own id succeeds.
    let mut update = draft(alice, pos, "updated_text");
    update.id = Some(first_id);
    let updated = app.reviews.upsert(update).await.unwrap();
    assert_eq!(updated.id, Some(first_id));
    assert_eq!(updated.text, "updated_text");

    // The same author can still review a different POS.
    let other_pos = create_pos(&app, "triplex").await;
    let second = app
        .reviews
        .upsert(draft(alice, other_pos, "fine_too"))
        .await
        .unwrap();
    assert_ne!(second.id, Some(first_id));
}

#[tokio::test]
async fn threshold_raise_recomputes_on_the_next_vote() {
    let app = app(1);
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let carol = create_user(&app, "carol").await;
    let dave = create_user(&app, "dave").await;
    let pos = create_pos(&app, "marstall").await;

    let review = app
        .reviews
        .upsert(draft(alice, pos, "good_filter_coffee"))
        .await
        .unwrap();
    let review_id = review.id.unwrap();

    let approved = app.reviews.approve(review_id, bob).await.unwrap();
    assert!(approved.approved);

    // Stored approval survives while nobody votes, even after a raise.
    app.approval.set_min_count(4);
    let stored = app.reviews.get_by_id(review_id).await.unwrap();
    assert!(stored.approved);

    // The next vote recomputes against the new quorum and flips it back.
    let after_raise = app.reviews.approve(review_id, carol).await.unwrap();
    assert_eq!(after_raise.approval_count, 2);
    assert!(!after_raise.approved);

    // Votes keep accumulating towards the new quorum.
    let after_dave = app.reviews.approve(review_id, dave).await.unwrap();
    assert_eq!(after_dave.approval_count, 3);
    assert!(!after_dave.approved);
}

#[tokio::test]
async fn approval_filter_returns_complementary_subsets() {
    let app = app(1);
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let carol = create_user(&app, "carol").await;
    let pos = create_pos(&app, "marstall").await;

    let r1 = app
        .reviews
        .upsert(draft(alice, pos, "first"))
        .await
        .unwrap();
    let r2 = app.reviews.upsert(draft(bob, pos, "second")).await.unwrap();
    app.reviews
        .approve(r1.id.unwrap(), carol)
        .await
        .unwrap();

    let approved = app.reviews.filter(pos, true).await.unwrap();
    let pending = app.reviews.filter(pos, false).await.unwrap();

    assert_eq!(approved.iter().map(|r| r.id).collect::<Vec<_>>(), vec![r1.id]);
    assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![r2.id]);
}

#[tokio::test]
async fn lookup_failures_carry_the_entity_kind() {
    let app = app(2);
    let alice = create_user(&app, "alice").await;
    let pos = create_pos(&app, "marstall").await;
    let review = app
        .reviews
        .upsert(draft(alice, pos, "good_filter_coffee"))
        .await
        .unwrap();

    let err = app.reviews.approve(review.id.unwrap(), 404).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            kind: EntityKind::User,
            id: 404
        }
    ));

    let err = app.reviews.approve(500, alice).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            kind: EntityKind::Review,
            id: 500
        }
    ));

    let err = app.pos.get_by_id(999).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            kind: EntityKind::Pos,
            id: 999
        }
    ));
}

#[tokio::test]
async fn user_and_pos_services_delegate_crud() {
    let app = app(2);
    let alice = create_user(&app, "alice").await;

    let fetched = app.users.get_by_id(alice).await.unwrap();
    assert_eq!(fetched.login_name, "alice");

    let mut renamed = fetched.clone();
    renamed.last_name = "Renamed".to_string();
    let updated = app.users.upsert(renamed).await.unwrap();
    assert_eq!(updated.last_name, "Renamed");
    assert_eq!(updated.created_at, fetched.created_at);

    app.users.delete(alice).await.unwrap();
    let err = app.users.delete(alice).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            kind: EntityKind::User,
            ..
        }
    ));

    assert!(app.pos.get_all().await.unwrap().is_empty());
    let pos = create_pos(&app, "marstall").await;
    assert_eq!(app.pos.get_all().await.unwrap().len(), 1);
    app.pos.delete(pos).await.unwrap();
    assert!(app.pos.get_all().await.unwrap().is_empty());
}
