//! In-process HTTP test: build the router on the in-memory backend, bind an
//! ephemeral port and drive the API like an external client.

use std::sync::Arc;

use serde_json::{json, Value};

use campus_coffee::storage::memory::{InMemoryPosStore, InMemoryReviewStore, InMemoryUserStore};
use campus_coffee::transport;
use campus_coffee::{ApprovalConfig, PosService, ReviewService, UserService};

async fn spawn_server(min_count: u32) -> String {
    let user_store = Arc::new(InMemoryUserStore::new());
    let pos_store = Arc::new(InMemoryPosStore::new());
    let review_store = Arc::new(InMemoryReviewStore::new());
    let approval = Arc::new(ApprovalConfig::new(min_count));

    let app_state = transport::http::AppState {
        users: Arc::new(UserService::new(user_store.clone())),
        pos: Arc::new(PosService::new(pos_store.clone())),
        reviews: Arc::new(ReviewService::new(
            review_store,
            user_store,
            pos_store,
            approval,
        )),
        pool: None,
    };
    let router = transport::http::create_router(app_state);

    // Ephemeral port to avoid conflicts if an API server is already running.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

fn data(body: &Value) -> &Value {
    assert_eq!(body["success"], json!(true), "body was: {body}");
    &body["data"]
}

async fn create_user(client: &reqwest::Client, base: &str, login_name: &str) -> i64 {
    let resp = client
        .post(format!("{base}/api/users"))
        .json(&json!({
            "login_name": login_name,
            "email": format!("{login_name}@uni-heidelberg.de"),
            "first_name": login_name,
            "last_name": "Tester"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    data(&body)["id"].as_i64().unwrap()
}

async fn create_pos(client: &reqwest::Client, base: &str, name: &str) -> i64 {
    let resp = client
        .post(format!("{base}/api/pos"))
        .json(&json!({
            "name": name,
            "description": "espresso and cake",
            "campus": "altstadt",
            "pos_type": "cafe"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    data(&body)["id"].as_i64().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn review_api_end_to_end() {
    let base = spawn_server(2).await;
    let client = reqwest::Client::new();

    // Health first.
    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let alice = create_user(&client, &base, "alice").await;
    let bob = create_user(&client, &base, "bob").await;
    let carol = create_user(&client, &base, "carol").await;
    let pos = create_pos(&client, &base, "marstall").await;

    // Create a review.
    let resp = client
        .post(format!("{base}/api/reviews"))
        .json(&json!({ "review": "good_filter_coffee", "pos_id": pos, "author_id": alice }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let review_id = data(&body)["id"].as_i64().unwrap();
    assert_eq!(data(&body)["approval_count"], json!(0));
    assert_eq!(data(&body)["approved"], json!(false));

    // A second review by the same author for the same POS is rejected.
    let resp = client
        .post(format!("{base}/api/reviews"))
        .json(&json!({ "review": "another_one", "pos_id": pos, "author_id": alice }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Approvals accumulate until the quorum of two.
    let resp = client
        .post(format!("{base}/api/reviews/{review_id}/approve"))
        .json(&json!({ "user_id": bob }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body)["approval_count"], json!(1));
    assert_eq!(data(&body)["approved"], json!(false));

    let resp = client
        .post(format!("{base}/api/reviews/{review_id}/approve"))
        .json(&json!({ "user_id": carol }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body)["approval_count"], json!(2));
    assert_eq!(data(&body)["approved"], json!(true));

    // Self-approval is a bad request and does not change the count.
    let resp = client
        .post(format!("{base}/api/reviews/{review_id}/approve"))
        .json(&json!({ "user_id": alice }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!("{base}/api/reviews/{review_id}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body)["approval_count"], json!(2));

    // The approval filter partitions the POS's reviews.
    let resp = client
        .get(format!("{base}/api/pos/{pos}/reviews?approved=true"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body).as_array().unwrap().len(), 1);

    let resp = client
        .get(format!("{base}/api/pos/{pos}/reviews?approved=false"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body).as_array().unwrap().len(), 0);

    // Lookup by author.
    let resp = client
        .get(format!("{base}/api/users/{alice}/review"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body)["id"].as_i64(), Some(review_id));

    let resp = client
        .get(format!("{base}/api/users/{bob}/review"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn review_api_rejects_bad_input() {
    let base = spawn_server(2).await;
    let client = reqwest::Client::new();

    let alice = create_user(&client, &base, "alice").await;
    let pos = create_pos(&client, &base, "marstall").await;

    // Text with non-word characters fails boundary validation.
    let resp = client
        .post(format!("{base}/api/reviews"))
        .json(&json!({ "review": "nice coffee!", "pos_id": pos, "author_id": alice }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Unknown POS and unknown author resolve to 404.
    let resp = client
        .post(format!("{base}/api/reviews"))
        .json(&json!({ "review": "fine", "pos_id": 999, "author_id": alice }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/api/reviews"))
        .json(&json!({ "review": "fine", "pos_id": pos, "author_id": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Missing references are a validation failure, not a routing error.
    let resp = client
        .post(format!("{base}/api/reviews"))
        .json(&json!({ "review": "fine" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Malformed JSON body.
    let resp = client
        .post(format!("{base}/api/reviews"))
        .header("content-type", "application/json")
        .body("{not json}")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    // Approving a review that does not exist.
    let resp = client
        .post(format!("{base}/api/reviews/123/approve"))
        .json(&json!({ "user_id": alice }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn review_update_keeps_approval_state() {
    let base = spawn_server(1).await;
    let client = reqwest::Client::new();

    let alice = create_user(&client, &base, "alice").await;
    let bob = create_user(&client, &base, "bob").await;
    let pos = create_pos(&client, &base, "marstall").await;

    let resp = client
        .post(format!("{base}/api/reviews"))
        .json(&json!({ "review": "good_filter_coffee", "pos_id": pos, "author_id": alice }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let review_id = data(&body)["id"].as_i64().unwrap();

    let resp = client
        .post(format!("{base}/api/reviews/{review_id}/approve"))
        .json(&json!({ "user_id": bob }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body)["approved"], json!(true));

    // Editing the text must not reset the approval state.
    let resp = client
        .put(format!("{base}/api/reviews/{review_id}"))
        .json(&json!({ "review": "still_good_coffee" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(data(&body)["review"], json!("still_good_coffee"));
    assert_eq!(data(&body)["approval_count"], json!(1));
    assert_eq!(data(&body)["approved"], json!(true));

    // Updating a review that does not exist is a 404.
    let resp = client
        .put(format!("{base}/api/reviews/999"))
        .json(&json!({ "review": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
