use crate::domain::model::{Campus, PosType};
use crate::transport::http::handlers::{health, pos, reviews, users};
use crate::transport::http::types::{
    ApiResponse, ApproveReviewRequest, PosDto, ReviewDto, UpsertPosRequest, UpsertReviewRequest,
    UpsertUserRequest, UserDto,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        users::create_user_handler,
        users::list_users_handler,
        users::get_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        pos::create_pos_handler,
        pos::list_pos_handler,
        pos::get_pos_handler,
        pos::update_pos_handler,
        pos::delete_pos_handler,
        reviews::create_review_handler,
        reviews::list_reviews_handler,
        reviews::get_review_handler,
        reviews::update_review_handler,
        reviews::delete_review_handler,
        reviews::approve_review_handler,
        reviews::filter_reviews_handler,
        reviews::review_by_author_handler
    ),
    components(schemas(
        ApiResponse,
        UserDto,
        UpsertUserRequest,
        PosDto,
        UpsertPosRequest,
        ReviewDto,
        UpsertReviewRequest,
        ApproveReviewRequest,
        Campus,
        PosType
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .route(
            "/api/users/:id",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route("/api/users/:id/review", get(reviews::review_by_author_handler))
        .route(
            "/api/pos",
            get(pos::list_pos_handler).post(pos::create_pos_handler),
        )
        .route(
            "/api/pos/:id",
            get(pos::get_pos_handler)
                .put(pos::update_pos_handler)
                .delete(pos::delete_pos_handler),
        )
        .route("/api/pos/:id/reviews", get(reviews::filter_reviews_handler))
        .route(
            "/api/reviews",
            get(reviews::list_reviews_handler).post(reviews::create_review_handler),
        )
        .route(
            "/api/reviews/:id",
            get(reviews::get_review_handler)
                .put(reviews::update_review_handler)
                .delete(reviews::delete_review_handler),
        )
        .route("/api/reviews/:id/approve", post(reviews::approve_review_handler))
        .with_state(app_state)
}
