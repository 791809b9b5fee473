use crate::domain::model::ReviewDraft;
use crate::transport::http::handlers::common::{
    domain_error_response, error_json, ok_empty, ok_json,
};
use crate::transport::http::types::{
    json_422, validate_review_text, ApiResponse, AppState, ApproveReviewRequest, ApprovedQuery,
    ReviewDto, UpsertReviewRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = UpsertReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse),
        (status = 400, description = "Bad request (invalid text, duplicate review, missing references)", body = ApiResponse),
        (status = 404, description = "Referenced author or POS not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn create_review_handler(
    State(state): State<AppState>,
    request: Result<Json<UpsertReviewRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"review\": \"...\", \"pos_id\": 1, \"author_id\": 1}")
                .into_response()
        }
    };

    if let Err(msg) = validate_review_text(&request.review) {
        return error_json(StatusCode::BAD_REQUEST, msg);
    }

    // The author reference is resolved at the mapping boundary; POS existence
    // is the review service's concern.
    if let Some(author_id) = request.author_id {
        if let Err(e) = state.users.get_by_id(author_id).await {
            return domain_error_response(e);
        }
    }

    let draft = ReviewDraft {
        id: None,
        text: request.review,
        author_id: request.author_id,
        pos_id: request.pos_id,
        approval_count: 0,
        approved: false,
    };

    match state.reviews.upsert(draft).await {
        Ok(review) => ok_json(StatusCode::CREATED, &ReviewDto::from(&review)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    responses(
        (status = 200, description = "All reviews", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_reviews_handler(State(state): State<AppState>) -> Response {
    match state.reviews.get_all().await {
        Ok(reviews) => {
            let dtos: Vec<ReviewDto> = reviews.iter().map(ReviewDto::from).collect();
            ok_json(StatusCode::OK, &dtos)
        }
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(("id" = i64, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review found", body = ApiResponse),
        (status = 404, description = "Review not found", body = ApiResponse)
    )
)]
pub async fn get_review_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.reviews.get_by_id(id).await {
        Ok(review) => ok_json(StatusCode::OK, &ReviewDto::from(&review)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(("id" = i64, Path, description = "Review id")),
    request_body = UpsertReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse),
        (status = 400, description = "Bad request (invalid text, duplicate review)", body = ApiResponse),
        (status = 404, description = "Review not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn update_review_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<UpsertReviewRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"review\": \"...\", \"pos_id\": 1, \"author_id\": 1}")
                .into_response()
        }
    };

    if let Err(msg) = validate_review_text(&request.review) {
        return error_json(StatusCode::BAD_REQUEST, msg);
    }

    let existing = match state.reviews.get_by_id(id).await {
        Ok(review) => review,
        Err(e) => return domain_error_response(e),
    };

    let author_id = request.author_id.unwrap_or(existing.author_id);
    if let Err(e) = state.users.get_by_id(author_id).await {
        return domain_error_response(e);
    }

    // The approval state is carried over untouched; only the approve
    // operation ever mutates it.
    let draft = ReviewDraft {
        id: Some(id),
        text: request.review,
        author_id: Some(author_id),
        pos_id: Some(request.pos_id.unwrap_or(existing.pos_id)),
        approval_count: existing.approval_count,
        approved: existing.approved,
    };

    match state.reviews.upsert(draft).await {
        Ok(review) => ok_json(StatusCode::OK, &ReviewDto::from(&review)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = i64, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse),
        (status = 404, description = "Review not found", body = ApiResponse)
    )
)]
pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match state.reviews.delete(id).await {
        Ok(()) => ok_empty(StatusCode::OK),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/approve",
    params(("id" = i64, Path, description = "Review id")),
    request_body = ApproveReviewRequest,
    responses(
        (status = 200, description = "Approval registered", body = ApiResponse),
        (status = 400, description = "Bad request (self-approval)", body = ApiResponse),
        (status = 404, description = "Review, user or POS not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn approve_review_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<ApproveReviewRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"user_id\": 1}").into_response(),
    };

    match state.reviews.approve(id, request.user_id).await {
        Ok(review) => ok_json(StatusCode::OK, &ReviewDto::from(&review)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/pos/{id}/reviews",
    params(
        ("id" = i64, Path, description = "POS id"),
        ("approved" = bool, Query, description = "Approval status to filter by")
    ),
    responses(
        (status = 200, description = "Reviews for the POS with the given approval status", body = ApiResponse),
        (status = 404, description = "POS not found", body = ApiResponse)
    )
)]
pub async fn filter_reviews_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ApprovedQuery>,
) -> Response {
    match state.reviews.filter(id, query.approved).await {
        Ok(reviews) => {
            let dtos: Vec<ReviewDto> = reviews.iter().map(ReviewDto::from).collect();
            ok_json(StatusCode::OK, &dtos)
        }
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/review",
    params(("id" = i64, Path, description = "Author (user) id")),
    responses(
        (status = 200, description = "The author's review", body = ApiResponse),
        (status = 404, description = "No review by this author", body = ApiResponse)
    )
)]
pub async fn review_by_author_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match state.reviews.get_by_author(id).await {
        Ok(review) => ok_json(StatusCode::OK, &ReviewDto::from(&review)),
        Err(e) => domain_error_response(e),
    }
}
