use crate::transport::http::handlers::common::{domain_error_response, ok_empty, ok_json};
use crate::transport::http::types::{json_422, ApiResponse, AppState, UpsertUserRequest, UserDto};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UpsertUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    request: Result<Json<UpsertUserRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"login_name\": \"...\", \"email\": \"...\", ...}").into_response(),
    };

    match state.users.upsert(request.into_user(None)).await {
        Ok(user) => ok_json(StatusCode::CREATED, &UserDto::from(&user)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_users_handler(State(state): State<AppState>) -> Response {
    match state.users.get_all().await {
        Ok(users) => {
            let dtos: Vec<UserDto> = users.iter().map(UserDto::from).collect();
            ok_json(StatusCode::OK, &dtos)
        }
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = ApiResponse),
        (status = 404, description = "User not found", body = ApiResponse)
    )
)]
pub async fn get_user_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.users.get_by_id(id).await {
        Ok(user) => ok_json(StatusCode::OK, &UserDto::from(&user)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpsertUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse),
        (status = 404, description = "User not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<UpsertUserRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"login_name\": \"...\", \"email\": \"...\", ...}").into_response(),
    };

    if let Err(e) = state.users.get_by_id(id).await {
        return domain_error_response(e);
    }

    match state.users.upsert(request.into_user(Some(id))).await {
        Ok(user) => ok_json(StatusCode::OK, &UserDto::from(&user)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse),
        (status = 404, description = "User not found", body = ApiResponse)
    )
)]
pub async fn delete_user_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.users.delete(id).await {
        Ok(()) => ok_empty(StatusCode::OK),
        Err(e) => domain_error_response(e),
    }
}
