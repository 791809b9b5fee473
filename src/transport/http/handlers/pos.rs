use crate::transport::http::handlers::common::{domain_error_response, ok_empty, ok_json};
use crate::transport::http::types::{json_422, ApiResponse, AppState, PosDto, UpsertPosRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/pos",
    request_body = UpsertPosRequest,
    responses(
        (status = 201, description = "POS created", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_pos_handler(
    State(state): State<AppState>,
    request: Result<Json<UpsertPosRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"name\": \"...\", \"description\": \"...\", \"campus\": \"...\", \"pos_type\": \"...\"}")
                .into_response()
        }
    };

    match state.pos.upsert(request.into_pos(None)).await {
        Ok(pos) => ok_json(StatusCode::CREATED, &PosDto::from(&pos)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/pos",
    responses(
        (status = 200, description = "All POS", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_pos_handler(State(state): State<AppState>) -> Response {
    match state.pos.get_all().await {
        Ok(all) => {
            let dtos: Vec<PosDto> = all.iter().map(PosDto::from).collect();
            ok_json(StatusCode::OK, &dtos)
        }
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/pos/{id}",
    params(("id" = i64, Path, description = "POS id")),
    responses(
        (status = 200, description = "POS found", body = ApiResponse),
        (status = 404, description = "POS not found", body = ApiResponse)
    )
)]
pub async fn get_pos_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.pos.get_by_id(id).await {
        Ok(pos) => ok_json(StatusCode::OK, &PosDto::from(&pos)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/pos/{id}",
    params(("id" = i64, Path, description = "POS id")),
    request_body = UpsertPosRequest,
    responses(
        (status = 200, description = "POS updated", body = ApiResponse),
        (status = 404, description = "POS not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn update_pos_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<UpsertPosRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"name\": \"...\", \"description\": \"...\", \"campus\": \"...\", \"pos_type\": \"...\"}")
                .into_response()
        }
    };

    if let Err(e) = state.pos.get_by_id(id).await {
        return domain_error_response(e);
    }

    match state.pos.upsert(request.into_pos(Some(id))).await {
        Ok(pos) => ok_json(StatusCode::OK, &PosDto::from(&pos)),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/pos/{id}",
    params(("id" = i64, Path, description = "POS id")),
    responses(
        (status = 200, description = "POS deleted", body = ApiResponse),
        (status = 404, description = "POS not found", body = ApiResponse)
    )
)]
pub async fn delete_pos_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.pos.delete(id).await {
        Ok(()) => ok_empty(StatusCode::OK),
        Err(e) => domain_error_response(e),
    }
}
