use crate::domain::error::DomainError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub fn ok_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    (
        status,
        Json(ApiResponse {
            success: true,
            data: serde_json::to_value(value).ok(),
            error: None,
        }),
    )
        .into_response()
}

pub fn ok_empty(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse {
            success: true,
            data: None,
            error: None,
        }),
    )
        .into_response()
}

pub fn error_json(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
        .into_response()
}

/// Maps domain failures onto client-facing status codes.
pub fn domain_error_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_json(status, err.to_string())
}
