//! HTTP-facing types: shared state, response envelope, DTOs and their
//! mapping to and from the domain entities.

use crate::domain::model::{Campus, Pos, PosType, Review, User};
use crate::{PosService, ReviewService, UserService};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub pos: Arc<PosService>,
    pub reviews: Arc<ReviewService>,
    /// Present on the Postgres backend; the health check pings through it.
    pub pool: Option<PgPool>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UserDto {
    pub id: Option<i64>,
    pub login_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UpsertUserRequest {
    pub login_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct PosDto {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub campus: Campus,
    pub pos_type: PosType,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UpsertPosRequest {
    pub name: String,
    pub description: String,
    pub campus: Campus,
    pub pos_type: PosType,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ReviewDto {
    pub id: Option<i64>,
    pub review: String,
    pub approval_count: u32,
    pub approved: bool,
    pub pos_id: i64,
    pub author_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating and updating reviews. On update, a missing `pos_id`
/// or `author_id` keeps the stored reference.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UpsertReviewRequest {
    pub review: String,
    #[serde(default)]
    pub pos_id: Option<i64>,
    #[serde(default)]
    pub author_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApproveReviewRequest {
    pub user_id: i64,
}

#[derive(Deserialize, Debug)]
pub struct ApprovedQuery {
    pub approved: bool,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        UserDto {
            id: user.id,
            login_name: user.login_name.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&Pos> for PosDto {
    fn from(pos: &Pos) -> Self {
        PosDto {
            id: pos.id,
            name: pos.name.clone(),
            description: pos.description.clone(),
            campus: pos.campus,
            pos_type: pos.pos_type,
            created_at: pos.created_at,
            updated_at: pos.updated_at,
        }
    }
}

impl From<&Review> for ReviewDto {
    fn from(review: &Review) -> Self {
        ReviewDto {
            id: review.id,
            review: review.text.clone(),
            approval_count: review.approval_count,
            approved: review.approved,
            pos_id: review.pos_id,
            author_id: review.author_id,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

impl UpsertUserRequest {
    pub fn into_user(self, id: Option<i64>) -> User {
        User {
            id,
            login_name: self.login_name,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: None,
            updated_at: None,
        }
    }
}

impl UpsertPosRequest {
    pub fn into_pos(self, id: Option<i64>) -> Pos {
        Pos {
            id,
            name: self.name,
            description: self.description,
            campus: self.campus,
            pos_type: self.pos_type,
            created_at: None,
            updated_at: None,
        }
    }
}

pub const REVIEW_MAX_LEN: usize = 16386;

/// Boundary validation for review text. The review service itself assumes
/// pre-validated text.
pub fn validate_review_text(text: &str) -> Result<(), String> {
    let len = text.chars().count();
    if len < 1 || len > REVIEW_MAX_LEN {
        return Err(format!(
            "review must be between 1 and {REVIEW_MAX_LEN} characters long"
        ));
    }
    if !text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("review can only contain word characters: [a-zA-Z_0-9]+".to_string());
    }
    Ok(())
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_text_accepts_word_characters() {
        assert!(validate_review_text("Great_coffee_10").is_ok());
        assert!(validate_review_text("a").is_ok());
    }

    #[test]
    fn review_text_rejects_empty_and_oversized() {
        assert!(validate_review_text("").is_err());
        let oversized = "a".repeat(REVIEW_MAX_LEN + 1);
        assert!(validate_review_text(&oversized).is_err());
        let max = "a".repeat(REVIEW_MAX_LEN);
        assert!(validate_review_text(&max).is_ok());
    }

    #[test]
    fn review_text_rejects_non_word_characters() {
        assert!(validate_review_text("nice coffee").is_err());
        assert!(validate_review_text("coffee!").is_err());
    }
}
