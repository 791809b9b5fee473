//! Postgres implementations of the store ports.
//!
//! The schema is created with `CREATE TABLE IF NOT EXISTS` at startup; row
//! timestamps are owned by the database (`DEFAULT now()` on insert, explicit
//! `now()` on update). Isolation between concurrent writers is provided by
//! the database, not by this module.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use async_trait::async_trait;

use crate::domain::model::{Campus, Pos, PosType, Review, User};
use crate::domain::ports::{PosStore, ReviewStore, StorageError, UserStore};

pub async fn connect(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn init_schema(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            login_name TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS pos (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            campus TEXT NOT NULL,
            pos_type TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS reviews (
            id BIGSERIAL PRIMARY KEY,
            review TEXT NOT NULL,
            author_id BIGINT NOT NULL REFERENCES users(id),
            pos_id BIGINT NOT NULL REFERENCES pos(id),
            approval_count INTEGER NOT NULL DEFAULT 0,
            approved BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: Some(row.try_get("id")?),
        login_name: row.try_get("login_name")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        created_at: Some(row.try_get::<DateTime<Utc>, _>("created_at")?),
        updated_at: Some(row.try_get::<DateTime<Utc>, _>("updated_at")?),
    })
}

fn pos_from_row(row: &PgRow) -> Result<Pos, sqlx::Error> {
    let campus: String = row.try_get("campus")?;
    let pos_type: String = row.try_get("pos_type")?;
    Ok(Pos {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        campus: Campus::from_str(&campus).map_err(|e| sqlx::Error::Decode(e.into()))?,
        pos_type: PosType::from_str(&pos_type).map_err(|e| sqlx::Error::Decode(e.into()))?,
        created_at: Some(row.try_get::<DateTime<Utc>, _>("created_at")?),
        updated_at: Some(row.try_get::<DateTime<Utc>, _>("updated_at")?),
    })
}

fn review_from_row(row: &PgRow) -> Result<Review, sqlx::Error> {
    let approval_count: i32 = row.try_get("approval_count")?;
    Ok(Review {
        id: Some(row.try_get("id")?),
        text: row.try_get("review")?,
        author_id: row.try_get("author_id")?,
        pos_id: row.try_get("pos_id")?,
        approval_count: approval_count.max(0) as u32,
        approved: row.try_get("approved")?,
        created_at: Some(row.try_get::<DateTime<Utc>, _>("created_at")?),
        updated_at: Some(row.try_get::<DateTime<Utc>, _>("updated_at")?),
    })
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn upsert(&self, user: User) -> Result<User, StorageError> {
        let row = match user.id {
            Some(id) => {
                let updated = sqlx::query(
                    "UPDATE users
                     SET login_name = $2, email = $3, first_name = $4, last_name = $5,
                         updated_at = now()
                     WHERE id = $1
                     RETURNING *",
                )
                .bind(id)
                .bind(&user.login_name)
                .bind(&user.email)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .fetch_optional(&self.pool)
                .await?;
                match updated {
                    Some(row) => row,
                    None => {
                        sqlx::query(
                            "INSERT INTO users (id, login_name, email, first_name, last_name)
                             VALUES ($1, $2, $3, $4, $5)
                             RETURNING *",
                        )
                        .bind(id)
                        .bind(&user.login_name)
                        .bind(&user.email)
                        .bind(&user.first_name)
                        .bind(&user.last_name)
                        .fetch_one(&self.pool)
                        .await?
                    }
                }
            }
            None => {
                sqlx::query(
                    "INSERT INTO users (login_name, email, first_name, last_name)
                     VALUES ($1, $2, $3, $4)
                     RETURNING *",
                )
                .bind(&user.login_name)
                .bind(&user.email)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(user_from_row(&row)?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| user_from_row(row).map_err(Into::into))
            .collect()
    }

    async fn delete(&self, id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

pub struct PgPosStore {
    pool: PgPool,
}

impl PgPosStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PosStore for PgPosStore {
    async fn upsert(&self, pos: Pos) -> Result<Pos, StorageError> {
        let row = match pos.id {
            Some(id) => {
                let updated = sqlx::query(
                    "UPDATE pos
                     SET name = $2, description = $3, campus = $4, pos_type = $5,
                         updated_at = now()
                     WHERE id = $1
                     RETURNING *",
                )
                .bind(id)
                .bind(&pos.name)
                .bind(&pos.description)
                .bind(pos.campus.to_string())
                .bind(pos.pos_type.to_string())
                .fetch_optional(&self.pool)
                .await?;
                match updated {
                    Some(row) => row,
                    None => {
                        sqlx::query(
                            "INSERT INTO pos (id, name, description, campus, pos_type)
                             VALUES ($1, $2, $3, $4, $5)
                             RETURNING *",
                        )
                        .bind(id)
                        .bind(&pos.name)
                        .bind(&pos.description)
                        .bind(pos.campus.to_string())
                        .bind(pos.pos_type.to_string())
                        .fetch_one(&self.pool)
                        .await?
                    }
                }
            }
            None => {
                sqlx::query(
                    "INSERT INTO pos (name, description, campus, pos_type)
                     VALUES ($1, $2, $3, $4)
                     RETURNING *",
                )
                .bind(&pos.name)
                .bind(&pos.description)
                .bind(pos.campus.to_string())
                .bind(pos.pos_type.to_string())
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(pos_from_row(&row)?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Pos>, StorageError> {
        let row = sqlx::query("SELECT * FROM pos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(pos_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Pos>, StorageError> {
        let rows = sqlx::query("SELECT * FROM pos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| pos_from_row(row).map_err(Into::into))
            .collect()
    }

    async fn delete(&self, id: i64) -> Result<Option<Pos>, StorageError> {
        let row = sqlx::query("DELETE FROM pos WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(pos_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn upsert(&self, review: Review) -> Result<Review, StorageError> {
        let row = match review.id {
            Some(id) => {
                let updated = sqlx::query(
                    "UPDATE reviews
                     SET review = $2, author_id = $3, pos_id = $4,
                         approval_count = $5, approved = $6, updated_at = now()
                     WHERE id = $1
                     RETURNING *",
                )
                .bind(id)
                .bind(&review.text)
                .bind(review.author_id)
                .bind(review.pos_id)
                .bind(review.approval_count as i32)
                .bind(review.approved)
                .fetch_optional(&self.pool)
                .await?;
                match updated {
                    Some(row) => row,
                    None => {
                        sqlx::query(
                            "INSERT INTO reviews (id, review, author_id, pos_id, approval_count, approved)
                             VALUES ($1, $2, $3, $4, $5, $6)
                             RETURNING *",
                        )
                        .bind(id)
                        .bind(&review.text)
                        .bind(review.author_id)
                        .bind(review.pos_id)
                        .bind(review.approval_count as i32)
                        .bind(review.approved)
                        .fetch_one(&self.pool)
                        .await?
                    }
                }
            }
            None => {
                sqlx::query(
                    "INSERT INTO reviews (review, author_id, pos_id, approval_count, approved)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING *",
                )
                .bind(&review.text)
                .bind(review.author_id)
                .bind(review.pos_id)
                .bind(review.approval_count as i32)
                .bind(review.approved)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(review_from_row(&row)?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Review>, StorageError> {
        let row = sqlx::query("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(review_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Review>, StorageError> {
        let rows = sqlx::query("SELECT * FROM reviews ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| review_from_row(row).map_err(Into::into))
            .collect()
    }

    async fn delete(&self, id: i64) -> Result<Option<Review>, StorageError> {
        let row = sqlx::query("DELETE FROM reviews WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(review_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn filter_by_approval(
        &self,
        pos_id: i64,
        approved: bool,
    ) -> Result<Vec<Review>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM reviews WHERE pos_id = $1 AND approved = $2 ORDER BY id",
        )
        .bind(pos_id)
        .bind(approved)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| review_from_row(row).map_err(Into::into))
            .collect()
    }

    async fn filter_by_author(
        &self,
        pos_id: i64,
        author_id: i64,
    ) -> Result<Vec<Review>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM reviews WHERE pos_id = $1 AND author_id = $2 ORDER BY id",
        )
        .bind(pos_id)
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| review_from_row(row).map_err(Into::into))
            .collect()
    }

    async fn get_by_author(&self, author_id: i64) -> Result<Option<Review>, StorageError> {
        let row = sqlx::query(
            "SELECT * FROM reviews WHERE author_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(Some(review_from_row(&row)?)),
            None => Ok(None),
        }
    }
}
