use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::UserRow;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// Repository for user account database operations
pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &Pool<Postgres>,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRow, sqlx::Error> {
        debug!("Creating user: email={}", email);

        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &Pool<Postgres>,
        id: Uuid,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &Pool<Postgres>,
        email: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Persist profile fields. `updated_at` is passed in explicitly by the
    /// caller at the write boundary.
    pub async fn update_profile(
        pool: &Pool<Postgres>,
        id: Uuid,
        name: &str,
        email: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<UserRow, sqlx::Error> {
        let sql = format!(
            "UPDATE users SET name = $2, email = $3, updated_at = $4 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn count(pool: &Pool<Postgres>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
