use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::{LocationRow, Photo};

const LOCATION_COLUMNS: &str = "id, user_id, name, address, longitude, latitude, notes, \
     photos, created_at, updated_at";

/// Values for a new location record.
#[derive(Debug)]
pub struct NewLocation {
    pub name: String,
    pub address: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub notes: Option<String>,
}

/// Repository for Location database operations
pub struct LocationRepository;

impl LocationRepository {
    pub async fn create(
        pool: &Pool<Postgres>,
        user_id: Uuid,
        location: &NewLocation,
    ) -> Result<LocationRow, sqlx::Error> {
        debug!("Creating location: name={}", location.name);

        let sql = format!(
            "INSERT INTO locations (id, user_id, name, address, longitude, latitude, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {LOCATION_COLUMNS}"
        );

        sqlx::query_as::<_, LocationRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&location.name)
            .bind(&location.address)
            .bind(location.longitude)
            .bind(location.latitude)
            .bind(&location.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &Pool<Postgres>,
        id: Uuid,
    ) -> Result<Option<LocationRow>, sqlx::Error> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1");

        sqlx::query_as::<_, LocationRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &Pool<Postgres>,
        user_id: Uuid,
    ) -> Result<Vec<LocationRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM locations \
             WHERE user_id = $1 ORDER BY created_at, id"
        );

        sqlx::query_as::<_, LocationRow>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Full-row update; the caller merges changes and touches `updated_at`.
    pub async fn update(
        pool: &Pool<Postgres>,
        row: &LocationRow,
    ) -> Result<LocationRow, sqlx::Error> {
        let sql = format!(
            "UPDATE locations SET \
             name = $2, address = $3, longitude = $4, latitude = $5, notes = $6, \
             photos = $7, updated_at = $8 \
             WHERE id = $1 \
             RETURNING {LOCATION_COLUMNS}"
        );

        sqlx::query_as::<_, LocationRow>(&sql)
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.address)
            .bind(row.longitude)
            .bind(row.latitude)
            .bind(&row.notes)
            .bind(Json(&row.photos.0))
            .bind(row.updated_at)
            .fetch_one(pool)
            .await
    }

    /// Replace a location's photo set.
    pub async fn update_photos(
        pool: &Pool<Postgres>,
        id: Uuid,
        photos: &[Photo],
        updated_at: DateTime<Utc>,
    ) -> Result<LocationRow, sqlx::Error> {
        let sql = format!(
            "UPDATE locations SET photos = $2, updated_at = $3 \
             WHERE id = $1 \
             RETURNING {LOCATION_COLUMNS}"
        );

        sqlx::query_as::<_, LocationRow>(&sql)
            .bind(id)
            .bind(Json(photos))
            .bind(updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count(pool: &Pool<Postgres>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM locations")
            .fetch_one(pool)
            .await
    }
}
