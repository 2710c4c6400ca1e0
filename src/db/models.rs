use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Photo attached to a location or a job, stored as a jsonb array element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub notes: Option<String>,
    pub photos: Json<Vec<Photo>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full job record. `date` is nullable: rows without a usable date still
/// count toward totals but are skipped by day- and month-bucketing.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i32,
    pub tags: Vec<String>,
    pub location_id: Uuid,
    pub organization_id: Uuid,
    pub photos: Json<Vec<Photo>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job record with its referenced location and organization names attached.
/// LEFT JOIN: orphaned references come back as None.
#[derive(Debug, Clone, FromRow)]
pub struct JobWithRefs {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i32,
    pub tags: Vec<String>,
    pub location_id: Uuid,
    pub organization_id: Uuid,
    pub photos: Json<Vec<Photo>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub organization_name: Option<String>,
}

/// Slim projection consumed by the statistics aggregator.
#[derive(Debug, Clone, FromRow)]
pub struct JobStatRow {
    pub id: Uuid,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub duration: i32,
    pub location_id: Uuid,
    pub location_name: Option<String>,
    pub tags: Vec<String>,
}

/// Job whose referenced location no longer exists.
#[derive(Debug, Clone, FromRow)]
pub struct OrphanedJobRow {
    pub id: Uuid,
    pub title: String,
    pub location_id: Uuid,
}
