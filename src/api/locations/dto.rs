use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::models::GeoPoint;
use crate::db::models::{LocationRow, Photo};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub coordinates: GeoPoint,
    pub notes: Option<String>,
    pub photos: Vec<Photo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationRow> for LocationDto {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            coordinates: GeoPoint::new(row.longitude, row.latitude),
            notes: row.notes,
            photos: row.photos.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
