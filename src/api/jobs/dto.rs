use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::models::{JobWithRefs, Photo};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLocationRef {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrganizationRef {
    pub id: Uuid,
    pub name: String,
}

/// Job on the wire, with referenced location/organization attached when
/// they still exist (an orphaned reference serializes as null).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i32,
    pub tags: Vec<String>,
    pub location: Option<JobLocationRef>,
    pub organization: Option<JobOrganizationRef>,
    pub photos: Vec<Photo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobWithRefs> for JobDto {
    fn from(row: JobWithRefs) -> Self {
        let location = row.location_name.map(|name| JobLocationRef {
            id: row.location_id,
            name,
            address: row.location_address,
        });
        let organization = row.organization_name.map(|name| JobOrganizationRef {
            id: row.organization_id,
            name,
        });

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            notes: row.notes,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            duration: row.duration,
            tags: row.tags,
            location,
            organization,
            photos: row.photos.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
