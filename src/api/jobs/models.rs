use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::models::Photo;

/// Photo supplied inline on a job payload; gets an id assigned on create.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoInput {
    pub url: String,
    pub caption: Option<String>,
    pub taken_at: Option<DateTime<Utc>>,
}

impl From<PhotoInput> for Photo {
    fn from(input: PhotoInput) -> Self {
        Photo {
            id: Uuid::new_v4(),
            url: input.url,
            caption: input.caption,
            taken_at: input.taken_at,
        }
    }
}

/// Payload for job creation. Instants arrive as local wall-clock readings
/// and are shifted to UTC before storage; duration is always re-derived
/// from the time range, a client-supplied value is ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200, message = "Please add a job title"))]
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub location: Uuid,
    pub organization: Uuid,
    #[serde(default)]
    pub photos: Vec<PhotoInput>,
}

/// Partial update. Touching either end of the time range re-derives the
/// duration; a bare duration is accepted only when neither end changes.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, max = 200, message = "Please add a job title"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub location: Option<Uuid>,
    pub organization: Option<Uuid>,
    pub photos: Option<Vec<PhotoInput>>,
}

/// Query parameters for the CSV export.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location_id: Option<Uuid>,
    /// Comma-separated list; a job matches when it carries any of them.
    pub tags: Option<String>,
}
