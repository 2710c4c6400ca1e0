use chrono::{DateTime, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use super::dto::JobDto;
use super::export::build_csv;
use super::localtime::wall_clock_to_utc;
use super::models::{CreateJobRequest, ExportQuery, UpdateJobRequest};
use super::stats::{summarize, JobStatistics};
use crate::api::error::ApiError;
use crate::db::job_repository::{ExportFilter, JobRepository, NewJob};
use crate::db::location_repository::LocationRepository;
use crate::db::models::Photo;
use crate::db::organization_repository::OrganizationRepository;

/// Minutes between two instants, rounded to the nearest whole minute.
/// The stored duration is always derived this way when both ends of the
/// range are known; a client-supplied value is never trusted over it.
pub fn derive_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    ((end - start).num_milliseconds() as f64 / 60_000.0).round() as i32
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Job service containing business logic
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn check_owned_location(
        &self,
        user_id: Uuid,
        id: Uuid,
        denied: &'static str,
    ) -> Result<(), ApiError> {
        let location = LocationRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound {
                what: "Location",
                id,
            })?;

        if location.user_id != user_id {
            return Err(ApiError::NotAuthorized(denied));
        }
        Ok(())
    }

    async fn check_owned_organization(
        &self,
        user_id: Uuid,
        id: Uuid,
        denied: &'static str,
    ) -> Result<(), ApiError> {
        let organization = OrganizationRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound {
                what: "Organization",
                id,
            })?;

        if organization.user_id != user_id {
            return Err(ApiError::NotAuthorized(denied));
        }
        Ok(())
    }

    async fn populated(&self, id: Uuid) -> Result<JobDto, ApiError> {
        JobRepository::find_with_refs(&self.pool, id)
            .await?
            .map(JobDto::from)
            .ok_or(ApiError::NotFound { what: "Job", id })
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<JobDto>, ApiError> {
        let rows = JobRepository::list_for_user(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(JobDto::from).collect())
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<JobDto, ApiError> {
        let job = JobRepository::find_with_refs(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound { what: "Job", id })?;

        if job.user_id != user_id {
            return Err(ApiError::NotAuthorized(
                "User not authorized to access this job",
            ));
        }
        Ok(job.into())
    }

    pub async fn create(&self, user_id: Uuid, req: &CreateJobRequest) -> Result<JobDto, ApiError> {
        info!("Service: creating job title={}", req.title);

        self.check_owned_location(user_id, req.location, "User not authorized to use this location")
            .await?;
        self.check_owned_organization(
            user_id,
            req.organization,
            "User not authorized to use this organization",
        )
        .await?;

        // Client instants are local wall-clock readings; shift before storage.
        let start_time = wall_clock_to_utc(req.start_time);
        let end_time = wall_clock_to_utc(req.end_time);

        let new_job = NewJob {
            title: req.title.clone(),
            description: req.description.clone(),
            notes: req.notes.clone(),
            date: Some(wall_clock_to_utc(req.date)),
            start_time,
            end_time,
            duration: derive_duration(start_time, end_time),
            tags: req.tags.clone(),
            location_id: req.location,
            organization_id: req.organization,
            photos: req.photos.iter().cloned().map(Photo::from).collect(),
        };

        let row = JobRepository::create(&self.pool, user_id, &new_job).await?;
        info!("Service: job created id={}", row.id);

        self.populated(row.id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateJobRequest,
    ) -> Result<JobDto, ApiError> {
        let mut job = JobRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound { what: "Job", id })?;

        if job.user_id != user_id {
            return Err(ApiError::NotAuthorized(
                "User not authorized to update this job",
            ));
        }

        if let Some(location) = req.location {
            if location != job.location_id {
                self.check_owned_location(
                    user_id,
                    location,
                    "User not authorized to use this location",
                )
                .await?;
            }
            job.location_id = location;
        }
        if let Some(organization) = req.organization {
            if organization != job.organization_id {
                self.check_owned_organization(
                    user_id,
                    organization,
                    "User not authorized to use this organization",
                )
                .await?;
            }
            job.organization_id = organization;
        }

        if let Some(date) = req.date {
            job.date = Some(wall_clock_to_utc(date));
        }

        let mut times_touched = false;
        if let Some(start) = req.start_time {
            job.start_time = wall_clock_to_utc(start);
            times_touched = true;
        }
        if let Some(end) = req.end_time {
            job.end_time = wall_clock_to_utc(end);
            times_touched = true;
        }
        if times_touched {
            job.duration = derive_duration(job.start_time, job.end_time);
        } else if let Some(duration) = req.duration {
            job.duration = duration;
        }

        if let Some(title) = &req.title {
            job.title = title.clone();
        }
        if let Some(description) = &req.description {
            job.description = Some(description.clone());
        }
        if let Some(notes) = &req.notes {
            job.notes = Some(notes.clone());
        }
        if let Some(tags) = &req.tags {
            job.tags = tags.clone();
        }
        if let Some(photos) = &req.photos {
            job.photos = Json(photos.iter().cloned().map(Photo::from).collect());
        }

        // Touch the timestamp explicitly at the write boundary.
        job.updated_at = Utc::now();
        JobRepository::update(&self.pool, &job).await?;

        info!("Service: job updated id={}", id);
        self.populated(id).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let job = JobRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound { what: "Job", id })?;

        if job.user_id != user_id {
            return Err(ApiError::NotAuthorized(
                "User not authorized to delete this job",
            ));
        }

        JobRepository::delete(&self.pool, id).await?;
        info!("Service: job deleted id={}", id);
        Ok(())
    }

    pub async fn list_by_location(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<Vec<JobDto>, ApiError> {
        self.check_owned_location(
            user_id,
            location_id,
            "User not authorized to access this location",
        )
        .await?;

        let rows = JobRepository::list_for_location(&self.pool, user_id, location_id).await?;
        Ok(rows.into_iter().map(JobDto::from).collect())
    }

    pub async fn list_by_organization(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<JobDto>, ApiError> {
        self.check_owned_organization(
            user_id,
            organization_id,
            "User not authorized to access this organization",
        )
        .await?;

        let rows =
            JobRepository::list_for_organization(&self.pool, user_id, organization_id).await?;
        Ok(rows.into_iter().map(JobDto::from).collect())
    }

    /// Dashboard summary over the caller's complete job collection.
    pub async fn statistics(&self, user_id: Uuid) -> Result<JobStatistics, ApiError> {
        let rows = JobRepository::stat_rows(&self.pool, user_id).await?;
        let stats = summarize(&rows);

        info!(
            "Service: statistics computed, jobs={} locations={} tags={}",
            stats.total_jobs,
            stats.hours_by_location.len(),
            stats.hours_by_tag.len()
        );
        Ok(stats)
    }

    /// Filtered CSV export. Returns the document and the number of jobs in it.
    pub async fn export(
        &self,
        user_id: Uuid,
        query: &ExportQuery,
    ) -> Result<(String, usize), ApiError> {
        let filter = ExportFilter {
            start: query
                .start_date
                .map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            // The end bound covers the whole final day.
            end_exclusive: query
                .end_date
                .map(|d| d.succ_opt().unwrap_or(d).and_time(NaiveTime::MIN).and_utc()),
            location_id: query.location_id,
            tags: query.tags.as_deref().map(split_tags).unwrap_or_default(),
        };

        let rows = JobRepository::export_rows(&self.pool, user_id, &filter).await?;
        if rows.is_empty() {
            return Err(ApiError::NoMatches("No jobs found matching the criteria"));
        }

        let count = rows.len();
        info!("Service: exporting {} jobs", count);
        Ok((build_csv(&rows), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn duration_is_whole_minutes_between_bounds() {
        let start = utc(2024, 1, 1, 9, 0, 0);
        let end = utc(2024, 1, 1, 17, 0, 0);

        assert_eq!(derive_duration(start, end), 480);
    }

    #[test]
    fn duration_rounds_to_nearest_minute() {
        let start = utc(2024, 1, 1, 9, 0, 0);

        assert_eq!(derive_duration(start, start + chrono::Duration::seconds(89)), 1);
        assert_eq!(derive_duration(start, start + chrono::Duration::seconds(91)), 2);
        assert_eq!(derive_duration(start, start), 0);
    }

    #[test]
    fn tag_filter_splits_and_trims() {
        assert_eq!(
            split_tags("cleanup, planting ,, weeding"),
            vec!["cleanup", "planting", "weeding"]
        );
        assert!(split_tags("  ").is_empty());
    }
}
