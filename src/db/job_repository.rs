use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::{JobRow, JobStatRow, JobWithRefs, OrphanedJobRow, Photo};

const JOB_COLUMNS: &str = "id, user_id, title, description, notes, date, start_time, \
     end_time, duration, tags, location_id, organization_id, photos, created_at, updated_at";

const JOB_WITH_REFS_SELECT: &str = "SELECT j.id, j.user_id, j.title, j.description, j.notes, \
     j.date, j.start_time, j.end_time, j.duration, j.tags, j.location_id, j.organization_id, \
     j.photos, j.created_at, j.updated_at, \
     l.name AS location_name, l.address AS location_address, o.name AS organization_name \
     FROM jobs j \
     LEFT JOIN locations l ON l.id = j.location_id \
     LEFT JOIN organizations o ON o.id = j.organization_id";

/// Values for a new job record. Duration has already been derived from the
/// time range by the service layer.
#[derive(Debug)]
pub struct NewJob {
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
    pub photos: Vec<Photo>,
}

/// Filter for the export query. Bounds are UTC instants; `end_exclusive`
/// already covers the whole final day. Tags match any-overlap.
#[derive(Debug, Default)]
pub struct ExportFilter {
    pub start: Option<DateTime<Utc>>,
    pub end_exclusive: Option<DateTime<Utc>>,
    pub location_id: Option<Uuid>,
    pub tags: Vec<String>,
}

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// Create a new job and return the full record.
    pub async fn create(
        pool: &Pool<Postgres>,
        user_id: Uuid,
        job: &NewJob,
    ) -> Result<JobRow, sqlx::Error> {
        debug!("Creating job: title={}", job.title);

        let sql = format!(
            "INSERT INTO jobs \
             (id, user_id, title, description, notes, date, start_time, end_time, \
              duration, tags, location_id, organization_id, photos) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {JOB_COLUMNS}"
        );

        sqlx::query_as::<_, JobRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&job.notes)
            .bind(job.date)
            .bind(job.start_time)
            .bind(job.end_time)
            .bind(job.duration)
            .bind(&job.tags)
            .bind(job.location_id)
            .bind(job.organization_id)
            .bind(Json(&job.photos))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &Pool<Postgres>,
        id: Uuid,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");

        sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_refs(
        pool: &Pool<Postgres>,
        id: Uuid,
    ) -> Result<Option<JobWithRefs>, sqlx::Error> {
        let sql = format!("{JOB_WITH_REFS_SELECT} WHERE j.id = $1");

        sqlx::query_as::<_, JobWithRefs>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All of a user's jobs, most recent date first.
    pub async fn list_for_user(
        pool: &Pool<Postgres>,
        user_id: Uuid,
    ) -> Result<Vec<JobWithRefs>, sqlx::Error> {
        let sql = format!(
            "{JOB_WITH_REFS_SELECT} WHERE j.user_id = $1 \
             ORDER BY j.date DESC NULLS LAST, j.id"
        );

        sqlx::query_as::<_, JobWithRefs>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_location(
        pool: &Pool<Postgres>,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<Vec<JobWithRefs>, sqlx::Error> {
        let sql = format!(
            "{JOB_WITH_REFS_SELECT} WHERE j.user_id = $1 AND j.location_id = $2 \
             ORDER BY j.date DESC NULLS LAST, j.id"
        );

        sqlx::query_as::<_, JobWithRefs>(&sql)
            .bind(user_id)
            .bind(location_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_organization(
        pool: &Pool<Postgres>,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<JobWithRefs>, sqlx::Error> {
        let sql = format!(
            "{JOB_WITH_REFS_SELECT} WHERE j.user_id = $1 AND j.organization_id = $2 \
             ORDER BY j.date DESC NULLS LAST, j.id"
        );

        sqlx::query_as::<_, JobWithRefs>(&sql)
            .bind(user_id)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Full-row update; the caller merges changes and touches `updated_at`.
    pub async fn update(pool: &Pool<Postgres>, row: &JobRow) -> Result<JobRow, sqlx::Error> {
        debug!("Updating job: id={}", row.id);

        let sql = format!(
            "UPDATE jobs SET \
             title = $2, description = $3, notes = $4, date = $5, start_time = $6, \
             end_time = $7, duration = $8, tags = $9, location_id = $10, \
             organization_id = $11, photos = $12, updated_at = $13 \
             WHERE id = $1 \
             RETURNING {JOB_COLUMNS}"
        );

        sqlx::query_as::<_, JobRow>(&sql)
            .bind(row.id)
            .bind(&row.title)
            .bind(&row.description)
            .bind(&row.notes)
            .bind(row.date)
            .bind(row.start_time)
            .bind(row.end_time)
            .bind(row.duration)
            .bind(&row.tags)
            .bind(row.location_id)
            .bind(row.organization_id)
            .bind(Json(&row.photos.0))
            .bind(row.updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Snapshot of a user's jobs for the statistics aggregator.
    pub async fn stat_rows(
        pool: &Pool<Postgres>,
        user_id: Uuid,
    ) -> Result<Vec<JobStatRow>, sqlx::Error> {
        let sql = "SELECT j.id, j.title, j.date, j.duration, j.location_id, \
             l.name AS location_name, j.tags \
             FROM jobs j \
             LEFT JOIN locations l ON l.id = j.location_id \
             WHERE j.user_id = $1 \
             ORDER BY j.created_at, j.id";

        sqlx::query_as::<_, JobStatRow>(sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Filtered export query, built dynamically from the optional bounds.
    pub async fn export_rows(
        pool: &Pool<Postgres>,
        user_id: Uuid,
        filter: &ExportFilter,
    ) -> Result<Vec<JobWithRefs>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(JOB_WITH_REFS_SELECT);
        qb.push(" WHERE j.user_id = ");
        qb.push_bind(user_id);

        if let Some(start) = filter.start {
            qb.push(" AND j.date >= ");
            qb.push_bind(start);
        }
        if let Some(end) = filter.end_exclusive {
            qb.push(" AND j.date < ");
            qb.push_bind(end);
        }
        if let Some(location_id) = filter.location_id {
            qb.push(" AND j.location_id = ");
            qb.push_bind(location_id);
        }
        if !filter.tags.is_empty() {
            qb.push(" AND j.tags && ");
            qb.push_bind(&filter.tags);
        }

        qb.push(" ORDER BY j.date DESC NULLS LAST, j.id");

        qb.build_query_as::<JobWithRefs>().fetch_all(pool).await
    }

    /// Jobs whose location no longer exists.
    pub async fn find_orphaned(pool: &Pool<Postgres>) -> Result<Vec<OrphanedJobRow>, sqlx::Error> {
        let sql = "SELECT j.id, j.title, j.location_id FROM jobs j \
             WHERE NOT EXISTS (SELECT 1 FROM locations l WHERE l.id = j.location_id) \
             ORDER BY j.id";

        sqlx::query_as::<_, OrphanedJobRow>(sql).fetch_all(pool).await
    }

    pub async fn delete_by_ids(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM jobs WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn reassign_location(
        pool: &Pool<Postgres>,
        ids: &[Uuid],
        location_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "UPDATE jobs SET location_id = $1, updated_at = $2 WHERE id = ANY($3)",
        )
        .bind(location_id)
        .bind(updated_at)
        .bind(ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn count(pool: &Pool<Postgres>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(pool)
            .await
    }

    /// Most recently recorded jobs, for the check-db report.
    pub async fn latest_titles(
        pool: &Pool<Postgres>,
        limit: i64,
    ) -> Result<Vec<(String, Option<DateTime<Utc>>)>, sqlx::Error> {
        sqlx::query_as::<_, (String, Option<DateTime<Utc>>)>(
            "SELECT title, date FROM jobs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
