use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::db::models::OrganizationRow;

const ORGANIZATION_COLUMNS: &str = "id, user_id, name, description, contact_name, \
     contact_email, contact_phone, created_at, updated_at";

/// Values for a new organization record.
#[derive(Debug)]
pub struct NewOrganization {
    pub name: String,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Repository for Organization database operations
pub struct OrganizationRepository;

impl OrganizationRepository {
    pub async fn create(
        pool: &Pool<Postgres>,
        user_id: Uuid,
        org: &NewOrganization,
    ) -> Result<OrganizationRow, sqlx::Error> {
        debug!("Creating organization: name={}", org.name);

        let sql = format!(
            "INSERT INTO organizations \
             (id, user_id, name, description, contact_name, contact_email, contact_phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ORGANIZATION_COLUMNS}"
        );

        sqlx::query_as::<_, OrganizationRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&org.name)
            .bind(&org.description)
            .bind(&org.contact_name)
            .bind(&org.contact_email)
            .bind(&org.contact_phone)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &Pool<Postgres>,
        id: Uuid,
    ) -> Result<Option<OrganizationRow>, sqlx::Error> {
        let sql = format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1");

        sqlx::query_as::<_, OrganizationRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &Pool<Postgres>,
        user_id: Uuid,
    ) -> Result<Vec<OrganizationRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations \
             WHERE user_id = $1 ORDER BY created_at, id"
        );

        sqlx::query_as::<_, OrganizationRow>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Full-row update; the caller merges changes and touches `updated_at`.
    pub async fn update(
        pool: &Pool<Postgres>,
        row: &OrganizationRow,
    ) -> Result<OrganizationRow, sqlx::Error> {
        let sql = format!(
            "UPDATE organizations SET \
             name = $2, description = $3, contact_name = $4, contact_email = $5, \
             contact_phone = $6, updated_at = $7 \
             WHERE id = $1 \
             RETURNING {ORGANIZATION_COLUMNS}"
        );

        sqlx::query_as::<_, OrganizationRow>(&sql)
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.description)
            .bind(&row.contact_name)
            .bind(&row.contact_email)
            .bind(&row.contact_phone)
            .bind(row.updated_at)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count(pool: &Pool<Postgres>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM organizations")
            .fetch_one(pool)
            .await
    }
}
