use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use super::dto::OrganizationDto;
use super::models::{CreateOrganizationRequest, UpdateOrganizationRequest};
use crate::api::error::ApiError;
use crate::db::models::OrganizationRow;
use crate::db::organization_repository::{NewOrganization, OrganizationRepository};

/// Organization service containing business logic
pub struct OrganizationService {
    pool: Pool<Postgres>,
}

impl OrganizationService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn owned(
        &self,
        user_id: Uuid,
        id: Uuid,
        denied: &'static str,
    ) -> Result<OrganizationRow, ApiError> {
        let organization = OrganizationRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound {
                what: "Organization",
                id,
            })?;

        if organization.user_id != user_id {
            return Err(ApiError::NotAuthorized(denied));
        }
        Ok(organization)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<OrganizationDto>, ApiError> {
        let rows = OrganizationRepository::list_for_user(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(OrganizationDto::from).collect())
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<OrganizationDto, ApiError> {
        let organization = self
            .owned(user_id, id, "User not authorized to access this organization")
            .await?;
        Ok(organization.into())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        req: &CreateOrganizationRequest,
    ) -> Result<OrganizationDto, ApiError> {
        info!("Service: creating organization name={}", req.name);

        let contact = req.contact.clone().unwrap_or_default();
        let new_organization = NewOrganization {
            name: req.name.clone(),
            description: req.description.clone(),
            contact_name: contact.name,
            contact_email: contact.email,
            contact_phone: contact.phone,
        };

        let row = OrganizationRepository::create(&self.pool, user_id, &new_organization).await?;
        Ok(row.into())
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateOrganizationRequest,
    ) -> Result<OrganizationDto, ApiError> {
        let mut organization = self
            .owned(user_id, id, "User not authorized to update this organization")
            .await?;

        if let Some(name) = &req.name {
            organization.name = name.clone();
        }
        if let Some(description) = &req.description {
            organization.description = Some(description.clone());
        }
        if let Some(contact) = &req.contact {
            organization.contact_name = contact.name.clone();
            organization.contact_email = contact.email.clone();
            organization.contact_phone = contact.phone.clone();
        }

        // Touch the timestamp explicitly at the write boundary.
        organization.updated_at = Utc::now();
        let row = OrganizationRepository::update(&self.pool, &organization).await?;

        info!("Service: organization updated id={}", id);
        Ok(row.into())
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        self.owned(user_id, id, "User not authorized to delete this organization")
            .await?;

        OrganizationRepository::delete(&self.pool, id).await?;
        info!("Service: organization deleted id={}", id);
        Ok(())
    }
}
