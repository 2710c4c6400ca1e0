use actix_web::web::{self, Data, Path, ServiceConfig};
use actix_web::{delete, get, post, put, HttpResponse};
use actix_web_validator::Json;
use uuid::Uuid;

use super::models::{CreateOrganizationRequest, UpdateOrganizationRequest};
use super::service::OrganizationService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::response::ApiResponse;

#[get("")]
async fn list_organizations(
    service: Data<OrganizationService>,
    auth: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let organizations = service.list(auth.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(organizations.len(), organizations)))
}

#[post("")]
async fn create_organization(
    service: Data<OrganizationService>,
    auth: AuthUser,
    body: Json<CreateOrganizationRequest>,
) -> Result<HttpResponse, ApiError> {
    let organization = service.create(auth.id, &body).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(organization)))
}

#[get("/{id}")]
async fn get_organization(
    service: Data<OrganizationService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let organization = service.get(auth.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(organization)))
}

#[put("/{id}")]
async fn update_organization(
    service: Data<OrganizationService>,
    auth: AuthUser,
    path: Path<Uuid>,
    body: Json<UpdateOrganizationRequest>,
) -> Result<HttpResponse, ApiError> {
    let organization = service.update(auth.id, path.into_inner(), &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(organization)))
}

#[delete("/{id}")]
async fn delete_organization(
    service: Data<OrganizationService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.delete(auth.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}

pub fn organization_config(config: &mut ServiceConfig) {
    config.service(
        web::scope("organizations")
            .service(list_organizations)
            .service(create_organization)
            .service(get_organization)
            .service(update_organization)
            .service(delete_organization),
    );
}
