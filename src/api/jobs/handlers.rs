use actix_web::http::header;
use actix_web::web::{self, Data, Path, Query, ServiceConfig};
use actix_web::{delete, get, post, put, HttpResponse};
use actix_web_validator::Json;
use uuid::Uuid;

use super::models::{CreateJobRequest, ExportQuery, UpdateJobRequest};
use super::service::JobService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::response::ApiResponse;

#[get("/statistics")]
async fn job_statistics(
    service: Data<JobService>,
    auth: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let stats = service.statistics(auth.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

#[get("/export")]
async fn export_jobs(
    service: Data<JobService>,
    auth: AuthUser,
    query: Query<ExportQuery>,
) -> Result<HttpResponse, ApiError> {
    let (csv, _count) = service.export(auth.id, &query).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=job-tracker-export.csv",
        ))
        .body(csv))
}

#[get("/location/{location_id}")]
async fn jobs_by_location(
    service: Data<JobService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let jobs = service.list_by_location(auth.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(jobs.len(), jobs)))
}

#[get("/organization/{organization_id}")]
async fn jobs_by_organization(
    service: Data<JobService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let jobs = service
        .list_by_organization(auth.id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(jobs.len(), jobs)))
}

#[get("")]
async fn list_jobs(service: Data<JobService>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    let jobs = service.list(auth.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(jobs.len(), jobs)))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    auth: AuthUser,
    body: Json<CreateJobRequest>,
) -> Result<HttpResponse, ApiError> {
    let job = service.create(auth.id, &body).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(job)))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let job = service.get(auth.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(job)))
}

#[put("/{id}")]
async fn update_job(
    service: Data<JobService>,
    auth: AuthUser,
    path: Path<Uuid>,
    body: Json<UpdateJobRequest>,
) -> Result<HttpResponse, ApiError> {
    let job = service.update(auth.id, path.into_inner(), &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(job)))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.delete(auth.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}

pub fn job_config(config: &mut ServiceConfig) {
    // Fixed routes are registered ahead of the /{id} matchers.
    config.service(
        web::scope("jobs")
            .service(job_statistics)
            .service(export_jobs)
            .service(jobs_by_location)
            .service(jobs_by_organization)
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
