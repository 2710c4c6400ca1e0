use actix_multipart::form::MultipartForm;
use actix_web::web::{self, Data, Path, Query, ServiceConfig};
use actix_web::{delete, get, post, put, HttpResponse};
use actix_web_validator::Json;
use uuid::Uuid;

use super::models::{CreateLocationRequest, NearbyQuery, PhotoUploadForm, UpdateLocationRequest};
use super::service::LocationService;
use crate::api::auth::AuthUser;
use crate::api::error::ApiError;
use crate::api::response::ApiResponse;

#[get("/nearby")]
async fn nearby_locations(
    service: Data<LocationService>,
    auth: AuthUser,
    query: Query<NearbyQuery>,
) -> Result<HttpResponse, ApiError> {
    let locations = service.nearby(auth.id, &query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(locations.len(), locations)))
}

#[get("")]
async fn list_locations(
    service: Data<LocationService>,
    auth: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let locations = service.list(auth.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(locations.len(), locations)))
}

#[post("")]
async fn create_location(
    service: Data<LocationService>,
    auth: AuthUser,
    body: Json<CreateLocationRequest>,
) -> Result<HttpResponse, ApiError> {
    let location = service.create(auth.id, &body).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(location)))
}

#[get("/{id}")]
async fn get_location(
    service: Data<LocationService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let location = service.get(auth.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(location)))
}

#[put("/{id}")]
async fn update_location(
    service: Data<LocationService>,
    auth: AuthUser,
    path: Path<Uuid>,
    body: Json<UpdateLocationRequest>,
) -> Result<HttpResponse, ApiError> {
    let location = service.update(auth.id, path.into_inner(), &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(location)))
}

#[delete("/{id}")]
async fn delete_location(
    service: Data<LocationService>,
    auth: AuthUser,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.delete(auth.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}

#[post("/{id}/photos")]
async fn upload_location_photo(
    service: Data<LocationService>,
    auth: AuthUser,
    path: Path<Uuid>,
    form: MultipartForm<PhotoUploadForm>,
) -> Result<HttpResponse, ApiError> {
    let location = service
        .upload_photo(auth.id, path.into_inner(), form.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(location)))
}

#[delete("/{id}/photos/{photo_id}")]
async fn delete_location_photo(
    service: Data<LocationService>,
    auth: AuthUser,
    path: Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (id, photo_id) = path.into_inner();
    let location = service.delete_photo(auth.id, id, photo_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(location)))
}

pub fn location_config(config: &mut ServiceConfig) {
    // The /nearby route is registered ahead of the /{id} matchers.
    config.service(
        web::scope("locations")
            .service(nearby_locations)
            .service(list_locations)
            .service(create_location)
            .service(get_location)
            .service(update_location)
            .service(delete_location)
            .service(upload_location_photo)
            .service(delete_location_photo),
    );
}
