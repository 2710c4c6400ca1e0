use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::LocationDto;
use super::geo::haversine_distance_meters;
use super::models::{CreateLocationRequest, NearbyQuery, PhotoUploadForm, UpdateLocationRequest};
use crate::api::error::ApiError;
use crate::db::location_repository::{LocationRepository, NewLocation};
use crate::db::models::{LocationRow, Photo};

const DEFAULT_NEARBY_DISTANCE_METERS: f64 = 10_000.0;

/// Location service containing business logic, including the photo store
pub struct LocationService {
    pool: Pool<Postgres>,
    upload_dir: PathBuf,
}

impl LocationService {
    pub fn new(pool: Pool<Postgres>, upload_dir: PathBuf) -> Self {
        Self { pool, upload_dir }
    }

    async fn owned(
        &self,
        user_id: Uuid,
        id: Uuid,
        denied: &'static str,
    ) -> Result<LocationRow, ApiError> {
        let location = LocationRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or(ApiError::NotFound {
                what: "Location",
                id,
            })?;

        if location.user_id != user_id {
            return Err(ApiError::NotAuthorized(denied));
        }
        Ok(location)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<LocationDto>, ApiError> {
        let rows = LocationRepository::list_for_user(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(LocationDto::from).collect())
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<LocationDto, ApiError> {
        let location = self
            .owned(user_id, id, "User not authorized to access this location")
            .await?;
        Ok(location.into())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        req: &CreateLocationRequest,
    ) -> Result<LocationDto, ApiError> {
        info!("Service: creating location name={}", req.name);

        let new_location = NewLocation {
            name: req.name.clone(),
            address: req.address.clone(),
            longitude: req.coordinates.longitude(),
            latitude: req.coordinates.latitude(),
            notes: req.notes.clone(),
        };

        let row = LocationRepository::create(&self.pool, user_id, &new_location).await?;
        Ok(row.into())
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateLocationRequest,
    ) -> Result<LocationDto, ApiError> {
        let mut location = self
            .owned(user_id, id, "User not authorized to update this location")
            .await?;

        if let Some(name) = &req.name {
            location.name = name.clone();
        }
        if let Some(address) = &req.address {
            location.address = Some(address.clone());
        }
        if let Some(point) = &req.coordinates {
            location.longitude = point.longitude();
            location.latitude = point.latitude();
        }
        if let Some(notes) = &req.notes {
            location.notes = Some(notes.clone());
        }

        // Touch the timestamp explicitly at the write boundary.
        location.updated_at = Utc::now();
        let row = LocationRepository::update(&self.pool, &location).await?;

        info!("Service: location updated id={}", id);
        Ok(row.into())
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let location = self
            .owned(user_id, id, "User not authorized to delete this location")
            .await?;

        // Remove stored photo files first; a failed removal is logged and
        // does not block the delete. Jobs referencing this location are
        // left in place (orphaned) on purpose.
        for photo in &location.photos.0 {
            self.remove_photo_file(&photo.url).await;
        }

        LocationRepository::delete(&self.pool, id).await?;
        info!("Service: location deleted id={}", id);
        Ok(())
    }

    /// Locations within `distance` meters of the given point, nearest first.
    pub async fn nearby(
        &self,
        user_id: Uuid,
        query: &NearbyQuery,
    ) -> Result<Vec<LocationDto>, ApiError> {
        let (lat, lng) = match (query.lat, query.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return Err(ApiError::Validation(
                    "Please provide latitude and longitude".to_string(),
                ))
            }
        };
        let max_distance = query.distance.unwrap_or(DEFAULT_NEARBY_DISTANCE_METERS);

        let rows = LocationRepository::list_for_user(&self.pool, user_id).await?;

        let mut in_range: Vec<(f64, LocationRow)> = rows
            .into_iter()
            .map(|row| {
                let d = haversine_distance_meters(lat, lng, row.latitude, row.longitude);
                (d, row)
            })
            .filter(|(d, _)| *d <= max_distance)
            .collect();
        in_range.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(in_range
            .into_iter()
            .map(|(_, row)| LocationDto::from(row))
            .collect())
    }

    pub async fn upload_photo(
        &self,
        user_id: Uuid,
        id: Uuid,
        form: PhotoUploadForm,
    ) -> Result<LocationDto, ApiError> {
        let location = self
            .owned(user_id, id, "User not authorized to update this location")
            .await?;

        let extension = form
            .file
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension().and_then(|e| e.to_str()))
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "jpg".to_string());
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let target = self.upload_dir.join(&file_name);

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Creating upload dir failed: {}", e)))?;
        tokio::fs::copy(form.file.file.path(), &target)
            .await
            .map_err(|e| ApiError::Internal(format!("Storing uploaded file failed: {}", e)))?;

        let taken_at = form.taken_at.as_ref().and_then(|text| {
            match DateTime::parse_from_rfc3339(text.as_str()) {
                Ok(t) => Some(t.with_timezone(&Utc)),
                Err(e) => {
                    warn!("Ignoring unparseable takenAt '{}': {}", text.as_str(), e);
                    None
                }
            }
        });

        let mut photos = location.photos.0.clone();
        photos.push(Photo {
            id: Uuid::new_v4(),
            url: format!("/uploads/{}", file_name),
            caption: form.caption.map(|text| text.into_inner()),
            taken_at,
        });

        let row =
            LocationRepository::update_photos(&self.pool, id, &photos, Utc::now()).await?;

        info!("Service: photo added to location id={}", id);
        Ok(row.into())
    }

    pub async fn delete_photo(
        &self,
        user_id: Uuid,
        id: Uuid,
        photo_id: Uuid,
    ) -> Result<LocationDto, ApiError> {
        let location = self
            .owned(user_id, id, "User not authorized to update this location")
            .await?;

        let mut photos = location.photos.0.clone();
        let index = photos
            .iter()
            .position(|p| p.id == photo_id)
            .ok_or(ApiError::NotFound {
                what: "Photo",
                id: photo_id,
            })?;
        let removed = photos.remove(index);

        self.remove_photo_file(&removed.url).await;

        let row =
            LocationRepository::update_photos(&self.pool, id, &photos, Utc::now()).await?;

        info!("Service: photo {} removed from location id={}", photo_id, id);
        Ok(row.into())
    }

    /// Best-effort removal of a stored photo file.
    async fn remove_photo_file(&self, url: &str) {
        if let Some(file_name) = url.strip_prefix("/uploads/") {
            let path = self.upload_dir.join(file_name);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Could not remove photo file {:?}: {}", path, e);
            }
        }
    }
}
