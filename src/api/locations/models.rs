use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// GeoJSON-style point, `coordinates` as `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

fn point_type() -> String {
    "Point".to_string()
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: point_type(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

fn validate_point(point: &GeoPoint) -> Result<(), ValidationError> {
    let [lng, lat] = point.coordinates;
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        let mut err = ValidationError::new("coordinates");
        err.message = Some("Coordinates must be a valid [longitude, latitude] pair".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 200, message = "Please add a location name"))]
    pub name: String,
    pub address: Option<String>,
    #[validate(custom(function = "validate_point"))]
    pub coordinates: GeoPoint,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, max = 200, message = "Please add a location name"))]
    pub name: Option<String>,
    pub address: Option<String>,
    #[validate(custom(function = "validate_point"))]
    pub coordinates: Option<GeoPoint>,
    pub notes: Option<String>,
}

/// Query parameters for the nearby search. Distance is in meters.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub distance: Option<f64>,
}

/// Multipart payload for a photo upload.
#[derive(Debug, MultipartForm)]
pub struct PhotoUploadForm {
    #[multipart(limit = "10MiB")]
    pub file: TempFile,
    pub caption: Option<Text<String>>,
    #[multipart(rename = "takenAt")]
    pub taken_at: Option<Text<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_within_bounds_passes() {
        assert!(validate_point(&GeoPoint::new(174.78, -41.29)).is_ok());
    }

    #[test]
    fn point_out_of_bounds_fails() {
        assert!(validate_point(&GeoPoint::new(200.0, -41.29)).is_err());
        assert!(validate_point(&GeoPoint::new(174.78, 95.0)).is_err());
    }

    #[test]
    fn point_type_defaults_when_omitted() {
        let point: GeoPoint = serde_json::from_str(r#"{"coordinates":[174.78,-41.29]}"#).unwrap();

        assert_eq!(point.kind, "Point");
        assert_eq!(point.longitude(), 174.78);
        assert_eq!(point.latitude(), -41.29);
    }
}
