use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};
use uuid::Uuid;

/// Error body shared by every failure response
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Service-level errors
#[derive(Debug)]
pub enum ApiError {
    /// Database operation failed
    Database(sqlx::Error),

    /// Non-database internal failure (hashing, token signing, file I/O)
    Internal(String),

    /// Request failed validation beyond what the payload extractors cover
    Validation(String),

    /// Resource does not exist
    NotFound { what: &'static str, id: Uuid },

    /// Query matched nothing where at least one row was required
    NoMatches(&'static str),

    /// Resource exists but belongs to another user
    NotAuthorized(&'static str),

    /// Missing or invalid bearer token
    Unauthenticated,

    /// Login failed
    InvalidCredentials,

    /// Registration or profile update against an email already in use
    EmailTaken(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::NotFound { what, id } => write!(f, "{} not found with id of {}", what, id),
            ApiError::NoMatches(msg) => write!(f, "{}", msg),
            ApiError::NotAuthorized(msg) => write!(f, "{}", msg),
            ApiError::Unauthenticated => write!(f, "Not authorized to access this route"),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::EmailTaken(email) => {
                write!(f, "An account with email '{}' already exists", email)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError()
                    .json(ErrorBody::new("Failed to process request"))
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                HttpResponse::InternalServerError()
                    .json(ErrorBody::new("Failed to process request"))
            }
            ApiError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorBody::new(msg.clone()))
            }
            ApiError::NotFound { .. } | ApiError::NoMatches(_) => {
                warn!("{}", self);
                HttpResponse::NotFound().json(ErrorBody::new(self.to_string()))
            }
            ApiError::NotAuthorized(_)
            | ApiError::Unauthenticated
            | ApiError::InvalidCredentials => {
                warn!("{}", self);
                HttpResponse::Unauthorized().json(ErrorBody::new(self.to_string()))
            }
            ApiError::EmailTaken(_) => {
                warn!("{}", self);
                HttpResponse::BadRequest().json(ErrorBody::new(self.to_string()))
            }
        }
    }
}
