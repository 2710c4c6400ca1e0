use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::api::auth::token::verify_token;
use crate::api::error::ApiError;
use crate::config::Config;
use crate::db::user_repository::UserRepository;

/// Authenticated caller, resolved from the bearer token or the `token`
/// cookie. Extracting this guards a route: requests without a valid token
/// for an existing user are rejected with 401 before the handler runs.
pub struct AuthUser {
    pub id: Uuid,
}

fn request_token(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    req.cookie("token").map(|c| c.value().to_string())
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = request_token(req);
        let secret = req
            .app_data::<web::Data<Config>>()
            .map(|c| c.jwt_secret.clone());
        let pool = req.app_data::<web::Data<Pool<Postgres>>>().cloned();

        Box::pin(async move {
            let token = token.ok_or(ApiError::Unauthenticated)?;
            let secret =
                secret.ok_or_else(|| ApiError::Internal("auth configuration missing".into()))?;
            let pool =
                pool.ok_or_else(|| ApiError::Internal("database pool missing".into()))?;

            let user_id = verify_token(&token, &secret).map_err(|_| ApiError::Unauthenticated)?;

            // A token can outlive its account; reject if the user is gone.
            match UserRepository::exists(&pool, user_id).await {
                Ok(true) => Ok(AuthUser { id: user_id }),
                Ok(false) => Err(ApiError::Unauthenticated),
                Err(e) => Err(ApiError::Database(e)),
            }
        })
    }
}
