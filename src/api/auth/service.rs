use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::UserDto;
use super::models::{RegisterRequest, UpdateProfileRequest};
use super::token::issue_token;
use crate::api::error::ApiError;
use crate::db::user_repository::UserRepository;

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Account service: registration, login, profile
pub struct AuthService {
    pool: Pool<Postgres>,
    jwt_secret: String,
    jwt_expire_days: i64,
}

impl AuthService {
    pub fn new(pool: Pool<Postgres>, jwt_secret: String, jwt_expire_days: i64) -> Self {
        Self {
            pool,
            jwt_secret,
            jwt_expire_days,
        }
    }

    /// Cookie lifetime matches token expiry.
    pub fn token_expire_days(&self) -> i64 {
        self.jwt_expire_days
    }

    fn token_for(&self, user_id: Uuid) -> Result<String, ApiError> {
        issue_token(user_id, &self.jwt_secret, self.jwt_expire_days)
            .map_err(|e| ApiError::Internal(format!("Token signing failed: {}", e)))
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<(String, UserDto), ApiError> {
        info!("Registering user: email={}", req.email);

        if UserRepository::find_by_email(&self.pool, &req.email)
            .await?
            .is_some()
        {
            warn!("Registration rejected, email already in use: {}", req.email);
            return Err(ApiError::EmailTaken(req.email.clone()));
        }

        let password_hash = hash_password(&req.password)?;
        let user = UserRepository::create(&self.pool, &req.name, &req.email, &password_hash).await?;

        info!("User created with id={}", user.id);

        let token = self.token_for(user.id)?;
        Ok((token, user.into()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(String, UserDto), ApiError> {
        let user = UserRepository::find_by_email(&self.pool, email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            warn!("Login failed for email={}", email);
            return Err(ApiError::InvalidCredentials);
        }

        info!("User logged in: id={}", user.id);

        let token = self.token_for(user.id)?;
        Ok((token, user.into()))
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserDto, ApiError> {
        UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .map(UserDto::from)
            .ok_or(ApiError::NotFound {
                what: "User",
                id: user_id,
            })
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<UserDto, ApiError> {
        let user = UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(ApiError::NotFound {
                what: "User",
                id: user_id,
            })?;

        let name = req.name.clone().unwrap_or_else(|| user.name.clone());
        let email = req.email.clone().unwrap_or_else(|| user.email.clone());

        if email != user.email {
            if let Some(existing) = UserRepository::find_by_email(&self.pool, &email).await? {
                if existing.id != user_id {
                    return Err(ApiError::EmailTaken(email));
                }
            }
        }

        let updated =
            UserRepository::update_profile(&self.pool, user_id, &name, &email, Utc::now()).await?;

        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("hunter2hunter2").unwrap();

        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
