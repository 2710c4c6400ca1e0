use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::web::{Data, ServiceConfig};
use actix_web::{get, post, put, web, HttpResponse};
use actix_web_validator::Json;

use super::dto::{AuthResponse, UserDto};
use super::extractor::AuthUser;
use super::models::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use super::service::AuthService;
use crate::api::error::ApiError;
use crate::api::response::ApiResponse;

fn token_cookie(token: &str, expire_days: i64) -> Cookie<'static> {
    Cookie::build("token", token.to_string())
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::days(expire_days))
        .finish()
}

fn auth_response(
    mut builder: actix_web::HttpResponseBuilder,
    token: String,
    user: UserDto,
    expire_days: i64,
) -> HttpResponse {
    builder
        .cookie(token_cookie(&token, expire_days))
        .json(AuthResponse {
            success: true,
            token,
            user,
        })
}

#[post("/register")]
async fn register(
    service: Data<AuthService>,
    body: Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let (token, user) = service.register(&body).await?;

    Ok(auth_response(
        HttpResponse::Created(),
        token,
        user,
        service.token_expire_days(),
    ))
}

#[post("/login")]
async fn login(
    service: Data<AuthService>,
    body: Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let (token, user) = service.login(&body.email, &body.password).await?;

    Ok(auth_response(
        HttpResponse::Ok(),
        token,
        user,
        service.token_expire_days(),
    ))
}

#[get("/me")]
async fn get_me(service: Data<AuthService>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    let user = service.me(auth.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

#[put("/profile")]
async fn update_profile(
    service: Data<AuthService>,
    auth: AuthUser,
    body: Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = service.update_profile(auth.id, &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

pub fn auth_config(config: &mut ServiceConfig) {
    config.service(
        web::scope("auth")
            .service(register)
            .service(login)
            .service(get_me)
            .service(update_profile),
    );
}
