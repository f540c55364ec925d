use crate::api::middleware::SESSION_COOKIE;
use crate::api::profile::landing_path;
use crate::api::{non_blank, ApiError, ApiResult};
use crate::entities::{user, User};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use serde_json::json;
use tower_cookies::{cookie::SameSite, Cookie, Cookies, Key};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
}

pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<Response> {
    let (Some(name), Some(email), Some(password)) = (
        non_blank(payload.name),
        non_blank(payload.email).map(|e| e.to_lowercase()),
        payload.password,
    ) else {
        return Err(ApiError::validation("Name, email, and password are required"));
    };
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal("Failed to hash password".to_string()))?
        .to_string();

    let now = chrono::Utc::now().naive_utc();
    let new_user = user::ActiveModel {
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(None),
        phone: Set(non_blank(payload.phone)),
        school_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_user.insert(&db).await {
        Ok(user) => {
            tracing::Span::current()
                .record("table", "users")
                .record("action", "register_user")
                .record("user_id", user.id)
                .record("business_event", "User registered successfully");

            crate::metrics::increment_users_registered();

            Ok((
                StatusCode::CREATED,
                Json(json!({"user": {"id": user.id, "email": user.email, "name": user.name}})),
            )
                .into_response())
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            tracing::Span::current()
                .record("table", "users")
                .record("action", "register_user_failed");
            Err(ApiError::Conflict("Email already exists"))
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Extension(key): Extension<Key>,
    cookies: Cookies,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<Response> {
    let (Some(email), Some(password)) = (
        non_blank(payload.email).map(|e| e.to_lowercase()),
        payload.password,
    ) else {
        return Err(ApiError::validation("Email and password are required"));
    };

    let user = User::find()
        .filter(user::Column::Email.eq(email))
        .one(&db)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| ApiError::Internal("Invalid password hash in DB".to_string()))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::Span::current()
            .record("table", "users")
            .record("action", "login_user_failed")
            .record("error", "invalid_credentials");
        return Err(ApiError::Unauthorized);
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, user.id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookies.signed(&key).add(cookie);

    tracing::Span::current()
        .record("table", "users")
        .record("action", "login_user")
        .record("user_id", user.id)
        .record("business_event", "User logged in successfully");

    Ok((
        StatusCode::OK,
        Json(json!({"message": "Login successful", "dashboard": landing_path(user.role)})),
    )
        .into_response())
}

pub async fn logout(cookies: Cookies) -> Response {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookies.remove(cookie);

    (StatusCode::OK, Json(json!({"message": "Logged out"}))).into_response()
}
