//! Account routes: register, login, and the current-user lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sweetshop_core::{NewUser, User, ValidationError};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::ApiJson;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: User,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (Some(email), Some(password), Some(name)) = (
        present(&req.email),
        present(&req.password),
        present(&req.name),
    ) else {
        return Err(ValidationError::MissingFields(
            "Email, password, and name are required".to_string(),
        )
        .into());
    };

    let new_user = NewUser::registration(email, password, name)?;
    let user = state.db.users().insert(&new_user).await?;
    let token = state.jwt.issue(&user.principal())?;

    info!(id = %user.id, email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully",
            token,
            user,
        }),
    ))
}

/// `POST /api/auth/login`
///
/// Unknown email and wrong password give the same 401.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (present(&req.email), present(&req.password)) else {
        return Err(ValidationError::MissingFields(
            "Email and password are required".to_string(),
        )
        .into());
    };

    let user = state
        .db
        .users()
        .verify_credentials(email.trim(), password)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let token = state.jwt.issue(&user.principal())?;
    debug!(id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful",
        token,
        user,
    }))
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = state
        .db
        .users()
        .get_by_id(&principal.id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(MeResponse {
        success: true,
        user,
    }))
}
