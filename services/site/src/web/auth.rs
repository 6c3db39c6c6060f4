//! services/site/src/web/auth.rs
//!
//! Admin login and logout endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::cookies::{admin_cookie, cleared_admin_cookie};
use crate::web::middleware::AdminSession;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, Default, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

const LOGIN_UNAVAILABLE: &str = "Admin login is unavailable";

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/admin/login - Exchange the admin password for a session cookie
///
/// A body that is not valid JSON counts as an empty password.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; sets the nd_admin cookie", body = OkResponse),
        (status = 401, description = "Invalid password", body = crate::error::ErrorResponse),
        (status = 500, description = "Admin login is not configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: LoginRequest = serde_json::from_slice(&body).unwrap_or_default();

    // 1. Check the feature is configured
    let Some(expected) = state.config.admin_password.as_deref() else {
        error!("ADMIN_PASSWORD is not set; admin login is disabled");
        return Err(ApiError::NotConfigured(LOGIN_UNAVAILABLE.to_string()));
    };

    // 2. Verify password
    if req.password != expected {
        warn!("Rejected admin login attempt");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    // 3. Issue the session token
    let token = state.tokens.issue().map_err(|e| {
        error!("Failed to issue admin token: {}", e);
        ApiError::NotConfigured(LOGIN_UNAVAILABLE.to_string())
    })?;

    // 4. Return response with cookie
    info!("Admin logged in");
    let cookie = admin_cookie(&token, state.config.secure_cookies());
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(OkResponse { ok: true }),
    ))
}

/// POST /api/admin/logout - Clear the admin session cookie
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Logout successful", body = OkResponse),
        (status = 401, description = "No active session", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout_handler(_admin: AdminSession) -> impl IntoResponse {
    info!("Admin logged out");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_admin_cookie())],
        Json(OkResponse { ok: true }),
    )
}
