//! services/site/src/web/middleware.rs
//!
//! The admin gate, plus the extractor admin API handlers use to re-check the
//! session on their own.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use nextdoor_core::TokenCheck;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::web::cookies::admin_token;
use crate::web::state::AppState;

pub const LOGIN_PAGE: &str = "/admin/login";
const LOGIN_API: &str = "/api/admin/login";
const ADMIN_PAGES: &str = "/admin";
const ADMIN_API: &str = "/api/admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Area {
    Public,
    AdminPage,
    AdminApi,
}

fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn classify(path: &str) -> Area {
    if under(path, LOGIN_PAGE) || under(path, LOGIN_API) {
        Area::Public
    } else if under(path, ADMIN_API) {
        Area::AdminApi
    } else if under(path, ADMIN_PAGES) {
        Area::AdminPage
    } else {
        Area::Public
    }
}

/// Maps a failed check to the error returned by admin API routes.
fn rejection(check: TokenCheck) -> ApiError {
    match check {
        TokenCheck::MissingSecret => {
            error!("ADMIN_COOKIE_SECRET is not set; admin access is disabled");
            ApiError::NotConfigured("Admin access is not configured".to_string())
        }
        _ => ApiError::Unauthorized("Unauthorized".to_string()),
    }
}

/// Middleware guarding `/admin` pages and `/api/admin` routes.
///
/// Login page and login endpoint pass through. Without a valid session, pages
/// redirect to the login page and API routes are rejected.
pub async fn admin_gate(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    let area = classify(path);
    if area == Area::Public {
        return next.run(req).await;
    }

    let check = state.tokens.check(admin_token(req.headers()));
    if check.is_valid() {
        return next.run(req).await;
    }

    debug!(path, ?check, "Admin gate rejected request");
    match area {
        Area::AdminPage => Redirect::temporary(LOGIN_PAGE).into_response(),
        _ => rejection(check).into_response(),
    }
}

/// Proof that the request carries a valid admin session.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let check = state.tokens.check(admin_token(&parts.headers));
        if check.is_valid() {
            Ok(AdminSession)
        } else {
            Err(rejection(check))
        }
    }
}
