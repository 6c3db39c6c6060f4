//! services/site/src/web/rest.rs
//!
//! Contains the Axum handlers for the therapy-analytics snapshot endpoints and
//! the master definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorResponse};
use crate::web::auth::{self, LoginRequest, OkResponse};
use crate::web::middleware::AdminSession;
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Json},
};
use nextdoor_core::TherapySnapshot;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        latest_snapshot_handler,
        get_snapshot_handler,
        update_snapshot_handler,
        auth::login_handler,
        auth::logout_handler,
    ),
    components(
        schemas(SnapshotResponse, LoginRequest, OkResponse, ErrorResponse)
    ),
    tags(
        (name = "NEXTDOOR.AI Site API", description = "Therapy analytics snapshot and admin session endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Envelope around the current snapshot.
#[derive(Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub ok: bool,
    #[schema(value_type = Object)]
    pub snapshot: TherapySnapshot,
}

impl SnapshotResponse {
    fn new(snapshot: TherapySnapshot) -> Self {
        Self { ok: true, snapshot }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Latest snapshot for the public homepage. Responses are never cached.
#[utoipa::path(
    get,
    path = "/api/therapy-analytics/latest",
    responses(
        (status = 200, description = "Current snapshot", body = SnapshotResponse)
    )
)]
pub async fn latest_snapshot_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshots.read().await;
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(SnapshotResponse::new(snapshot)),
    )
}

/// Current snapshot for the admin editor.
#[utoipa::path(
    get,
    path = "/api/admin/therapy-analytics",
    responses(
        (status = 200, description = "Current snapshot", body = SnapshotResponse),
        (status = 401, description = "No valid admin session", body = ErrorResponse)
    )
)]
pub async fn get_snapshot_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Json<SnapshotResponse> {
    Json(SnapshotResponse::new(state.snapshots.read().await))
}

/// Replace the snapshot.
///
/// The body may be partial; missing fields take their default values and
/// mistyped ones are coerced. `updatedAt` is always set by the server.
#[utoipa::path(
    post,
    path = "/api/admin/therapy-analytics",
    request_body(content_type = "application/json", description = "Full or partial snapshot."),
    responses(
        (status = 200, description = "Snapshot saved", body = SnapshotResponse),
        (status = 400, description = "Body is not a JSON object or is not sent as JSON", body = ErrorResponse),
        (status = 401, description = "No valid admin session", body = ErrorResponse),
        (status = 500, description = "Snapshot could not be written", body = ErrorResponse)
    )
)]
pub async fn update_snapshot_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SnapshotResponse>, ApiError> {
    // Rejections go through ApiError so the editor always gets `{ok, error}`.
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let Value::Object(fields) = body else {
        return Err(ApiError::BadRequest(
            "Snapshot payload must be a JSON object".to_string(),
        ));
    };

    let snapshot = state.snapshots.write(&fields).await?;
    info!(points = snapshot.points(), "Snapshot updated");
    Ok(Json(SnapshotResponse::new(snapshot)))
}
