pub mod auth;
pub mod cookies;
pub mod middleware;
pub mod pages;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use middleware::{admin_gate, AdminSession};
pub use state::AppState;

/// Builds the site router: public routes, admin routes, and the admin gate
/// in front of all of them.
pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/admin/login", get(pages::login_page))
        .route("/api/admin/login", post(auth::login_handler))
        .route(
            "/api/therapy-analytics/latest",
            get(rest::latest_snapshot_handler),
        );

    // Admin routes (the gate decides)
    let admin_routes = Router::new()
        .route("/admin/therapy-analytics", get(pages::analytics_page))
        .route("/api/admin/logout", post(auth::logout_handler))
        .route(
            "/api/admin/therapy-analytics",
            get(rest::get_snapshot_handler).post(rest::update_snapshot_handler),
        );

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), admin_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
