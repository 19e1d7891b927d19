use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the portal router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Auth
        .route("/", get(handlers::login_form))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))

        // Client portal
        .route("/dashboard", get(handlers::view_list))
        .route("/dashboard/{slug}", get(handlers::view_page))
        .route("/dashboard/{slug}/select", get(handlers::select_region))

        // Admin portal
        .route("/admin", get(handlers::admin_home))
        .route("/admin/facilities", post(handlers::create_facility))
        .route("/admin/users", get(handlers::manage_users).post(handlers::create_user))

        .with_state(state)
}
