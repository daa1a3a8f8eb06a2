pub mod health;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::assessment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Profile
        .route(
            "/api/profile",
            get(handlers::handle_get_profile).put(handlers::handle_put_profile),
        )
        // Assessments
        .route(
            "/api/assessments",
            get(handlers::handle_list_assessments).post(handlers::handle_create_assessment),
        )
        .route(
            "/api/assessments/:id",
            get(handlers::handle_get_assessment).delete(handlers::handle_delete_assessment),
        )
        .route(
            "/api/assessments/:id/complete-item",
            patch(handlers::handle_complete_item),
        )
        .route(
            "/api/assessments/:id/uncomplete-item",
            patch(handlers::handle_uncomplete_item),
        )
        .with_state(state)
}
