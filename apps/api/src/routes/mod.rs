pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::collection::handlers;
use crate::state::AppState;

/// Résumé uploads are carried whole in one request body.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route(
            "/api/v1/job-description",
            put(handlers::handle_set_job_description),
        )
        .route(
            "/api/v1/resumes",
            post(handlers::handle_upload_resume)
                .delete(handlers::handle_clear_all)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/resumes/:id/select",
            post(handlers::handle_toggle_select),
        )
        .route(
            "/api/v1/resumes/:id/expand",
            post(handlers::handle_toggle_expand),
        )
        .route(
            "/api/v1/filters",
            put(handlers::handle_set_filters).delete(handlers::handle_reset_filters),
        )
        .route("/api/v1/sort", put(handlers::handle_set_sort))
        .route(
            "/api/v1/comparison",
            post(handlers::handle_compare).delete(handlers::handle_close_comparison),
        )
        .route(
            "/api/v1/errors/analysis",
            delete(handlers::handle_dismiss_analysis_error),
        )
        .route(
            "/api/v1/errors/comparison",
            delete(handlers::handle_dismiss_comparison_error),
        )
        .with_state(state)
}
