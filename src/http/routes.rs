use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Reference data and settings
        .route("/subjects", get(handlers::list_subjects))
        .route("/settings", get(handlers::get_settings))
        .route("/settings/languages", put(handlers::update_languages))
        .route("/room-code", post(handlers::regenerate_room_code))
        // Session control
        .route("/session/subject", post(handlers::select_subject))
        .route("/session/start", post(handlers::start_session))
        .route("/session/stop", post(handlers::stop_session))
        .route("/session/status", get(handlers::session_status))
        // History
        .route("/history", get(handlers::list_history))
        .route(
            "/history/:record_id",
            get(handlers::get_history_record).delete(handlers::delete_history_record),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
