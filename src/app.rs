use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/records", get(handlers::list_records).post(handlers::create_record))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/forecast", get(handlers::get_forecast))
        .route("/api/context", get(handlers::get_context))
        .route("/api/advice", post(handlers::request_advice))
        .with_state(state)
}
