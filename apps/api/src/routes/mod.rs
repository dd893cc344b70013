pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::matching::handlers::handle_match;
use crate::state::AppState;
use crate::workflow::handlers::{handle_improve, handle_upload};

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // CV API
        .route("/api/v1/cv/analyze", post(handle_analyze))
        .route("/api/v1/cv/improve", post(handle_improve))
        .route("/api/v1/cv/upload", post(handle_upload))
        // Job description API
        .route("/api/v1/jd/match", post(handle_match))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
