pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::http::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/auth", post(routes::auth))
        .route("/predict_text", post(routes::predict_text))
        .route("/predict_face", post(routes::predict_face))
        .route("/chat", post(routes::chat))
        .route("/logout", post(routes::logout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
