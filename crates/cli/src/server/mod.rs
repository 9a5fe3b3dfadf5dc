//! HTTP surface for the web front-end.

pub mod errors;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use scheme_core::ask::{Answer, Assistant};
use scheme_core::models::{Profile, Scheme};
use scheme_core::recommend::Recommender;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub assistant: Arc<Assistant>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/recommend", post(recommend_handler))
        .route("/api/ask", post(ask_handler))
        .with_state(state)
}

/// GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scheme-finder"
    }))
}

/// POST /api/recommend
async fn recommend_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Scheme>>, ApiError> {
    let Json(body) = payload?;
    let profile = Profile::from_value(&body)?;
    let schemes = state.recommender.recommend(&profile).await?;
    Ok(Json(schemes))
}

/// POST /api/ask
async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<Answer>, ApiError> {
    let Json(req) = payload?;
    let answer = state.assistant.ask(&req.question).await?;
    Ok(Json(answer))
}
