//! REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::state::AppState;

/// API error response
#[derive(Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// The whole location manifest
pub async fn list_locations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.manifest.clone())
}

/// One location by label
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> impl IntoResponse {
    match state.manifest.find(&label) {
        Some(location) => Json(location.clone()).into_response(),
        None => {
            debug!(label = %label, "Unknown location requested");
            (
                StatusCode::NOT_FOUND,
                Json(ApiError::new(format!("Location not found: {}", label))),
            )
                .into_response()
        }
    }
}
