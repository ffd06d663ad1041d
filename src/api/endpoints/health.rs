//! Health check endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::classifier::ClassifierHealth;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub analyzing: bool,
}

/// `GET /api/health`: liveness of this process.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        analyzing: ctx.core.is_analyzing(),
    })
}

/// `GET /api/classifier/health`: model status reported by the classifier.
pub async fn classifier(
    State(ctx): State<ApiContext>,
) -> Result<Json<ClassifierHealth>, ApiError> {
    let health = ctx
        .core
        .classifier_health()
        .await
        .map_err(|e| ApiError::Classifier(e.detail()))?;
    Ok(Json(health))
}
