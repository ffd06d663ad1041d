use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{AnalysisResult, AnalysisSummary};

/// `GET /api/history`: most recent first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<AnalysisSummary>>, ApiError> {
    Ok(Json(ctx.core.summaries()?))
}

/// `POST /api/history/:index/select`
pub async fn select(
    State(ctx): State<ApiContext>,
    Path(index): Path<usize>,
) -> Result<Json<Arc<AnalysisResult>>, ApiError> {
    Ok(Json(ctx.core.select(index)?))
}
