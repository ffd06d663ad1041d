//! Analysis endpoints.
//!
//! - `POST /api/analyses`: multipart upload, field `file`
//! - `POST /api/analyses/url`: classifier fetches the image itself
//! - `GET /api/analyses/current`: the displayed result

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalysisQuery, ApiContext};
use crate::models::AnalysisResult;
use crate::pipeline::classifier::{UrlPredictRequest, UPLOAD_FIELD};
use crate::pipeline::upload::{ImageUpload, UploadError};

/// `POST /api/analyses`: classify an uploaded chest X-ray.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Query(query): Query<AnalysisQuery>,
    mut multipart: Multipart,
) -> Result<Json<Arc<AnalysisResult>>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some(ImageUpload::with_detected_mime(
            &file_name,
            content_type.as_deref(),
            bytes.to_vec(),
        ));
        break;
    }

    let upload = upload.ok_or(UploadError::Missing)?;
    let result = ctx
        .core
        .analyze_upload(upload, &query.into_options())
        .await?;
    Ok(Json(result))
}

/// `POST /api/analyses/url`
pub async fn from_url(
    State(ctx): State<ApiContext>,
    Json(req): Json<UrlPredictRequest>,
) -> Result<Json<Arc<AnalysisResult>>, ApiError> {
    let result = ctx.core.analyze_url(&req).await?;
    Ok(Json(result))
}

/// `GET /api/analyses/current`
pub async fn current(
    State(ctx): State<ApiContext>,
) -> Result<Json<Arc<AnalysisResult>>, ApiError> {
    let current = ctx
        .core
        .current()?
        .ok_or_else(|| ApiError::NotFound("No analysis yet".into()))?;
    Ok(Json(current))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
