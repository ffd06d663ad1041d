//! Chat endpoints.
//!
//! - `GET /api/chat`: conversation id, state and transcript
//! - `POST /api/chat/messages`: submit a turn; the reply shows up in the
//!   transcript once the assistant delay has elapsed

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ChatSubmitRequest};
use crate::chat::ChatSnapshot;
use crate::models::ChatMessage;

const MAX_MESSAGE_CHARS: usize = 2000;

/// `GET /api/chat`
pub async fn snapshot(State(ctx): State<ApiContext>) -> Result<Json<ChatSnapshot>, ApiError> {
    Ok(Json(ctx.core.chat_snapshot()?))
}

/// `POST /api/chat/messages`: 202 with the stored user message.
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(req): Json<ChatSubmitRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    if req.text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Message too long (max {MAX_MESSAGE_CHARS} chars)"
        )));
    }
    let message = ctx.core.send_chat_message(&req.text)?;
    Ok((StatusCode::ACCEPTED, Json(message)))
}
