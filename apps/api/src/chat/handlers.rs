use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use crate::chat::{ChatRequest, ChatResponse, API_KEY_HEADER};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /chat
///
/// Proxies the conversation to the hosted model. An `x-openai-api-key` header
/// overrides the server's own key for this request only.
pub async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let header_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let content = state.chat.reply(header_key, &request).await?;

    Ok(Json(ChatResponse { content }))
}
