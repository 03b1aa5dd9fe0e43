use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chat::ChatError;
use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed request whose content does not fit the expected shape.
    #[error("Unprocessable request: {0}")]
    Unprocessable(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An optional capability was compiled out of this build.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("PDF parse error: {0}")]
    PdfParse(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Unavailable => AppError::Unavailable(err.to_string()),
            ExtractionError::Parse(msg) => AppError::PdfParse(format!("Failed to parse PDF: {msg}")),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Unavailable => AppError::Unavailable(err.to_string()),
            ChatError::MissingCredential => AppError::MissingCredential(err.to_string()),
            ChatError::Upstream(msg) => AppError::Llm(format!("OpenAI error: {msg}")),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Unprocessable(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(format!("Invalid multipart body: {}", rejection.body_text()))
    }
}

impl AppError {
    /// Maps a failure while streaming an upload. Hitting the body limit keeps
    /// its 413 status and names the limit.
    pub fn from_multipart(err: MultipartError, max_bytes: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!("File exceeds {max_bytes} bytes"))
        } else {
            AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => {
                tracing::warn!("{msg}");
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Unavailable(msg) => {
                tracing::error!("Capability unavailable: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "UNAVAILABLE", msg.clone())
            }
            AppError::PdfParse(msg) => {
                tracing::warn!("{msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF_PARSE_ERROR",
                    msg.clone(),
                )
            }
            AppError::MissingCredential(msg) => {
                tracing::error!("Missing credential: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MISSING_CREDENTIAL",
                    msg.clone(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let resp = AppError::Validation("Empty file".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_extraction_parse_error_keeps_message() {
        let err: AppError = ExtractionError::Parse("bad xref".to_string()).into();
        assert_eq!(err.to_string(), "PDF parse error: Failed to parse PDF: bad xref");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_chat_upstream_error_is_wrapped() {
        let err: AppError = ChatError::Upstream("status 401".to_string()).into();
        match err {
            AppError::Llm(msg) => assert_eq!(msg, "OpenAI error: status 401"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_missing_credential_maps_to_500() {
        let err: AppError = ChatError::MissingCredential.into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unprocessable_maps_to_422() {
        let resp = AppError::Unprocessable("missing field `messages`".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let resp = AppError::PayloadTooLarge("File exceeds 1024 bytes".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
