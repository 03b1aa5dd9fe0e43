use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::classifier::Prediction;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::state::AppState;

/// Multipart field carrying the resume.
const FILE_FIELD: &str = "file";
const ACCEPTED_CONTENT_TYPES: &[&str] = &["application/pdf", "application/octet-stream"];

struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

/// POST /predict
///
/// Accepts a multipart `file` upload, extracts its text and classifies it.
pub async fn handle_predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, AppError> {
    let upload = read_file_field(multipart?, state.config.max_upload_bytes).await?;

    if !is_accepted_content_type(upload.content_type.as_deref()) {
        return Err(AppError::Validation(
            "Only PDF files are supported".to_string(),
        ));
    }
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Empty file".to_string()));
    }

    let size = upload.bytes.len();
    let text = extract_text(upload.bytes).await?;
    let prediction = state.classifier.predict(&text);

    info!(
        file = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = size,
        chars = text.len(),
        category = %prediction.category,
        confidence = prediction.confidence,
        "Resume classified"
    );

    Ok(Json(prediction))
}

async fn read_file_field(mut multipart: Multipart, max_bytes: usize) -> Result<Upload, AppError> {
    let upload_error = |e| AppError::from_multipart(e, max_bytes);

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field.bytes().await.map_err(upload_error)?;
        return Ok(Upload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Unprocessable(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

/// Compares the media type only, ignoring parameters and case.
fn is_accepted_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED_CONTENT_TYPES.contains(&essence.as_str())
}
