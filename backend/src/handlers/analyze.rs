use std::sync::Arc;

use axum::{Extension, Json, extract::Multipart, extract::State};

use crate::AppState;
use crate::models::AnalyzeResponse;
use crate::services::analysis::DEFAULT_MODEL;
use crate::services::text_extractor;
use crate::utils::{ApiError, ApiResult};

/// Submit a contract for analysis
///
/// Accepts either a `content` text field or an uploaded `file` (PDF, DOC/DOCX,
/// TXT). A `model` field selects the analysis model by its short id; unknown
/// ids fall back to the default. One credit is spent per successful analysis.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis stored", body = AnalyzeResponse),
        (status = 400, description = "No content provided"),
        (status = 403, description = "No credits remaining"),
    ),
    security(("bearer_auth" = [])),
    tag = "Analysis"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<i64>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let mut content: Option<String> = None;
    let mut filename = "pasted-text.txt".to_string();
    let mut model = DEFAULT_MODEL.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_data(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "content" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::invalid_data(format!("Unreadable content field: {}", e)))?;
                if !text.is_empty() {
                    content = Some(text);
                }
            },
            "filename" => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| ApiError::invalid_data(format!("Unreadable filename field: {}", e)))?;
                if !name.is_empty() {
                    filename = name;
                }
            },
            "model" => {
                let id = field
                    .text()
                    .await
                    .map_err(|e| ApiError::invalid_data(format!("Unreadable model field: {}", e)))?;
                if !id.is_empty() {
                    model = id;
                }
            },
            "file" => {
                let upload_name = field.file_name().unwrap_or("upload.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_data(format!("Unreadable file upload: {}", e)))?;
                content = Some(text_extractor::extract_text(&upload_name, &bytes)?);
                filename = upload_name;
            },
            other => {
                tracing::debug!("Ignoring unknown multipart field: {}", other);
            },
        }
    }

    let content = content.ok_or_else(|| ApiError::invalid_data("No content provided"))?;

    tracing::info!(
        "Analysis request from user {} ({}, model: {}, {} chars)",
        user_id,
        filename,
        model,
        content.len()
    );

    let response = state.document_service.run_analysis(user_id, &content, &filename, &model).await?;
    Ok(Json(response))
}
