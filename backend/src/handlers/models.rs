use axum::Json;

use crate::services::analysis::{ModelInfo, available_models};

/// List the analysis models clients may select
#[utoipa::path(
    get,
    path = "/api/models",
    responses(
        (status = 200, description = "Available models", body = Vec<ModelInfo>)
    ),
    tag = "Analysis"
)]
pub async fn list_models() -> Json<Vec<ModelInfo>> {
    Json(available_models())
}
