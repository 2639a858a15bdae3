use std::sync::Arc;

use axum::{Extension, Json, extract::Path, extract::State};

use crate::AppState;
use crate::models::{Document, DocumentListItem};
use crate::utils::ApiResult;

/// List the caller's analyzed documents, newest first
#[utoipa::path(
    get,
    path = "/api/documents",
    responses(
        (status = 200, description = "Document history", body = Vec<DocumentListItem>)
    ),
    security(("bearer_auth" = [])),
    tag = "Documents"
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<i64>,
) -> ApiResult<Json<Vec<DocumentListItem>>> {
    let docs = state.document_service.list_documents(user_id).await?;
    tracing::debug!("Listed {} documents for user {}", docs.len(), user_id);
    Ok(Json(docs))
}

/// Fetch one analyzed document with its full analysis text
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    responses(
        (status = 200, description = "Document detail", body = Document),
        (status = 404, description = "Document not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Documents"
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<i64>,
    Path(document_id): Path<String>,
) -> ApiResult<Json<Document>> {
    let doc = state.document_service.get_document(user_id, &document_id).await?;
    Ok(Json(doc))
}
