use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Lifecycle of an analysis record. Rows are written only on completion today;
/// pending/failed exist for future re-analysis support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Persisted analysis record. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: String,
    pub user_id: i64,
    pub filename: String,
    pub status: String,
    pub analysis_results: Option<String>,
    pub risk_level: Option<String>,
    pub score: Option<i64>,
    pub model_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing view without the full analysis text
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentListItem {
    pub id: String,
    pub filename: String,
    pub status: String,
    pub risk_level: Option<String>,
    pub score: Option<i64>,
    pub model_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentListItem {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename,
            status: doc.status,
            risk_level: doc.risk_level,
            score: doc.score,
            model_used: doc.model_used,
            created_at: doc.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub document_id: String,
    pub remaining_credits: i64,
}
