//! Credit & Persistence Coordinator
//!
//! One analysis request walks: credit check -> analysis call -> persist result
//! -> deduct credit. The persist and deduct steps share a transaction with a
//! conditional decrement, so a credit is only ever spent alongside a committed
//! result row and concurrent requests from one account cannot over-spend.

use std::sync::Arc;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{AnalyzeResponse, Document, DocumentListItem, DocumentStatus};
use crate::services::analysis::AnalysisClient;
use crate::utils::{ApiError, ApiResult};

#[derive(Clone)]
pub struct DocumentService {
    pool: SqlitePool,
    analysis: Arc<AnalysisClient>,
}

impl DocumentService {
    pub fn new(pool: SqlitePool, analysis: Arc<AnalysisClient>) -> Self {
        Self { pool, analysis }
    }

    /// Run one analysis for an account, end to end.
    ///
    /// Failure behavior:
    /// - missing account or zero credits: fails before any outbound call
    /// - analysis failure: propagated; no row written, no credit touched
    /// - storage failure after a successful analysis: `PersistenceError`,
    ///   transaction rolled back, credit untouched (the analysis text is lost;
    ///   the caller may resubmit)
    pub async fn run_analysis(
        &self,
        user_id: i64,
        content: &str,
        filename: &str,
        model_id: &str,
    ) -> ApiResult<AnalyzeResponse> {
        // Precondition: no analysis spend without available credits
        let credits: Option<(i64,)> = sqlx::query_as("SELECT credits FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        let credits = credits.map(|(c,)| c).ok_or(ApiError::UserNotFound)?;
        if credits <= 0 {
            tracing::info!("Rejecting analysis for user {}: no credits remaining", user_id);
            return Err(ApiError::InsufficientCredits);
        }

        let analysis = self.analysis.analyze(content, model_id).await?;

        // Persist the result row and spend the credit atomically. The
        // conditional decrement re-checks the balance, so two requests that
        // both passed the read above cannot both commit on a balance of one.
        let document_id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await.map_err(ApiError::persistence_error)?;

        {
            let conn = tx.as_mut();
            sqlx::query(
                r#"
                INSERT INTO documents
                    (id, user_id, filename, status, analysis_results, risk_level, score, model_used)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&document_id)
            .bind(user_id)
            .bind(filename)
            .bind(DocumentStatus::Completed.as_str())
            .bind(&analysis.raw_text)
            .bind(analysis.risk_level.as_str())
            .bind(analysis.score as i64)
            .bind(model_id)
            .execute(conn)
            .await
            .map_err(ApiError::persistence_error)?;
        }

        let affected = {
            let conn = tx.as_mut();
            sqlx::query(
                "UPDATE users SET credits = credits - 1, updated_at = CURRENT_TIMESTAMP \
                 WHERE id = ? AND credits > 0",
            )
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(ApiError::persistence_error)?
            .rows_affected()
        };

        if affected == 0 {
            // A concurrent request spent the last credit between the
            // precondition read and this decrement.
            tx.rollback().await.map_err(ApiError::persistence_error)?;
            tracing::warn!("Credit balance exhausted mid-analysis for user {}", user_id);
            return Err(ApiError::InsufficientCredits);
        }

        tx.commit().await.map_err(ApiError::persistence_error)?;

        let remaining = self.remaining_credits(user_id).await?;
        tracing::info!(
            "Stored analysis {} for user {} (score={}, risk={}, {} credits left)",
            document_id,
            user_id,
            analysis.score,
            analysis.risk_level.as_str(),
            remaining
        );

        Ok(AnalyzeResponse { success: true, document_id, remaining_credits: remaining })
    }

    pub async fn list_documents(&self, user_id: i64) -> ApiResult<Vec<DocumentListItem>> {
        let docs: Vec<Document> =
            sqlx::query_as("SELECT * FROM documents WHERE user_id = ? ORDER BY created_at DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(docs.into_iter().map(DocumentListItem::from).collect())
    }

    /// Fetch one document; owner-scoped, so another account's id reads as absent.
    pub async fn get_document(&self, user_id: i64, document_id: &str) -> ApiResult<Document> {
        sqlx::query_as("SELECT * FROM documents WHERE id = ? AND user_id = ?")
            .bind(document_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Document {}", document_id)))
    }

    async fn remaining_credits(&self, user_id: i64) -> ApiResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT credits FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
