// Common test utilities and helpers

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::services::analysis::{AnalysisClient, AnalysisError, CompletionApi};
use crate::services::DocumentService;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create a shared-cache in-memory database so several pool connections see
/// the same data, for tests that need genuinely concurrent transactions.
/// `name` must be unique per test or state leaks between them.
pub async fn create_shared_test_db(name: &str) -> SqlitePool {
    let url = format!("sqlite:file:{}?mode=memory&cache=shared", name);
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&url)
        .await
        .expect("Failed to create shared test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn create_test_user(pool: &SqlitePool, email: &str, credits: i64) -> i64 {
    let result = sqlx::query("INSERT INTO users (email, password_hash, credits) VALUES (?, ?, ?)")
        .bind(email)
        .bind("$2b$12$test-hash")
        .bind(credits)
        .execute(pool)
        .await
        .expect("Failed to insert test user");
    result.last_insert_rowid()
}

pub async fn get_credits(pool: &SqlitePool, user_id: i64) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT credits FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read credits");
    row.0
}

pub async fn count_documents(pool: &SqlitePool, user_id: i64) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count documents");
    row.0
}

/// Scripted completion endpoint: replies with a fixed text or a fixed failure,
/// counting how many calls actually went out.
pub struct StubApi {
    script: Result<String, AnalysisError>,
    pub calls: AtomicUsize,
}

impl StubApi {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { script: Ok(text.to_string()), calls: AtomicUsize::new(0) })
    }

    pub fn failing(err: AnalysisError) -> Arc<Self> {
        Arc::new(Self { script: Err(err), calls: AtomicUsize::new(0) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionApi for StubApi {
    async fn complete(&self, _model: &str, _document_text: &str) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Ok(text) => Ok(text.clone()),
            Err(AnalysisError::Timeout(secs)) => Err(AnalysisError::Timeout(*secs)),
            Err(AnalysisError::Upstream(msg)) => Err(AnalysisError::Upstream(msg.clone())),
            Err(AnalysisError::EmptyResponse) => Err(AnalysisError::EmptyResponse),
            Err(AnalysisError::EmptyDocument) => Err(AnalysisError::EmptyDocument),
        }
    }
}

pub fn document_service_with(pool: SqlitePool, api: Arc<StubApi>) -> DocumentService {
    DocumentService::new(pool, Arc::new(AnalysisClient::new(api)))
}
