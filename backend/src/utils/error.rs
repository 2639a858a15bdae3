use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::analysis::AnalysisError;

/// API Error with rich context and automatic error trait implementations
///
/// Design: Uses thiserror for ergonomic error handling with context.
/// Every failure path maps to a distinct, non-overlapping user-facing message so
/// callers can tell "try again later" from "buy more credits" from "contact support".
#[derive(Error, Debug)]
pub enum ApiError {
    // Authentication errors 1xxx
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Account errors 2xxx
    #[error("User not found")]
    UserNotFound,

    #[error("No credits remaining. Please upgrade to get more credits.")]
    InsufficientCredits,

    // Resource errors 3xxx
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    // Validation errors 4xxx
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Analysis pipeline errors 5xxx
    #[error("Analysis took too long. Please try with a shorter document or contact support.")]
    AnalysisTimeout,

    #[error("Analysis service error: {0}")]
    UpstreamError(String),

    #[error("Analysis service returned an empty response")]
    EmptyAnalysis,

    #[error("Failed to save analysis results: {0}")]
    PersistenceError(String),

    // System errors 5xxx
    #[error("Internal error: {0}")]
    InternalError(String),

    // Database errors - auto-convert from sqlx::Error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Generic wrapper for other errors - auto-convert from anyhow::Error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Helper to create unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Helper to create invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    /// Helper to create internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// Helper to create invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Helper to create not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound(message.into())
    }

    /// Helper to create validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Helper to create persistence error (storage failure after spend-worthy work)
    pub fn persistence_error(err: impl std::fmt::Display) -> Self {
        Self::PersistenceError(err.to_string())
    }

    /// Get stable error code
    pub fn error_code(&self) -> i32 {
        match self {
            // Authentication errors 1xxx
            Self::Unauthorized(_) => 1001,
            Self::TokenExpired => 1002,
            Self::InvalidCredentials => 1003,

            // Account errors 2xxx
            Self::UserNotFound => 2001,
            Self::InsufficientCredits => 2002,

            // Resource errors 3xxx
            Self::ResourceNotFound(_) => 3001,

            // Validation errors 4xxx
            Self::ValidationError(_) => 4001,
            Self::InvalidInput(_) => 4002,

            // Analysis pipeline errors 51xx
            Self::AnalysisTimeout => 5101,
            Self::UpstreamError(_) => 5102,
            Self::EmptyAnalysis => 5103,
            Self::PersistenceError(_) => 5104,

            // System errors 5xxx
            Self::InternalError(_) => 5001,
            Self::Database(_) => 5002,
            Self::Other(_) => 5001,
        }
    }
}

/// Analysis client failures surface with their own variants so the HTTP layer can
/// keep the messages distinct.
impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Timeout(_) => ApiError::AnalysisTimeout,
            AnalysisError::Upstream(message) => ApiError::UpstreamError(message),
            AnalysisError::EmptyResponse => ApiError::EmptyAnalysis,
            AnalysisError::EmptyDocument => {
                ApiError::InvalidInput("No content provided".to_string())
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let message = self.to_string();

        let status = match code {
            1001..=1999 => StatusCode::UNAUTHORIZED,
            2001 => StatusCode::NOT_FOUND,
            2002 => StatusCode::FORBIDDEN,
            3001..=3999 => StatusCode::NOT_FOUND,
            4001..=4999 => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let response = ApiErrorResponse { code, error: message, details: None };

        (status, Json(response)).into_response()
    }
}

/// Implement From for serde_json::Error
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal_error(format!("JSON serialization error: {}", err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
