use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Risk tier. Derived solely from the final numeric score; any risk level the
/// model states in its reply text is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Tier boundaries: 0-40 high, 41-70 medium, 71-100 low.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=40 => Self::High,
            41..=70 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Completed analysis: the model's raw reply plus the structured extraction.
/// Immutable once computed; score and risk_level are deterministic in raw_text.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub raw_text: String,
    pub score: u8,
    pub risk_level: RiskLevel,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Hard deadline exceeded; the in-flight request was aborted, not retried
    #[error("Analysis timed out after {0}s")]
    Timeout(u64),

    /// Non-success HTTP status or undecodable response body
    #[error("Upstream API error: {0}")]
    Upstream(String),

    /// Response decoded but carried no usable completion text
    #[error("Upstream response contained no completion text")]
    EmptyResponse,

    /// Nothing left after whitespace cleanup
    #[error("Document text is empty")]
    EmptyDocument,
}

// ============================================================================
// Wire types for the chat-completions response
// ============================================================================

// Every field is defaulted: the body is parsed defensively and a missing piece
// becomes EmptyResponse rather than a decode error.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    #[serde(default)]
    pub message: ChatMessage,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}
