//! Contract Analysis Pipeline
//!
//! Sends cleaned document text to an external chat-completion endpoint with a
//! fixed scoring rubric, then recovers a structured score and risk tier from the
//! model's free-text reply.
//!
//! # Architecture
//! ```text
//! document text ──▶ AnalysisClient ──▶ CompletionApi (trait) ──▶ OpenRouter
//!                        │
//!                        ▼
//!                   extractor (regex ladder + keyword fallback)
//!                        │
//!                        ▼
//!                 Analysis { raw_text, score, risk_level }
//! ```
//!
//! The upstream reply is best-effort structured text: the rubric requests a
//! "Numerical Score: N" block, but nothing guarantees the model follows it, so
//! extraction degrades through an ordered pattern list into a keyword heuristic
//! instead of failing outright.

mod client;
mod extractor;
mod models;
mod prompt;
mod registry;

pub use client::{AnalysisClient, CompletionApi, OpenRouterClient, clean_document_text};
pub use extractor::{Extraction, extract, keyword_score};
pub use models::{Analysis, AnalysisError, RiskLevel};
pub use registry::{DEFAULT_MODEL, ModelInfo, available_models, resolve_model};

#[cfg(test)]
mod tests;
