use serde::Serialize;
use utoipa::ToSchema;

/// Fallback when a model identifier is unrecognized; absence never errors.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

/// Short identifiers exposed to clients mapped to the upstream provider's fully
/// qualified model strings.
const MODELS: &[(&str, &str)] = &[
    ("geminiPro", "google/gemini-2.0-pro-exp-02-05:free"),
    ("llama70b", "meta-llama/llama-3.3-70b-instruct:free"),
];

/// Resolve a short model identifier to the upstream model string.
/// Pure lookup; unknown identifiers resolve to [`DEFAULT_MODEL`].
pub fn resolve_model(model_id: &str) -> &'static str {
    MODELS
        .iter()
        .find(|(id, _)| *id == model_id)
        .map(|(_, upstream)| *upstream)
        .unwrap_or(DEFAULT_MODEL)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
}

/// Models selectable in the upload form
pub fn available_models() -> Vec<ModelInfo> {
    MODELS
        .iter()
        .map(|(id, upstream)| ModelInfo { id: id.to_string(), name: upstream.to_string() })
        .collect()
}
