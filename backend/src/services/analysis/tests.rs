//! Analysis Pipeline Unit Tests
//!
//! Covers the extraction ladder, the keyword fallback, risk tier derivation,
//! the model registry, and the client pipeline against a scripted API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::*;

// ============================================================================
// Scripted completion API
// ============================================================================

enum Script {
    Reply(&'static str),
    Timeout,
    Upstream(&'static str),
    Empty,
}

struct ScriptedApi {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self { script, calls: AtomicUsize::new(0) })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionApi for ScriptedApi {
    async fn complete(&self, _model: &str, _document_text: &str) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(text) => Ok(text.to_string()),
            Script::Timeout => Err(AnalysisError::Timeout(25)),
            Script::Upstream(msg) => Err(AnalysisError::Upstream(msg.to_string())),
            Script::Empty => Err(AnalysisError::EmptyResponse),
        }
    }
}

// ============================================================================
// Extractor: pattern ladder
// ============================================================================

mod pattern_tests {
    use super::*;

    #[test]
    fn test_score_label() {
        let result = extract("Numerical Score: 85\nRisk Level: LOW");
        assert_eq!(result.score, 85);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_rating_out_of_100() {
        let result = extract("Overall rating: 62/100 for this agreement");
        assert_eq!(result.score, 62);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_bracketed_score() {
        let result = extract("Final score [38] after all deductions");
        assert_eq!(result.score, 38);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_bare_fraction() {
        // No "score:" label anywhere; the bare N/100 pattern is last in line
        let result = extract("The contract earns 72/100 overall.");
        assert_eq!(result.score, 72);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_precedence_score_label_beats_fraction() {
        // Both forms present; the labelled form is earlier in precedence
        let result = extract("score: 90 ... but one section got 10/100");
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_case_insensitive_label() {
        assert_eq!(extract("SCORE: 55").score, 55);
        assert_eq!(extract("Score: 55").score, 55);
    }

    #[test]
    fn test_out_of_range_falls_through_to_next_pattern() {
        // "score: 250" is out of range; the bare fraction still applies
        let result = extract("score: 250 is nonsense, realistically 60/100");
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert_eq!(extract("score: 0").score, 0);
        assert_eq!(extract("score: 100").score, 100);
    }

    #[test]
    fn test_idempotent() {
        let text = "Numerical Score: 47\nsome trailing analysis";
        let first = extract(text);
        let second = extract(text);
        assert_eq!(first, second);
    }
}

// ============================================================================
// Extractor: keyword fallback
// ============================================================================

mod fallback_tests {
    use super::*;

    #[test]
    fn test_baseline_without_keywords() {
        // No numeric pattern, no phrases: baseline 75
        let result = extract("This reply ignores the requested format entirely.");
        assert_eq!(result.score, 75);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_one_high_one_low_phrase() {
        // 75 - 15 + 5 = 65
        let result = extract("There is a major risk here, though terms are well balanced.");
        assert_eq!(result.score, 65);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_presence_not_frequency() {
        // "major risk" appears three times but deducts once
        let score =
            keyword_score("major risk, major risk, and again major risk");
        assert_eq!(score, 60);
    }

    #[test]
    fn test_all_high_risk_phrases_clamped() {
        // 75 - 4*15 = 15, plus mediums pushes below zero; clamp holds at 0
        let text = "serious concern highly unfair major risk significant issues \
                    moderate concern potential issue some risk minor issues";
        assert_eq!(keyword_score(text), 0);
    }

    #[test]
    fn test_all_reassuring_phrases_clamped_high() {
        // 75 + 4*5 = 95, stays within range
        let text = "minimal risk, fair terms, well balanced, clear language";
        assert_eq!(keyword_score(text), 95);
    }

    #[test]
    fn test_case_insensitive_phrases() {
        assert_eq!(keyword_score("MAJOR RISK detected"), 60);
    }

    #[test]
    fn test_medium_phrase_weight() {
        // 75 - 7 = 68
        assert_eq!(keyword_score("a potential issue was noted"), 68);
    }
}

// ============================================================================
// Risk tier derivation
// ============================================================================

mod risk_level_tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(41), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(71), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
    }

    #[test]
    fn test_tier_is_pure_function_of_score() {
        // Re-deriving from every reachable score matches the stored tier
        for score in 0..=100u8 {
            let text = format!("score: {}", score);
            let result = extract(&text);
            assert_eq!(result.risk_level, RiskLevel::from_score(result.score));
        }
    }

    #[test]
    fn test_model_stated_risk_level_is_ignored() {
        // The model claims LOW but the score says otherwise; the derived tier wins
        let result = extract("Numerical Score: 20\nRisk Level: LOW");
        assert_eq!(result.score, 20);
        assert_eq!(result.risk_level, RiskLevel::High);
    }
}

// ============================================================================
// Model registry
// ============================================================================

mod registry_tests {
    use super::*;

    #[test]
    fn test_known_model_resolves() {
        assert_eq!(resolve_model("geminiPro"), "google/gemini-2.0-pro-exp-02-05:free");
    }

    #[test]
    fn test_unknown_model_resolves_to_default() {
        assert_eq!(resolve_model("does-not-exist"), DEFAULT_MODEL);
        assert_eq!(resolve_model(""), DEFAULT_MODEL);
    }

    #[test]
    fn test_available_models_not_empty() {
        let models = available_models();
        assert!(!models.is_empty());
        assert!(models.iter().any(|m| m.id == "geminiPro"));
    }
}

// ============================================================================
// Text cleanup
// ============================================================================

mod cleanup_tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(clean_document_text("a   b\t\tc"), "a b c");
    }

    #[test]
    fn test_removes_blank_lines() {
        assert_eq!(clean_document_text("line one\n\n\nline two\n"), "line one line two");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(clean_document_text("  padded  "), "padded");
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert_eq!(clean_document_text(" \n \t "), "");
    }
}

// ============================================================================
// Client pipeline
// ============================================================================

mod client_tests {
    use super::*;

    #[test]
    fn test_openrouter_client_builds_with_configured_timeout() {
        // Construction must not fall back to a deadline-less client
        let config = crate::config::AnalysisConfig::default();
        assert_eq!(config.timeout_secs, 25);
        let _client = OpenRouterClient::new(config);
    }

    #[tokio::test]
    async fn test_successful_analysis() {
        let api = ScriptedApi::new(Script::Reply("Numerical Score: 85\nRisk Level: LOW"));
        let client = AnalysisClient::new(api.clone());

        let analysis = client.analyze("This Agreement is made...", "geminiPro").await.unwrap();
        assert_eq!(analysis.score, 85);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_document_rejected_before_any_call() {
        let api = ScriptedApi::new(Script::Reply("unreachable"));
        let client = AnalysisClient::new(api.clone());

        let err = client.analyze("   \n\n  ", "geminiPro").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyDocument));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_propagates() {
        let api = ScriptedApi::new(Script::Timeout);
        let client = AnalysisClient::new(api);

        let err = client.analyze("some contract text", "geminiPro").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout(25)));
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let api = ScriptedApi::new(Script::Upstream("Bad Gateway"));
        let client = AnalysisClient::new(api);

        let err = client.analyze("some contract text", "geminiPro").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_malformed_reply_uses_fallback() {
        // Reply without any numeric pattern degrades to the keyword heuristic
        let api = ScriptedApi::new(Script::Reply(
            "There is a major risk here, though terms are well balanced.",
        ));
        let client = AnalysisClient::new(api);

        let analysis = client.analyze("some contract text", "geminiPro").await.unwrap();
        assert_eq!(analysis.score, 65);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_no_automatic_retry() {
        let api = ScriptedApi::new(Script::Empty);
        let client = AnalysisClient::new(api.clone());

        let err = client.analyze("some contract text", "geminiPro").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
        assert_eq!(api.call_count(), 1);
    }
}
