//! Score/Risk Extractor
//!
//! Recovers a numeric score from the model's free-text reply. Two tiers, strict
//! order: an ordered regex ladder over the formats the rubric requests, then a
//! presence-based keyword heuristic when no pattern yields an in-range value.

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::RiskLevel;

/// Structured result of parsing one reply. Deterministic in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub score: u8,
    pub risk_level: RiskLevel,
}

/// Numeric patterns in precedence order: "score: N", "rating: N/100",
/// "score [N]", bare "N/100". The first pattern whose captured value lies in
/// [0,100] wins; later patterns are not consulted.
static SCORE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)score:\s*(\d+)",
        r"(?i)rating:\s*(\d+)/100",
        r"(?i)score\s*\[(\d+)\]",
        r"(\d+)\s*/\s*100",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid score pattern"))
    .collect()
});

const BASELINE_SCORE: i32 = 75;

const HIGH_RISK_PHRASES: &[&str] =
    &["serious concern", "highly unfair", "major risk", "significant issues"];
const MEDIUM_RISK_PHRASES: &[&str] =
    &["moderate concern", "potential issue", "some risk", "minor issues"];
const LOW_RISK_PHRASES: &[&str] =
    &["minimal risk", "fair terms", "well balanced", "clear language"];

/// Parse a reply into a score and its derived risk tier.
pub fn extract(raw_text: &str) -> Extraction {
    let score = match_score_pattern(raw_text).unwrap_or_else(|| keyword_score(raw_text));
    Extraction { score, risk_level: RiskLevel::from_score(score) }
}

/// First tier: the regex ladder. A pattern that matches with an out-of-range
/// value falls through to the next pattern.
fn match_score_pattern(text: &str) -> Option<u8> {
    for pattern in SCORE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text)
            && let Some(m) = caps.get(1)
            && let Ok(score) = m.as_str().parse::<u32>()
            && score <= 100
        {
            return Some(score as u8);
        }
    }
    None
}

/// Second tier: keyword-weighted heuristic over fixed phrase tables.
///
/// Starts at 75; subtracts 15 per high-risk phrase present, 7 per medium-risk
/// phrase, adds 5 per reassuring phrase. Presence per table entry, not
/// occurrence count. Clamped to [0,100].
pub fn keyword_score(text: &str) -> u8 {
    let lower = text.to_lowercase();
    let mut score = BASELINE_SCORE;

    for phrase in HIGH_RISK_PHRASES {
        if lower.contains(phrase) {
            score -= 15;
        }
    }
    for phrase in MEDIUM_RISK_PHRASES {
        if lower.contains(phrase) {
            score -= 7;
        }
    }
    for phrase in LOW_RISK_PHRASES {
        if lower.contains(phrase) {
            score += 5;
        }
    }

    score.clamp(0, 100) as u8
}
