//! Gating rules that decide when a draft translation is worth assessing.

use serde::{Deserialize, Serialize};

use crate::utils::sentence::{char_len, ends_with_clause_terminator, first_sentence, CLAUSE_TERMINATORS};

/// Thresholds for the assessment workflow. The values mirror the tuned
/// behavior of the production assistant; change with care.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Minimum candidate length (in characters) worth assessing.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    /// The candidate must reach this fraction of the original's first sentence.
    #[serde(default = "default_min_original_ratio")]
    pub min_original_ratio: f32,
    /// Growth since the last assessment that counts as a significant change.
    #[serde(default = "default_significant_growth")]
    pub significant_growth: usize,
    /// A suggested rewrite longer than this multiple of the candidate is dropped.
    #[serde(default = "default_suggestion_length_ratio")]
    pub suggestion_length_ratio: f32,
    /// Quiet period after the last qualifying keystroke before the call fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Upper bound on alternative phrasings exposed to the client.
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
}

fn default_min_chars() -> usize {
    10
}

fn default_min_original_ratio() -> f32 {
    0.4
}

fn default_significant_growth() -> usize {
    15
}

fn default_suggestion_length_ratio() -> f32 {
    1.5
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_max_alternatives() -> usize {
    2
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            min_original_ratio: default_min_original_ratio(),
            significant_growth: default_significant_growth(),
            suggestion_length_ratio: default_suggestion_length_ratio(),
            debounce_ms: default_debounce_ms(),
            max_alternatives: default_max_alternatives(),
        }
    }
}

/// Why an assessment was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AiModeDisabled,
    EmptyText,
    Unchanged,
    NoBoundary,
    TooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    Assess,
    Skip(SkipReason),
}

/// A keystroke only opens (or restarts) the debounce window when it lands on a
/// clause boundary.
pub fn is_qualifying_keystroke(text: &str) -> bool {
    text.chars()
        .last()
        .map(|c| CLAUSE_TERMINATORS.contains(&c))
        .unwrap_or(false)
}

/// Full gate sequence, evaluated when the debounce window closes.
pub fn evaluate(
    text: &str,
    last_assessed: &str,
    original_text: &str,
    ai_mode_enabled: bool,
    config: &AssessmentConfig,
) -> TriggerDecision {
    if !ai_mode_enabled {
        return TriggerDecision::Skip(SkipReason::AiModeDisabled);
    }
    if text.trim().is_empty() {
        return TriggerDecision::Skip(SkipReason::EmptyText);
    }
    if text == last_assessed {
        return TriggerDecision::Skip(SkipReason::Unchanged);
    }

    let ends_on_boundary = ends_with_clause_terminator(text);
    let significant_change = !last_assessed.is_empty()
        && (char_len(text) > char_len(last_assessed) + config.significant_growth
            || char_len(text) < char_len(last_assessed));
    if !ends_on_boundary && !significant_change {
        return TriggerDecision::Skip(SkipReason::NoBoundary);
    }

    // The candidate must carry enough of the original's first sentence for
    // feedback to be meaningful.
    let first_len = char_len(first_sentence(original_text));
    let len = char_len(text);
    let too_short = len < config.min_chars
        || (first_len > 0 && (len as f32) < first_len as f32 * config.min_original_ratio);
    if too_short {
        return TriggerDecision::Skip(SkipReason::TooShort);
    }

    TriggerDecision::Assess
}
