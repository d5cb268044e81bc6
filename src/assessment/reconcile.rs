//! Merges a raw assessment result into the state exposed to the reader.

use crate::ai::AssessmentResult;
use crate::utils::sentence::{char_len, ends_with_clause_terminator};

use super::trigger::AssessmentConfig;

/// Reader-facing view of one assessment round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub score: u8,
    pub feedback: String,
    pub improved_translation: Option<String>,
}

/// Decide whether the model's rewrite may be offered as a suggestion.
///
/// Score and feedback always pass through verbatim. The rewrite is only
/// surfaced when the model asked for one, the assessed text holds a finished
/// thought, and the rewrite does not run far past what the reader wrote.
pub fn reconcile(
    result: &AssessmentResult,
    assessed_text: &str,
    config: &AssessmentConfig,
) -> Reconciliation {
    let mut view = Reconciliation {
        score: result.score,
        feedback: result.feedback.clone(),
        improved_translation: None,
    };

    if result.new_translate {
        if let Some(translation) = &result.translation {
            let has_complete =
                ends_with_clause_terminator(assessed_text) || assessed_text.contains('.');
            let reasonable_length = char_len(translation) as f32
                <= char_len(assessed_text) as f32 * config.suggestion_length_ratio;
            if has_complete && reasonable_length {
                view.improved_translation = Some(translation.clone());
            }
        }
    }

    view
}
