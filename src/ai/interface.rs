use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input shared by every AI-assisted translation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub original_text: String,
    pub user_translation: String,
    pub source_language: String,
    pub target_language: String,
}

/// Structured verdict returned by the assessment model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub score: u8,
    pub feedback: String,
    pub new_translate: bool,
    pub translation: Option<String>,
}

impl AssessmentResult {
    /// Neutral result substituted when the external call fails.
    pub fn failure(feedback: impl Into<String>) -> Self {
        Self {
            score: 0,
            feedback: feedback.into(),
            new_translate: false,
            translation: None,
        }
    }

    /// Lenient extraction from the model's JSON. Missing or malformed fields
    /// degrade to neutral values instead of failing the whole response.
    pub fn from_json(value: &Value) -> Self {
        Self {
            score: value.get("score").and_then(Value::as_u64).unwrap_or(0).min(100) as u8,
            feedback: value
                .get("feedback")
                .and_then(Value::as_str)
                .unwrap_or("No feedback provided")
                .to_string(),
            new_translate: value.get("new_translate").and_then(Value::as_bool).unwrap_or(false),
            translation: value.get("translation").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Interface to the AI translation assistant.
/// Implementations are injected where they are used; there is no process-wide
/// client instance.
#[async_trait]
pub trait AiAssistantInterface: Send + Sync {
    /// Score a candidate translation against the original text.
    async fn assess_translation(
        &self,
        request: &AssessmentRequest,
    ) -> Result<AssessmentResult, anyhow::Error>;

    /// Generate alternative phrasings for the translated portion.
    async fn alternative_translations(
        &self,
        request: &AssessmentRequest,
    ) -> Result<Vec<String>, anyhow::Error>;

    /// Complete a partial translation in a natural way.
    async fn complete_translation(
        &self,
        request: &AssessmentRequest,
    ) -> Result<String, anyhow::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_extracts_all_fields() {
        let value = json!({
            "score": 85,
            "feedback": "Good",
            "new_translate": true,
            "translation": "Der Hund rennt."
        });
        let result = AssessmentResult::from_json(&value);
        assert_eq!(result.score, 85);
        assert_eq!(result.feedback, "Good");
        assert!(result.new_translate);
        assert_eq!(result.translation.as_deref(), Some("Der Hund rennt."));
    }

    #[test]
    fn from_json_degrades_missing_fields_to_neutral() {
        let result = AssessmentResult::from_json(&json!({}));
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback, "No feedback provided");
        assert!(!result.new_translate);
        assert_eq!(result.translation, None);
    }

    #[test]
    fn from_json_clamps_out_of_range_scores() {
        let result = AssessmentResult::from_json(&json!({ "score": 250 }));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn null_translation_reads_as_absent() {
        let result = AssessmentResult::from_json(&json!({ "new_translate": true, "translation": null }));
        assert_eq!(result.translation, None);
    }
}
