use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use super::interface::{AiAssistantInterface, AssessmentRequest, AssessmentResult};
use super::prompts::{ALTERNATIVE_TRANSLATIONS_PROMPT, TRANSLATION_ASSESSMENT_PROMPT};
use crate::config::OpenAiConfig;

const MAX_TOKENS: u32 = 500;

/// Chat-completions client for the assessment, alternatives, and autocomplete
/// calls.
pub struct OpenAiAssistant {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAssistant {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        info!("Initialized OpenAiAssistant: model={}, base_url={}", model, base_url);
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        Ok(Self::new(
            config.base_url.clone(),
            config.model.clone(),
            config.resolve_api_key()?,
        ))
    }

    fn user_message(request: &AssessmentRequest, instruction: &str) -> String {
        format!(
            "Original text ({}): {}\nUser translation ({}): {}\n\n{}",
            request.source_language,
            request.original_text,
            request.target_language,
            request.user_translation,
            instruction,
        )
    }

    async fn chat_completion(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        json_response: bool,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": temperature,
            "max_tokens": MAX_TOKENS,
        });
        if json_response {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await?;
        if !status.is_success() {
            let message = payload
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("chat completion failed");
            anyhow::bail!("OpenAI API error ({}): {}", status, message);
        }

        payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("No content in chat completion response"))
    }
}

#[async_trait]
impl AiAssistantInterface for OpenAiAssistant {
    async fn assess_translation(&self, request: &AssessmentRequest) -> Result<AssessmentResult> {
        let user = Self::user_message(
            request,
            "Evaluate this translation and provide the JSON response as specified.",
        );
        let content = self
            .chat_completion(TRANSLATION_ASSESSMENT_PROMPT, &user, 0.3, true)
            .await?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(AssessmentResult::from_json(&value))
    }

    async fn alternative_translations(&self, request: &AssessmentRequest) -> Result<Vec<String>> {
        let user = Self::user_message(
            request,
            "Please provide exactly 2 alternative translations only for the part that the user has translated.",
        );
        let content = self
            .chat_completion(ALTERNATIVE_TRANSLATIONS_PROMPT, &user, 0.7, true)
            .await?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(value
            .get("alternatives")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn complete_translation(&self, request: &AssessmentRequest) -> Result<String> {
        let system = format!(
            "You are an expert language translator from {} to {}. Complete the partial \
             translation provided by the user in a natural way, preserving the meaning from \
             the original text. Only provide the completed translation.",
            request.source_language, request.target_language,
        );
        let user = Self::user_message(request, "Please complete the translation in a natural way.");
        self.chat_completion(&system, &user, 0.3, false).await
    }
}
