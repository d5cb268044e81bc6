use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use super::interface::{TranslateRequest, TranslateResponse, TranslatorInterface};
use crate::config::TranslateConfig;

/// Client for the hosted translation API (Google Translate v2 wire format).
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: String, api_key: String) -> Self {
        info!("Initialized GoogleTranslator: endpoint={}", endpoint);
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    pub fn from_config(config: &TranslateConfig) -> Result<Self> {
        Ok(Self::new(config.endpoint.clone(), config.resolve_api_key()?))
    }
}

#[async_trait]
impl TranslatorInterface for GoogleTranslator {
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let body = json!({
            "q": request.text,
            "source": request.source_language,
            "target": request.target_language,
            "format": "text",
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;
        if !status.is_success() {
            let message = payload
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("Translation failed");
            anyhow::bail!("Translate API error ({}): {}", status, message);
        }

        let translated = payload
            .get("data")
            .and_then(|d| d.get("translations"))
            .and_then(|t| t.get(0))
            .and_then(|t| t.get("translatedText"))
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("No translation in response"))?;

        Ok(TranslateResponse {
            original: request.text.clone(),
            translated: translated.to_string(),
        })
    }
}
