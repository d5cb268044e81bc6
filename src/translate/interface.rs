use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub original: String,
    pub translated: String,
}

/// Interface to the word/phrase machine translation service.
#[async_trait]
pub trait TranslatorInterface: Send + Sync {
    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, anyhow::Error>;
}
