use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::ai::{AiAssistantInterface, OpenAiAssistant};
use crate::assessment::TranslationSession;
use crate::config::Config;
use crate::content::ContentStore;
use crate::db::Database;
use crate::drafts::DraftStore;
use crate::favorites::FavoriteStore;
use crate::stories::StoryStore;
use crate::translate::{GoogleTranslator, TranslatorInterface};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub assistant: Arc<dyn AiAssistantInterface>,
    pub translator: Arc<dyn TranslatorInterface>,
    pub stories: Arc<StoryStore>,
    pub content: Arc<ContentStore>,
    pub favorites: Arc<FavoriteStore>,
    pub drafts: Arc<DraftStore>,
    pub sessions: Arc<DashMap<String, TranslationSession>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let assistant: Arc<dyn AiAssistantInterface> =
            Arc::new(OpenAiAssistant::from_config(&config.openai_config)?);
        let translator: Arc<dyn TranslatorInterface> =
            Arc::new(GoogleTranslator::from_config(&config.translate_config)?);
        Self::with_clients(config, assistant, translator)
    }

    /// Build state around explicitly provided external clients.
    pub fn with_clients(
        config: Config,
        assistant: Arc<dyn AiAssistantInterface>,
        translator: Arc<dyn TranslatorInterface>,
    ) -> anyhow::Result<Self> {
        let db = Arc::new(Database::open(&config.system_config.data_dir)?);
        Ok(Self {
            config,
            assistant,
            translator,
            stories: Arc::new(StoryStore::new(db.clone())),
            content: Arc::new(ContentStore::new(db.clone())),
            favorites: Arc::new(FavoriteStore::new(db.clone())),
            drafts: Arc::new(DraftStore::new(db)),
            sessions: Arc::new(DashMap::new()),
        })
    }

    pub fn generate_session_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
