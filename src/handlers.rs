use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::assessment::{AlternativesOutcome, AssistantView, TranslationSession};
use crate::drafts::{anonymous_user_id, TranslationDraft};
use crate::error::{Error, Result};
use crate::state::AppState;
use crate::stories::{NewStory, Story, StoryPatch, TranslationUpdate};
use crate::translate::TranslateRequest;

pub async fn health_check(State(_state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Stories

#[derive(Debug, Deserialize)]
pub struct StoriesQuery {
    pub search: Option<String>,
    pub limit: Option<usize>,
}

pub async fn list_stories(
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Result<Json<Value>> {
    if let Some(term) = query.search {
        let stories = state.stories.search(&term)?;
        return Ok(Json(json!({ "stories": stories })));
    }
    if let Some(limit) = query.limit {
        let page = state.stories.list_page(limit)?;
        return Ok(Json(json!({ "stories": page.stories, "hasMore": page.has_more })));
    }
    let stories = state.stories.get_all()?;
    Ok(Json(json!({ "stories": stories })))
}

#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    #[serde(flatten)]
    pub story: NewStory,
    #[serde(default)]
    pub translations: Vec<TranslationUpdate>,
}

pub async fn create_story(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoryRequest>,
) -> Result<Json<Story>> {
    let story = state
        .stories
        .create_with_translations(payload.story, payload.translations)?;
    Ok(Json(story))
}

pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let story = state.stories.get_required(&id)?;
    let translations = state.stories.translations_for(&id)?;
    Ok(Json(json!({ "story": story, "translations": translations })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoryRequest {
    #[serde(flatten)]
    pub patch: StoryPatch,
    #[serde(default)]
    pub translations: Vec<TranslationUpdate>,
}

pub async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStoryRequest>,
) -> Result<Json<Story>> {
    let story = state.stories.update(&id, payload.patch, payload.translations)?;
    Ok(Json(story))
}

pub async fn delete_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.stories.delete(&id)?;
    Ok(Json(json!({ "status": "ok" })))
}

#[derive(Debug, Deserialize)]
pub struct TranslationsQuery {
    pub language: Option<String>,
}

pub async fn get_story_translations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TranslationsQuery>,
) -> Result<Json<Value>> {
    match query.language {
        Some(language) => {
            let translation = state.stories.translation_for(&id, &language)?;
            Ok(Json(json!({ "translation": translation })))
        }
        None => {
            let translations = state.stories.translations_for(&id)?;
            Ok(Json(json!({ "translations": translations })))
        }
    }
}

pub async fn add_story_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TranslationUpdate>,
) -> Result<Json<Value>> {
    state.stories.get_required(&id)?;
    let translation = state.stories.add_translation(&id, payload)?;
    Ok(Json(json!(translation)))
}

// Favorites

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: Option<String>,
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Json<Value>> {
    let user_id = payload
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput("You must be logged in to favorite stories".to_string()))?;

    state.stories.get_required(&story_id)?;
    let is_favorite = state.favorites.toggle(&user_id, &story_id)?;
    Ok(Json(json!({ "isFavorite": is_favorite })))
}

pub async fn list_favorite_stories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let favorite_ids = state.favorites.get(&user_id)?;
    let stories: Vec<Story> = state
        .stories
        .get_all()?
        .into_iter()
        .filter(|story| favorite_ids.contains(&story.id))
        .collect();
    Ok(Json(json!({ "stories": stories })))
}

// Banners and quotes

pub async fn list_banners(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(json!({ "banners": state.content.get_all_banners()? })))
}

pub async fn create_banner(
    State(state): State<AppState>,
    Json(payload): Json<crate::content::NewBanner>,
) -> Result<Json<crate::content::Banner>> {
    Ok(Json(state.content.create_banner(payload)?))
}

pub async fn get_active_banner(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(json!({ "banner": state.content.get_active_banner()? })))
}

pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<crate::content::BannerPatch>,
) -> Result<Json<crate::content::Banner>> {
    Ok(Json(state.content.update_banner(&id, payload)?))
}

pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.content.delete_banner(&id)?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn list_quotes(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(json!({ "quotes": state.content.get_all_quotes()? })))
}

pub async fn create_quote(
    State(state): State<AppState>,
    Json(payload): Json<crate::content::NewQuote>,
) -> Result<Json<crate::content::Quote>> {
    Ok(Json(state.content.create_quote(payload)?))
}

pub async fn get_active_quote(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(json!({ "quote": state.content.get_active_quote()? })))
}

pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<crate::content::QuotePatch>,
) -> Result<Json<crate::content::Quote>> {
    Ok(Json(state.content.update_quote(&id, payload)?))
}

pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.content.delete_quote(&id)?;
    Ok(Json(json!({ "status": "ok" })))
}

// Word/phrase translation

pub async fn translate_text(
    State(state): State<AppState>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<Value>> {
    if payload.text.trim().is_empty() {
        return Err(Error::InvalidInput("Missing text to translate".to_string()));
    }

    match state.translator.translate(&payload).await {
        Ok(response) => Ok(Json(json!(response))),
        Err(err) => {
            warn!("Translation call failed: {}", err);
            Err(Error::External("Error translating text".to_string()))
        }
    }
}

// Translation drafts

#[derive(Debug, Deserialize)]
pub struct DraftOwner {
    pub user_id: Option<String>,
    pub client_origin: Option<String>,
}

impl DraftOwner {
    /// Signed-in readers are identified by their account id; everyone else by
    /// a pseudonymous id derived from the client origin.
    fn resolve(self) -> String {
        match self.user_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => anonymous_user_id(self.client_origin.as_deref().unwrap_or("unknown")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    #[serde(flatten)]
    pub owner: DraftOwner,
    pub content: String,
    pub language: String,
}

pub async fn save_draft(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
    Json(payload): Json<SaveDraftRequest>,
) -> Result<Json<Value>> {
    if payload.content.trim().is_empty() {
        return Err(Error::InvalidInput("Draft content is empty".to_string()));
    }

    let story = state.stories.get_required(&story_id)?;
    if payload.language == story.original_language {
        return Err(Error::InvalidInput(
            "A draft must target a language different from the story's original language"
                .to_string(),
        ));
    }

    let owner = payload.owner.resolve();
    let id = state
        .drafts
        .save(&story_id, &owner, payload.content, payload.language, Utc::now())?;
    Ok(Json(json!({ "id": id })))
}

pub async fn list_drafts(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
    Query(owner): Query<DraftOwner>,
) -> Result<Json<Vec<TranslationDraft>>> {
    let owner = owner.resolve();
    Ok(Json(state.drafts.list(&story_id, &owner)?))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path((story_id, draft_id)): Path<(String, String)>,
    Query(owner): Query<DraftOwner>,
) -> Result<Json<TranslationDraft>> {
    let owner = owner.resolve();
    state
        .drafts
        .get(&story_id, &owner, &draft_id)?
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("Draft {}", draft_id)))
}

pub async fn delete_draft(
    State(state): State<AppState>,
    Path((story_id, draft_id)): Path<(String, String)>,
    Query(owner): Query<DraftOwner>,
) -> Result<Json<Value>> {
    let owner = owner.resolve();
    state.drafts.delete(&story_id, &owner, &draft_id)?;
    Ok(Json(json!({ "status": "ok" })))
}

// Translation sessions

fn session(state: &AppState, id: &str) -> Result<TranslationSession> {
    state
        .sessions
        .get(id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| Error::NotFound(format!("Session {}", id)))
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub story_id: String,
    pub translation_language: String,
    pub user_id: Option<String>,
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<Value>> {
    let story = state.stories.get_required(&payload.story_id)?;
    if payload.translation_language == story.original_language {
        return Err(Error::InvalidInput(
            "Translations must target a language different from the one shown as source"
                .to_string(),
        ));
    }

    let id = state.generate_session_id();
    let session = TranslationSession::new(
        id.clone(),
        story.id.clone(),
        payload.user_id.filter(|user| !user.trim().is_empty()),
        story.original_story.clone(),
        story.original_language.clone(),
        payload.translation_language,
        state.config.assessment_config.clone(),
        state.assistant.clone(),
    );
    let view = session.view().await;
    state.sessions.insert(id.clone(), session);
    Ok(Json(json!({ "sessionId": id, "view": view })))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let session = session(&state, &id)?;
    Ok(Json(json!({
        "sessionId": session.id(),
        "storyId": session.story_id(),
        "translationLanguage": session.translation_language(),
        "view": session.view().await,
    })))
}

pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.sessions.remove(&id);
    Ok(Json(json!({ "status": "ok" })))
}

#[derive(Debug, Deserialize)]
pub struct SessionInput {
    pub text: String,
}

pub async fn session_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SessionInput>,
) -> Result<Json<AssistantView>> {
    let session = session(&state, &id)?;
    session.handle_text_change(payload.text).await;
    Ok(Json(session.view().await))
}

#[derive(Debug, Deserialize)]
pub struct AiModeRequest {
    pub enabled: bool,
}

pub async fn set_ai_mode(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AiModeRequest>,
) -> Result<Json<AssistantView>> {
    let session = session(&state, &id)?;
    if payload.enabled && session.user_id().is_none() {
        return Err(Error::InvalidInput(
            "You need to be logged in to use AI mode".to_string(),
        ));
    }
    session.set_ai_mode(payload.enabled).await;
    Ok(Json(session.view().await))
}

pub async fn refresh_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AssistantView>> {
    let session = session(&state, &id)?;
    session.force_assessment().await;
    Ok(Json(session.view().await))
}

pub async fn generate_alternatives(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AlternativesOutcome>> {
    let session = session(&state, &id)?;
    Ok(Json(session.generate_alternatives().await))
}

#[derive(Debug, Deserialize)]
pub struct ApplyAlternativeRequest {
    pub alternative: String,
}

pub async fn apply_alternative(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ApplyAlternativeRequest>,
) -> Result<Json<AssistantView>> {
    let session = session(&state, &id)?;
    session.apply_alternative(payload.alternative).await;
    Ok(Json(session.view().await))
}

pub async fn apply_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AssistantView>> {
    let session = session(&state, &id)?;
    if session.apply_improved_translation().await.is_none() {
        return Err(Error::InvalidInput(
            "No suggested translation is available".to_string(),
        ));
    }
    Ok(Json(session.view().await))
}

pub async fn autocomplete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let session = session(&state, &id)?;
    let translation = session.autocomplete().await;
    Ok(Json(json!({ "translation": translation })))
}
