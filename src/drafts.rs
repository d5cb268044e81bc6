//! Saved translation drafts, keyed by (user, story).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::Result;

const TRANSLATION_DRAFTS_PATH: &str = "translation_drafts";

/// A saved translation attempt. Drafts are append-only: saving always creates
/// a new draft, and there is no edit-in-place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationDraft {
    #[serde(default)]
    pub id: String,
    pub content: String,
    pub language: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DraftRecord {
    content: String,
    language: String,
    date: DateTime<Utc>,
}

/// Make a user id safe as a storage path segment. Characters the storage
/// layer reserves are substituted. Distinct raw ids can collide after
/// substitution and are then treated as the same draft owner.
pub fn sanitize_user_id(user_id: &str) -> String {
    user_id.replace(['.', '#', '$', '[', ']'], "_")
}

/// Pseudonymous id for readers who are not signed in, derived from the client
/// network origin.
pub fn anonymous_user_id(client_origin: &str) -> String {
    format!("anonymous_{}", client_origin.replace(['.', ':'], "_"))
}

#[derive(Clone)]
pub struct DraftStore {
    db: Arc<Database>,
}

impl DraftStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn prefix(user_id: &str, story_id: &str) -> String {
        format!("{}/{}/{}", TRANSLATION_DRAFTS_PATH, sanitize_user_id(user_id), story_id)
    }

    /// Append a new draft and return its generated id.
    pub fn save(
        &self,
        story_id: &str,
        user_id: &str,
        content: String,
        language: String,
        date: DateTime<Utc>,
    ) -> Result<String> {
        let record = DraftRecord { content, language, date };
        self.db.push(&Self::prefix(user_id, story_id), &record)
    }

    /// Every draft for (story, user), newest first.
    pub fn list(&self, story_id: &str, user_id: &str) -> Result<Vec<TranslationDraft>> {
        let mut drafts: Vec<TranslationDraft> = self
            .db
            .get_all::<DraftRecord>(&Self::prefix(user_id, story_id))?
            .into_iter()
            .map(|(id, record)| TranslationDraft {
                id,
                content: record.content,
                language: record.language,
                date: record.date,
            })
            .collect();
        drafts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(drafts)
    }

    pub fn get(
        &self,
        story_id: &str,
        user_id: &str,
        draft_id: &str,
    ) -> Result<Option<TranslationDraft>> {
        Ok(self
            .db
            .get::<DraftRecord>(&Self::prefix(user_id, story_id), draft_id)?
            .map(|record| TranslationDraft {
                id: draft_id.to_string(),
                content: record.content,
                language: record.language,
                date: record.date,
            }))
    }

    /// Delete a draft. Deleting an absent id is a no-op.
    pub fn delete(&self, story_id: &str, user_id: &str, draft_id: &str) -> Result<()> {
        self.db.remove(&Self::prefix(user_id, story_id), draft_id)
    }
}
