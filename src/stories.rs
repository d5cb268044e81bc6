//! Stories and their per-language translations.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{Error, Result};

const STORIES_PATH: &str = "stories";
const TRANSLATIONS_PATH: &str = "translations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub original_story: String,
    pub original_language: String,
    pub level: StoryLevel,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStory {
    pub title: String,
    pub original_story: String,
    pub original_language: String,
    pub level: StoryLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub id: String,
    pub original_id: String,
    pub language: String,
    pub story: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Translation payload for create/update, keyed by language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUpdate {
    pub language: String,
    pub story: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryPatch {
    pub title: Option<String>,
    pub original_story: Option<String>,
    pub original_language: Option<String>,
    pub level: Option<StoryLevel>,
}

#[derive(Debug, Serialize)]
pub struct StoryPage {
    pub stories: Vec<Story>,
    pub has_more: bool,
}

#[derive(Clone)]
pub struct StoryStore {
    db: Arc<Database>,
}

impl StoryStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create(&self, new: NewStory) -> Result<Story> {
        let now = Utc::now().to_rfc3339();
        let id = Database::generate_id();
        let story = Story {
            id: id.clone(),
            title: new.title,
            original_story: new.original_story,
            original_language: new.original_language,
            level: new.level,
            created_at: now.clone(),
            updated_at: now,
        };
        self.db.put(STORIES_PATH, &id, &story)?;
        Ok(story)
    }

    pub fn create_with_translations(
        &self,
        new: NewStory,
        translations: Vec<TranslationUpdate>,
    ) -> Result<Story> {
        let story = self.create(new)?;
        for translation in translations {
            self.add_translation(&story.id, translation)?;
        }
        Ok(story)
    }

    pub fn add_translation(&self, story_id: &str, update: TranslationUpdate) -> Result<Translation> {
        let now = Utc::now().to_rfc3339();
        let id = Database::generate_id();
        let translation = Translation {
            id: id.clone(),
            original_id: story_id.to_string(),
            language: update.language,
            story: update.story,
            created_at: now.clone(),
            updated_at: now,
        };
        self.db.put(TRANSLATIONS_PATH, &id, &translation)?;
        Ok(translation)
    }

    pub fn get(&self, id: &str) -> Result<Option<Story>> {
        self.db.get(STORIES_PATH, id)
    }

    pub fn get_required(&self, id: &str) -> Result<Story> {
        self.get(id)?.ok_or_else(|| Error::NotFound(format!("Story {}", id)))
    }

    /// Every story, newest first.
    pub fn get_all(&self) -> Result<Vec<Story>> {
        let mut stories: Vec<Story> = self
            .db
            .get_all::<Story>(STORIES_PATH)?
            .into_iter()
            .map(|(_, story)| story)
            .collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }

    /// Newest window of stories with a has-more probe (limit + 1 fetch).
    pub fn list_page(&self, limit: usize) -> Result<StoryPage> {
        let stories = self.get_all()?;
        let has_more = stories.len() > limit;
        Ok(StoryPage {
            stories: stories.into_iter().take(limit).collect(),
            has_more,
        })
    }

    /// Case-insensitive substring search over title and story text.
    pub fn search(&self, term: &str) -> Result<Vec<Story>> {
        let needle = term.to_lowercase();
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|story| {
                story.title.to_lowercase().contains(&needle)
                    || story.original_story.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Update a story and upsert its translations by language.
    pub fn update(
        &self,
        id: &str,
        patch: StoryPatch,
        translations: Vec<TranslationUpdate>,
    ) -> Result<Story> {
        let mut story = self.get_required(id)?;
        if let Some(title) = patch.title {
            story.title = title;
        }
        if let Some(original_story) = patch.original_story {
            story.original_story = original_story;
        }
        if let Some(original_language) = patch.original_language {
            story.original_language = original_language;
        }
        if let Some(level) = patch.level {
            story.level = level;
        }
        story.updated_at = Utc::now().to_rfc3339();
        self.db.put(STORIES_PATH, id, &story)?;

        let existing = self.translations_for(id)?;
        for update in translations {
            if let Some(current) = existing.iter().find(|t| t.language == update.language) {
                let mut translation = current.clone();
                translation.story = update.story;
                translation.updated_at = Utc::now().to_rfc3339();
                self.db.put(TRANSLATIONS_PATH, &translation.id, &translation)?;
            } else {
                self.add_translation(id, update)?;
            }
        }

        Ok(story)
    }

    /// Delete a story and every translation attached to it.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.db.remove(STORIES_PATH, id)?;
        for translation in self.translations_for(id)? {
            self.db.remove(TRANSLATIONS_PATH, &translation.id)?;
        }
        Ok(())
    }

    pub fn translations_for(&self, story_id: &str) -> Result<Vec<Translation>> {
        Ok(self
            .db
            .get_all::<Translation>(TRANSLATIONS_PATH)?
            .into_iter()
            .map(|(_, translation)| translation)
            .filter(|translation| translation.original_id == story_id)
            .collect())
    }

    pub fn translation_for(&self, story_id: &str, language: &str) -> Result<Option<Translation>> {
        Ok(self
            .translations_for(story_id)?
            .into_iter()
            .find(|translation| translation.language == language))
    }
}
