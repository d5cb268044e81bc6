//! Per-reader favorite stories.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::drafts::sanitize_user_id;
use crate::error::Result;

const FAVORITES_PATH: &str = "favorites";

#[derive(Debug, Serialize, Deserialize)]
struct FavoriteRecord {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "storyIds", default)]
    story_ids: Vec<String>,
}

#[derive(Clone)]
pub struct FavoriteStore {
    db: Arc<Database>,
}

impl FavoriteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Favorite story ids for a user, in the order they were added.
    pub fn get(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self
            .db
            .get::<FavoriteRecord>(FAVORITES_PATH, &sanitize_user_id(user_id))?
            .map(|record| record.story_ids)
            .unwrap_or_default())
    }

    /// Toggle membership; returns whether the story is now a favorite.
    pub fn toggle(&self, user_id: &str, story_id: &str) -> Result<bool> {
        let key = sanitize_user_id(user_id);
        let mut record = self
            .db
            .get::<FavoriteRecord>(FAVORITES_PATH, &key)?
            .unwrap_or(FavoriteRecord {
                user_id: user_id.to_string(),
                story_ids: Vec::new(),
            });

        let is_favorite = if let Some(pos) = record.story_ids.iter().position(|id| id == story_id) {
            record.story_ids.remove(pos);
            false
        } else {
            record.story_ids.push(story_id.to_string());
            true
        };

        self.db.put(FAVORITES_PATH, &key, &record)?;
        Ok(is_favorite)
    }
}
