//! Promotional banners and quotes managed from the admin screens.
//! At most one banner and one quote are active at a time.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{Error, Result};

const BANNERS_PATH: &str = "banners";
const QUOTES_PATH: &str = "quotes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "buttonText")]
    pub button_text: String,
    #[serde(rename = "buttonLink")]
    pub button_link: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBanner {
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "buttonText")]
    pub button_text: String,
    #[serde(rename = "buttonLink")]
    pub button_link: String,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "buttonText")]
    pub button_text: Option<String>,
    #[serde(rename = "buttonLink")]
    pub button_link: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub author: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuote {
    pub text: String,
    pub author: String,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotePatch {
    pub text: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct ContentStore {
    db: Arc<Database>,
}

impl ContentStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // Banner methods

    pub fn create_banner(&self, new: NewBanner) -> Result<Banner> {
        if new.is_active {
            self.deactivate_all_banners()?;
        }

        let id = Database::generate_id();
        let banner = Banner {
            id: id.clone(),
            title: new.title,
            description: new.description,
            image_url: new.image_url,
            button_text: new.button_text,
            button_link: new.button_link,
            is_active: new.is_active,
            created_at: Utc::now().timestamp_millis(),
        };
        self.db.put(BANNERS_PATH, &id, &banner)?;
        Ok(banner)
    }

    /// Every banner, newest first.
    pub fn get_all_banners(&self) -> Result<Vec<Banner>> {
        let mut banners: Vec<Banner> = self
            .db
            .get_all::<Banner>(BANNERS_PATH)?
            .into_iter()
            .map(|(_, banner)| banner)
            .collect();
        banners.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(banners)
    }

    pub fn get_active_banner(&self) -> Result<Option<Banner>> {
        Ok(self.get_all_banners()?.into_iter().find(|b| b.is_active))
    }

    pub fn update_banner(&self, id: &str, patch: BannerPatch) -> Result<Banner> {
        if patch.is_active == Some(true) {
            self.deactivate_all_banners()?;
        }

        let mut banner: Banner = self
            .db
            .get(BANNERS_PATH, id)?
            .ok_or_else(|| Error::NotFound(format!("Banner {}", id)))?;
        if let Some(title) = patch.title {
            banner.title = title;
        }
        if let Some(description) = patch.description {
            banner.description = description;
        }
        if let Some(image_url) = patch.image_url {
            banner.image_url = image_url;
        }
        if let Some(button_text) = patch.button_text {
            banner.button_text = button_text;
        }
        if let Some(button_link) = patch.button_link {
            banner.button_link = button_link;
        }
        if let Some(is_active) = patch.is_active {
            banner.is_active = is_active;
        }
        self.db.put(BANNERS_PATH, id, &banner)?;
        Ok(banner)
    }

    pub fn delete_banner(&self, id: &str) -> Result<()> {
        self.db.remove(BANNERS_PATH, id)
    }

    fn deactivate_all_banners(&self) -> Result<()> {
        for (id, mut banner) in self.db.get_all::<Banner>(BANNERS_PATH)? {
            if banner.is_active {
                banner.is_active = false;
                self.db.put(BANNERS_PATH, &id, &banner)?;
            }
        }
        Ok(())
    }

    // Quote methods

    pub fn create_quote(&self, new: NewQuote) -> Result<Quote> {
        if new.is_active {
            self.deactivate_all_quotes()?;
        }

        let id = Database::generate_id();
        let quote = Quote {
            id: id.clone(),
            text: new.text,
            author: new.author,
            is_active: new.is_active,
            created_at: Utc::now().timestamp_millis(),
        };
        self.db.put(QUOTES_PATH, &id, &quote)?;
        Ok(quote)
    }

    /// Every quote, newest first.
    pub fn get_all_quotes(&self) -> Result<Vec<Quote>> {
        let mut quotes: Vec<Quote> = self
            .db
            .get_all::<Quote>(QUOTES_PATH)?
            .into_iter()
            .map(|(_, quote)| quote)
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes)
    }

    pub fn get_active_quote(&self) -> Result<Option<Quote>> {
        Ok(self.get_all_quotes()?.into_iter().find(|q| q.is_active))
    }

    pub fn update_quote(&self, id: &str, patch: QuotePatch) -> Result<Quote> {
        if patch.is_active == Some(true) {
            self.deactivate_all_quotes()?;
        }

        let mut quote: Quote = self
            .db
            .get(QUOTES_PATH, id)?
            .ok_or_else(|| Error::NotFound(format!("Quote {}", id)))?;
        if let Some(text) = patch.text {
            quote.text = text;
        }
        if let Some(author) = patch.author {
            quote.author = author;
        }
        if let Some(is_active) = patch.is_active {
            quote.is_active = is_active;
        }
        self.db.put(QUOTES_PATH, id, &quote)?;
        Ok(quote)
    }

    pub fn delete_quote(&self, id: &str) -> Result<()> {
        self.db.remove(QUOTES_PATH, id)
    }

    fn deactivate_all_quotes(&self) -> Result<()> {
        for (id, mut quote) in self.db.get_all::<Quote>(QUOTES_PATH)? {
            if quote.is_active {
                quote.is_active = false;
                self.db.put(QUOTES_PATH, &id, &quote)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path()).unwrap());
        (dir, ContentStore::new(db))
    }

    fn new_banner(title: &str, active: bool) -> NewBanner {
        NewBanner {
            title: title.to_string(),
            description: "desc".to_string(),
            image_url: "/img.png".to_string(),
            button_text: "Read".to_string(),
            button_link: "/stories".to_string(),
            is_active: active,
        }
    }

    #[test]
    fn creating_an_active_banner_deactivates_the_rest() {
        let (_dir, store) = open_store();
        let first = store.create_banner(new_banner("first", true)).unwrap();
        let second = store.create_banner(new_banner("second", true)).unwrap();

        let active = store.get_active_banner().unwrap().unwrap();
        assert_eq!(active.id, second.id);

        let banners = store.get_all_banners().unwrap();
        assert_eq!(banners.iter().filter(|b| b.is_active).count(), 1);
        assert!(!banners.iter().find(|b| b.id == first.id).unwrap().is_active);
    }

    #[test]
    fn activating_a_quote_via_update_deactivates_the_rest() {
        let (_dir, store) = open_store();
        let first = store
            .create_quote(NewQuote {
                text: "Erst denken.".to_string(),
                author: "A".to_string(),
                is_active: true,
            })
            .unwrap();
        let second = store
            .create_quote(NewQuote {
                text: "Dann reden.".to_string(),
                author: "B".to_string(),
                is_active: false,
            })
            .unwrap();

        store
            .update_quote(&second.id, QuotePatch { is_active: Some(true), ..Default::default() })
            .unwrap();

        let active = store.get_active_quote().unwrap().unwrap();
        assert_eq!(active.id, second.id);
        assert!(!store
            .get_all_quotes()
            .unwrap()
            .iter()
            .find(|q| q.id == first.id)
            .unwrap()
            .is_active);
    }

    #[test]
    fn updating_a_missing_banner_is_not_found() {
        let (_dir, store) = open_store();
        assert!(matches!(
            store.update_banner("2020-01-01_00-00-00_missing", BannerPatch::default()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn delete_removes_the_quote() {
        let (_dir, store) = open_store();
        let quote = store
            .create_quote(NewQuote {
                text: "Weg damit.".to_string(),
                author: "C".to_string(),
                is_active: false,
            })
            .unwrap();
        store.delete_quote(&quote.id).unwrap();
        assert!(store.get_all_quotes().unwrap().is_empty());
    }
}
