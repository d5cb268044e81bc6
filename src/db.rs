//! Keyed JSON document store backing every persistent collection.
//!
//! Documents live at `<root>/<prefix...>/<id>.json`. Generated ids embed a
//! timestamp, so a lexicographic sort of ids is a chronological sort.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Database {
    root: PathBuf,
}

fn is_safe_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.len() > 255 {
        return false;
    }

    let pattern = Regex::new(r"^[\w@\-]+$").unwrap();
    pattern.is_match(segment)
}

fn checked_segment(segment: &str) -> Result<&str> {
    let name = Path::new(segment)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("Invalid path segment: {}", segment)))?;

    if name != segment || !is_safe_segment(name) {
        return Err(Error::InvalidInput(format!(
            "Invalid characters in path segment: {}",
            segment
        )));
    }

    Ok(name)
}

impl Database {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Generate a document id. Format: YYYY-MM-DD_HH-MM-SS_{uuid}, which keeps
    /// directory listings in creation order.
    pub fn generate_id() -> String {
        let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        format!("{}_{}", timestamp, Uuid::new_v4().as_simple())
    }

    fn dir_path(&self, prefix: &str) -> Result<PathBuf> {
        let mut dir = self.root.clone();
        for segment in prefix.split('/') {
            dir.push(checked_segment(segment)?);
        }

        // Segment checks already exclude `..`; keep the guard anyway.
        if !dir.starts_with(&self.root) {
            return Err(Error::InvalidInput(format!("Invalid path: {}", prefix)));
        }

        Ok(dir)
    }

    fn doc_path(&self, prefix: &str, id: &str) -> Result<PathBuf> {
        Ok(self.dir_path(prefix)?.join(format!("{}.json", checked_segment(id)?)))
    }

    /// Append a new document under the prefix and return its generated id.
    pub fn push(&self, prefix: &str, value: &impl Serialize) -> Result<String> {
        let id = Self::generate_id();
        self.put(prefix, &id, value)?;
        Ok(id)
    }

    pub fn put(&self, prefix: &str, id: &str, value: &impl Serialize) -> Result<()> {
        let path = self.doc_path(prefix, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, prefix: &str, id: &str) -> Result<Option<T>> {
        let path = self.doc_path(prefix, id)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Read every document under the prefix, ordered by id ascending.
    pub fn get_all<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<(String, T)>> {
        let dir = self.dir_path(prefix)?;
        let mut entries = Vec::new();
        if !dir.exists() {
            return Ok(entries);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension() == Some(std::ffi::OsStr::new("json")) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    let content = fs::read_to_string(&path)?;
                    entries.push((stem.to_string(), serde_json::from_str(&content)?));
                }
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    /// Remove a document. Removing an absent id is a no-op.
    pub fn remove(&self, prefix: &str, id: &str) -> Result<()> {
        let path = self.doc_path(prefix, id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted document: {:?}", path);
        }
        Ok(())
    }
}
