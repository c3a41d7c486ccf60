//! Persisted player preferences
//!
//! A single key-value file. The only entry the game writes is the last
//! difficulty chosen, under [`DIFFICULTY_KEY`].

use crate::data::Difficulty;
use crate::{GameError, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const DIFFICULTY_KEY: &str = "guardrailops_difficulty";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Storage for the difficulty preference
pub trait PreferenceStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load_difficulty(&self) -> Result<Option<Difficulty>>;
    fn save_difficulty(&mut self, difficulty: Difficulty) -> Result<()>;
}

/// JSON object on disk, e.g. `{"guardrailops_difficulty": "pro"}`
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store living at `<data_dir>/preferences.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading preferences from {}", self.path.display()))?;
        let entries = serde_json::from_str(&raw).map_err(|e| {
            GameError::CorruptedPreference(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(entries)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load_difficulty(&self) -> Result<Option<Difficulty>> {
        let entries = self.read_entries()?;
        match entries.get(DIFFICULTY_KEY) {
            Some(value) => {
                let difficulty = value
                    .parse()
                    .map_err(|e: GameError| GameError::CorruptedPreference(e.to_string()))?;
                Ok(Some(difficulty))
            }
            None => Ok(None),
        }
    }

    fn save_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        // A corrupt file is replaced rather than blocking the save.
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(DIFFICULTY_KEY.to_string(), difficulty.as_str().to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("writing preferences to {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        let store = Self::new();
        store.set_raw(DIFFICULTY_KEY, difficulty.as_str());
        store
    }

    pub fn set_raw(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_difficulty(&self) -> Result<Option<Difficulty>> {
        match self.get_raw(DIFFICULTY_KEY) {
            Some(value) => Ok(Some(value.parse()?)),
            None => Ok(None),
        }
    }

    fn save_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        self.set_raw(DIFFICULTY_KEY, difficulty.as_str());
        Ok(())
    }
}

/// Saved difficulty, falling back to casual when missing or unreadable.
pub fn load_or_default(store: &dyn PreferenceStore) -> Difficulty {
    match store.load_difficulty() {
        Ok(Some(difficulty)) => {
            tracing::debug!(%difficulty, "loaded difficulty preference");
            difficulty
        }
        Ok(None) => Difficulty::default(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable difficulty preference");
            Difficulty::default()
        }
    }
}
