use serde_json::Value;
use tracing::warn;

use crate::models::Preferences;
use crate::storage::{self, Storage};

const PREFERENCES_KEY: &str = "preferences";

pub struct PreferenceStore<'a> {
    storage: &'a dyn Storage,
    prefs: Preferences,
    loaded: bool,
}

impl<'a> PreferenceStore<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        PreferenceStore {
            storage,
            prefs: Preferences::default(),
            loaded: false,
        }
    }

    // Merge stored fields over defaults one by one; a single bad field never
    // discards the rest of the blob.
    pub fn load(&mut self) {
        if let Some(value) = storage::load_json(self.storage, PREFERENCES_KEY) {
            self.prefs = sanitize(&value);
        }
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    pub fn set(&mut self, prefs: Preferences) {
        self.prefs = prefs;
        storage::persist(self.storage, PREFERENCES_KEY, &self.prefs);
    }

    pub fn has_preferences(&self) -> bool {
        let p = &self.prefs;
        !p.role_keywords.is_empty()
            || !p.preferred_locations.is_empty()
            || !p.preferred_mode.is_empty()
            || !p.experience_level.is_empty()
            || !p.skills.is_empty()
    }

    pub fn clear(&mut self) {
        self.prefs = Preferences::default();
        if let Err(e) = self.storage.remove(PREFERENCES_KEY) {
            warn!("failed to clear preferences: {e:#}");
        }
    }
}

fn sanitize(value: &Value) -> Preferences {
    let mut prefs = Preferences::default();
    if let Some(s) = value.get("roleKeywords").and_then(Value::as_str) {
        prefs.role_keywords = s.to_string();
    }
    if let Some(items) = value.get("preferredLocations").and_then(Value::as_array) {
        prefs.preferred_locations = items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect();
    }
    if let Some(items) = value.get("preferredMode").and_then(Value::as_array) {
        prefs.preferred_mode = items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect();
    }
    if let Some(s) = value.get("experienceLevel").and_then(Value::as_str) {
        prefs.experience_level = s.to_string();
    }
    if let Some(s) = value.get("skills").and_then(Value::as_str) {
        prefs.skills = s.to_string();
    }
    if let Some(n) = value.get("minMatchScore").and_then(Value::as_u64) {
        prefs.min_match_score = n.min(100) as u8;
    }
    prefs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let storage = MemoryStorage::new();
        let mut store = PreferenceStore::new(&storage);
        assert!(!store.is_loaded());
        store.load();
        assert!(store.is_loaded());
        assert_eq!(*store.get(), Preferences::default());
        assert_eq!(store.get().min_match_score, 40);
        assert!(!store.has_preferences());
    }

    #[test]
    fn test_set_persists_and_reloads() {
        let storage = MemoryStorage::new();
        let mut store = PreferenceStore::new(&storage);
        store.load();
        store.set(Preferences {
            role_keywords: "backend, data".to_string(),
            preferred_locations: vec!["Bangalore".to_string()],
            min_match_score: 55,
            ..Preferences::default()
        });
        assert!(store.has_preferences());

        let mut fresh = PreferenceStore::new(&storage);
        fresh.load();
        assert_eq!(fresh.get().role_keywords, "backend, data");
        assert_eq!(fresh.get().min_match_score, 55);
    }

    #[test]
    fn test_partial_blob_merges_over_defaults() {
        let storage = MemoryStorage::new();
        storage
            .set("preferences", r#"{"roleKeywords":"qa"}"#)
            .unwrap();
        let mut store = PreferenceStore::new(&storage);
        store.load();
        assert_eq!(store.get().role_keywords, "qa");
        assert_eq!(store.get().min_match_score, 40);
    }

    #[test]
    fn test_wrong_typed_fields_fall_back_individually() {
        let storage = MemoryStorage::new();
        storage
            .set(
                "preferences",
                r#"{"roleKeywords":7,"skills":"python","preferredLocations":"Pune","minMatchScore":"high"}"#,
            )
            .unwrap();
        let mut store = PreferenceStore::new(&storage);
        store.load();
        assert_eq!(store.get().role_keywords, "");
        assert_eq!(store.get().skills, "python");
        assert!(store.get().preferred_locations.is_empty());
        assert_eq!(store.get().min_match_score, 40);
    }

    #[test]
    fn test_malformed_json_falls_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.set("preferences", "{broken").unwrap();
        let mut store = PreferenceStore::new(&storage);
        store.load();
        assert_eq!(*store.get(), Preferences::default());
    }

    #[test]
    fn test_clear_resets_and_removes() {
        let storage = MemoryStorage::new();
        let mut store = PreferenceStore::new(&storage);
        store.load();
        store.set(Preferences {
            skills: "rust".to_string(),
            ..Preferences::default()
        });
        store.clear();
        assert_eq!(*store.get(), Preferences::default());
        assert_eq!(storage.get("preferences").unwrap(), None);
    }
}
