use serde_json::Value;

use crate::storage::{self, Storage};

const SAVED_JOBS_KEY: &str = "saved_jobs";

// Bookmarked job ids, insertion order preserved.
pub struct SavedJobsStore<'a> {
    storage: &'a dyn Storage,
    ids: Vec<String>,
    loaded: bool,
}

impl<'a> SavedJobsStore<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        SavedJobsStore {
            storage,
            ids: Vec::new(),
            loaded: false,
        }
    }

    pub fn load(&mut self) {
        if let Some(Value::Array(items)) = storage::load_json(self.storage, SAVED_JOBS_KEY) {
            for id in items.iter().filter_map(Value::as_str) {
                if !self.ids.iter().any(|existing| existing == id) {
                    self.ids.push(id.to_string());
                }
            }
        }
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_saved(&self, job_id: &str) -> bool {
        self.ids.iter().any(|id| id == job_id)
    }

    pub fn save(&mut self, job_id: &str) {
        if !self.is_saved(job_id) {
            self.ids.push(job_id.to_string());
            storage::persist(self.storage, SAVED_JOBS_KEY, &self.ids);
        }
    }

    pub fn unsave(&mut self, job_id: &str) {
        let before = self.ids.len();
        self.ids.retain(|id| id != job_id);
        if self.ids.len() != before {
            storage::persist(self.storage, SAVED_JOBS_KEY, &self.ids);
        }
    }

    // Returns the new saved state.
    pub fn toggle(&mut self, job_id: &str) -> bool {
        if self.is_saved(job_id) {
            self.unsave(job_id);
            false
        } else {
            self.save(job_id);
            true
        }
    }
}
