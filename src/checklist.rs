use serde_json::Value;
use std::collections::HashMap;

use crate::storage::{self, Storage};

const CHECKLIST_KEY: &str = "checklist";

pub struct ChecklistItem {
    pub id: &'static str,
    pub label: &'static str,
    pub how_to_test: &'static str,
}

// Fixed set; not user-editable. The ship gate derives purely from these.
pub const CHECKLIST_ITEMS: [ChecklistItem; 10] = [
    ChecklistItem {
        id: "preferences-persist",
        label: "Preferences persist across runs",
        how_to_test: "Set preferences, run `prefs show` again, and confirm the values stuck.",
    },
    ChecklistItem {
        id: "match-score-correct",
        label: "Match score calculates correctly",
        how_to_test: "Set known preferences and verify score components align with the scoring rules.",
    },
    ChecklistItem {
        id: "show-only-matches",
        label: "Only-matches filter works",
        how_to_test: "Run `list --only-matches` and verify only jobs above the threshold remain.",
    },
    ChecklistItem {
        id: "save-job-persist",
        label: "Saved jobs persist across runs",
        how_to_test: "Save a job, run `saved` in a new session, and confirm it is still listed.",
    },
    ChecklistItem {
        id: "apply-opens-browser",
        label: "Apply opens the job link",
        how_to_test: "Run `apply <job-id>` and verify the posting opens in the default browser.",
    },
    ChecklistItem {
        id: "status-persist",
        label: "Status updates persist across runs",
        how_to_test: "Set a status, run `status log` in a new session, and verify it is recorded.",
    },
    ChecklistItem {
        id: "status-filter",
        label: "Status filter works correctly",
        how_to_test: "Set statuses on a few jobs and run `list --status applied`.",
    },
    ChecklistItem {
        id: "digest-top-10",
        label: "Digest generates top 10 by score",
        how_to_test: "Run `digest` and validate order by match score desc, then posted days asc.",
    },
    ChecklistItem {
        id: "digest-persists-day",
        label: "Digest stays fixed for the day",
        how_to_test: "Run `digest` twice, change preferences in between, and confirm identical output.",
    },
    ChecklistItem {
        id: "no-errors-main-commands",
        label: "Core commands run without errors",
        how_to_test: "Run list, saved, digest, prefs show, checklist, and ship back to back.",
    },
];

pub struct ChecklistStore<'a> {
    storage: &'a dyn Storage,
    state: HashMap<&'static str, bool>,
    loaded: bool,
}

impl<'a> ChecklistStore<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        ChecklistStore {
            storage,
            state: default_state(),
            loaded: false,
        }
    }

    // Every known id is present after hydration; unknown stored ids are
    // dropped, non-boolean values read as false.
    pub fn load(&mut self) {
        if let Some(Value::Object(stored)) = storage::load_json(self.storage, CHECKLIST_KEY) {
            for item in &CHECKLIST_ITEMS {
                let passed = stored
                    .get(item.id)
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                self.state.insert(item.id, passed);
            }
        }
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_passed(&self, id: &str) -> bool {
        self.state.get(id).copied().unwrap_or(false)
    }

    // Unknown ids are rejected rather than stored.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let item = CHECKLIST_ITEMS.iter().find(|item| item.id == id)?;
        let flipped = !self.is_passed(item.id);
        self.state.insert(item.id, flipped);
        storage::persist(self.storage, CHECKLIST_KEY, &self.state);
        Some(flipped)
    }

    pub fn reset(&mut self) {
        self.state = default_state();
        storage::persist(self.storage, CHECKLIST_KEY, &self.state);
    }

    pub fn passed_count(&self) -> usize {
        CHECKLIST_ITEMS
            .iter()
            .filter(|item| self.is_passed(item.id))
            .count()
    }

    pub fn total_count(&self) -> usize {
        CHECKLIST_ITEMS.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total_count()
    }
}

fn default_state() -> HashMap<&'static str, bool> {
    CHECKLIST_ITEMS.iter().map(|item| (item.id, false)).collect()
}
