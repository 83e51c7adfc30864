use serde_json::Value;
use std::collections::HashMap;

use crate::models::{JobStatus, StatusUpdate};
use crate::storage::{self, Storage};

const STATUS_MAP_KEY: &str = "status_map";
const STATUS_UPDATES_KEY: &str = "status_updates";

// Newest-first history, oldest entries dropped past the cap.
const MAX_UPDATES: usize = 20;

pub struct StatusStore<'a> {
    storage: &'a dyn Storage,
    map: HashMap<String, JobStatus>,
    updates: Vec<StatusUpdate>,
    loaded: bool,
}

impl<'a> StatusStore<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        StatusStore {
            storage,
            map: HashMap::new(),
            updates: Vec::new(),
            loaded: false,
        }
    }

    pub fn load(&mut self) {
        if let Some(Value::Object(entries)) = storage::load_json(self.storage, STATUS_MAP_KEY) {
            for (job_id, status) in entries {
                let status = status
                    .as_str()
                    .map(JobStatus::parse_loose)
                    .unwrap_or_default();
                self.map.insert(job_id, status);
            }
        }

        if let Some(Value::Array(entries)) = storage::load_json(self.storage, STATUS_UPDATES_KEY) {
            self.updates = entries
                .iter()
                .filter_map(sanitize_update)
                .take(MAX_UPDATES)
                .collect();
        }

        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, job_id: &str) -> JobStatus {
        self.map.get(job_id).copied().unwrap_or_default()
    }

    pub fn updates(&self) -> &[StatusUpdate] {
        &self.updates
    }

    pub fn set(&mut self, job_id: &str, title: &str, company: &str, status: JobStatus) {
        self.map.insert(job_id.to_string(), status);
        storage::persist(self.storage, STATUS_MAP_KEY, &self.map);

        let update = StatusUpdate {
            job_id: job_id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            status,
            changed_at: chrono::Local::now().to_rfc3339(),
        };
        self.updates.insert(0, update);
        self.updates.truncate(MAX_UPDATES);
        storage::persist(self.storage, STATUS_UPDATES_KEY, &self.updates);
    }
}

fn sanitize_update(value: &Value) -> Option<StatusUpdate> {
    let entry = value.as_object()?;
    let job_id = entry.get("jobId")?.as_str()?;
    let text = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };
    let status = entry
        .get("status")
        .and_then(Value::as_str)
        .map(JobStatus::parse_loose)
        .unwrap_or_default();
    Some(StatusUpdate {
        job_id: job_id.to_string(),
        title: text("title"),
        company: text("company"),
        status,
        changed_at: text("changedAt"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_status_round_trip() {
        let storage = MemoryStorage::new();
        let mut store = StatusStore::new(&storage);
        store.load();

        assert_eq!(store.get("job-1"), JobStatus::NotApplied);
        store.set("job-1", "Backend Engineer", "Acme", JobStatus::Applied);
        assert_eq!(store.get("job-1"), JobStatus::Applied);

        let mut fresh = StatusStore::new(&storage);
        fresh.load();
        assert_eq!(fresh.get("job-1"), JobStatus::Applied);
        assert_eq!(fresh.get("unknown"), JobStatus::NotApplied);
    }

    #[test]
    fn test_log_is_newest_first_and_capped() {
        let storage = MemoryStorage::new();
        let mut store = StatusStore::new(&storage);
        store.load();

        for i in 0..25 {
            let status = if i % 2 == 0 {
                JobStatus::Applied
            } else {
                JobStatus::Rejected
            };
            store.set(&format!("job-{i}"), "Title", "Company", status);
        }

        assert_eq!(store.updates().len(), MAX_UPDATES);
        // Most recent update first
        assert_eq!(store.updates()[0].job_id, "job-24");
        // Oldest surviving entry is update number 5 (0..=4 dropped)
        assert_eq!(store.updates()[MAX_UPDATES - 1].job_id, "job-5");
    }

    #[test]
    fn test_log_survives_reload() {
        let storage = MemoryStorage::new();
        let mut store = StatusStore::new(&storage);
        store.load();
        store.set("job-1", "Title A", "Acme", JobStatus::Applied);
        store.set("job-2", "Title B", "Beta", JobStatus::Selected);

        let mut fresh = StatusStore::new(&storage);
        fresh.load();
        assert_eq!(fresh.updates().len(), 2);
        assert_eq!(fresh.updates()[0].job_id, "job-2");
        assert_eq!(fresh.updates()[0].status, JobStatus::Selected);
    }

    #[test]
    fn test_invalid_stored_statuses_become_not_applied() {
        let storage = MemoryStorage::new();
        storage
            .set(
                "status_map",
                r#"{"job-1":"Applied","job-2":"Ghosted","job-3":17}"#,
            )
            .unwrap();
        storage
            .set(
                "status_updates",
                r#"[{"jobId":"job-2","title":"T","company":"C","status":"Ghosted","changedAt":"x"},
                    {"title":"missing id"}, "not an object"]"#,
            )
            .unwrap();

        let mut store = StatusStore::new(&storage);
        store.load();
        assert_eq!(store.get("job-1"), JobStatus::Applied);
        assert_eq!(store.get("job-2"), JobStatus::NotApplied);
        assert_eq!(store.get("job-3"), JobStatus::NotApplied);

        assert_eq!(store.updates().len(), 1);
        assert_eq!(store.updates()[0].status, JobStatus::NotApplied);
    }

    #[test]
    fn test_set_overwrites_current_status() {
        let storage = MemoryStorage::new();
        let mut store = StatusStore::new(&storage);
        store.load();
        store.set("job-1", "T", "C", JobStatus::Applied);
        store.set("job-1", "T", "C", JobStatus::Rejected);
        assert_eq!(store.get("job-1"), JobStatus::Rejected);
        assert_eq!(store.updates().len(), 2);
        assert_eq!(store.updates()[0].status, JobStatus::Rejected);
    }
}
