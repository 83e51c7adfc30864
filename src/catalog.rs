use anyhow::{Context, Result, bail};
use std::collections::HashSet;

use crate::models::Job;

// The catalog ships inside the binary and never changes during a session.
const CATALOG_JSON: &str = include_str!("../data/jobs.json");

pub fn load() -> Result<Vec<Job>> {
    let jobs: Vec<Job> =
        serde_json::from_str(CATALOG_JSON).context("Failed to parse embedded job catalog")?;
    validate(&jobs)?;
    Ok(jobs)
}

// Unknown mode/experience literals already fail serde above; this catches
// the catalog mistakes serde cannot.
fn validate(jobs: &[Job]) -> Result<()> {
    let mut seen = HashSet::new();
    for job in jobs {
        if job.id.trim().is_empty() {
            bail!("Catalog contains a job with an empty id");
        }
        if !seen.insert(job.id.as_str()) {
            bail!("Duplicate job id '{}' in catalog", job.id);
        }
        if job.apply_url.trim().is_empty() {
            bail!("Job '{}' has no apply URL", job.id);
        }
    }
    Ok(())
}

// Saved/status entries may reference ids no longer in the catalog; callers
// treat None as "skip", never as an error.
pub fn find<'a>(jobs: &'a [Job], id: &str) -> Option<&'a Job> {
    jobs.iter().find(|j| j.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Experience, Mode, Source};

    #[test]
    fn test_catalog_loads_and_validates() {
        let jobs = load().unwrap();
        assert!(!jobs.is_empty());

        let mut ids = HashSet::new();
        for job in &jobs {
            assert!(ids.insert(job.id.clone()), "duplicate id {}", job.id);
            assert!(!job.apply_url.is_empty());
        }
    }

    #[test]
    fn test_find_by_id() {
        let jobs = load().unwrap();
        let first = &jobs[0];
        assert_eq!(find(&jobs, &first.id).unwrap().id, first.id);
        assert!(find(&jobs, "no-such-job").is_none());
    }

    #[test]
    fn test_unknown_experience_literal_is_rejected() {
        let raw = r#"[{
            "id": "x", "title": "T", "company": "C", "location": "L",
            "mode": "Remote", "experience": "10+",
            "salaryRange": "", "source": "LinkedIn", "postedDaysAgo": 0,
            "description": "", "skills": [], "applyUrl": "https://example.com"
        }]"#;
        assert!(serde_json::from_str::<Vec<Job>>(raw).is_err());
    }

    #[test]
    fn test_unknown_source_maps_to_other() {
        let raw = r#"[{
            "id": "x", "title": "T", "company": "C", "location": "L",
            "mode": "Remote", "experience": "0-1",
            "salaryRange": "", "source": "AngelList", "postedDaysAgo": 0,
            "description": "", "skills": [], "applyUrl": "https://example.com"
        }]"#;
        let jobs: Vec<Job> = serde_json::from_str(raw).unwrap();
        assert_eq!(jobs[0].source, Source::Other);
        assert_eq!(jobs[0].mode, Mode::Remote);
        assert_eq!(jobs[0].experience, Experience::ZeroToOne);
    }
}
