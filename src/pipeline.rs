use clap::ValueEnum;
use regex::Regex;
use std::sync::LazyLock;

use crate::models::{Experience, JobStatus, Mode, ScoredJob, Source};

// All filters are optional and AND-combined; unset means pass-through.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub mode: Option<Mode>,
    pub experience: Option<Experience>,
    pub source: Option<Source>,
    pub status: Option<JobStatus>,
    pub only_matches: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Latest,
    // With empty preferences every score collapses to the recency/source
    // bonuses, so this ordering degenerates accordingly.
    #[value(name = "match-score")]
    MatchScore,
    Salary,
    Experience,
}

pub fn apply<F>(
    jobs: &[ScoredJob],
    filters: &Filters,
    sort: SortKey,
    min_score: u8,
    status_of: F,
) -> Vec<ScoredJob>
where
    F: Fn(&str) -> JobStatus,
{
    let keyword = filters
        .keyword
        .as_deref()
        .map(str::to_lowercase)
        .filter(|k| !k.is_empty());

    let mut view: Vec<ScoredJob> = jobs
        .iter()
        .filter(|scored| {
            let job = &scored.job;
            if let Some(k) = &keyword {
                let hit = job.title.to_lowercase().contains(k.as_str())
                    || job.company.to_lowercase().contains(k.as_str())
                    || job.description.to_lowercase().contains(k.as_str());
                if !hit {
                    return false;
                }
            }
            if let Some(location) = &filters.location {
                if job.location != *location {
                    return false;
                }
            }
            if let Some(mode) = filters.mode {
                if job.mode != mode {
                    return false;
                }
            }
            if let Some(experience) = filters.experience {
                if job.experience != experience {
                    return false;
                }
            }
            if let Some(source) = filters.source {
                if job.source != source {
                    return false;
                }
            }
            if let Some(status) = filters.status {
                if status_of(&job.id) != status {
                    return false;
                }
            }
            if filters.only_matches && scored.match_score < min_score {
                return false;
            }
            true
        })
        .cloned()
        .collect();

    // sort_by is stable, so ties keep catalog order
    match sort {
        SortKey::Latest => view.sort_by_key(|s| s.job.posted_days_ago),
        SortKey::MatchScore => view.sort_by(|a, b| b.match_score.cmp(&a.match_score)),
        SortKey::Salary => view.sort_by(|a, b| {
            salary_value(&b.job.salary_range).total_cmp(&salary_value(&a.job.salary_range))
        }),
        SortKey::Experience => view.sort_by_key(|s| s.job.experience),
    }

    view
}

static NUMBER_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

// Max of all digit runs after dropping grouping commas. Bare numbers are
// compared as written; lakh/crore vs thousands grouping is not interpreted.
pub fn salary_value(salary_range: &str) -> f64 {
    let cleaned = salary_range.replace(',', "");
    NUMBER_RUN
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;

    fn job(id: &str, title: &str, days: u32, experience: Experience, salary: &str) -> ScoredJob {
        ScoredJob {
            job: Job {
                id: id.to_string(),
                title: title.to_string(),
                company: "Acme".to_string(),
                location: "Bangalore".to_string(),
                mode: Mode::Remote,
                experience,
                salary_range: salary.to_string(),
                source: Source::LinkedIn,
                posted_days_ago: days,
                description: "generic role".to_string(),
                skills: vec![],
                apply_url: "https://example.com".to_string(),
            },
            match_score: 0,
        }
    }

    fn sample() -> Vec<ScoredJob> {
        vec![
            job("a", "Backend Engineer", 3, Experience::OneToThree, "₹12,00,000 - ₹18,00,000"),
            job("b", "Frontend Developer", 1, Experience::Fresher, "₹4,00,000 - ₹6,00,000"),
            job("c", "Data Engineer", 1, Experience::ThreeToFive, "₹20,00,000 - ₹30,00,000"),
            job("d", "QA Engineer", 7, Experience::ZeroToOne, "Not disclosed"),
        ]
    }

    fn no_status(_: &str) -> JobStatus {
        JobStatus::NotApplied
    }

    #[test]
    fn test_empty_filters_pass_everything_through() {
        let jobs = sample();
        let out = apply(&jobs, &Filters::default(), SortKey::Latest, 40, no_status);
        assert_eq!(out.len(), jobs.len());
    }

    #[test]
    fn test_keyword_matches_title_company_or_description() {
        let jobs = sample();
        let filters = Filters {
            keyword: Some("backend".to_string()),
            ..Filters::default()
        };
        let out = apply(&jobs, &filters, SortKey::Latest, 40, no_status);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].job.id, "a");

        // Company name hits every sample job
        let filters = Filters {
            keyword: Some("ACME".to_string()),
            ..Filters::default()
        };
        assert_eq!(apply(&jobs, &filters, SortKey::Latest, 40, no_status).len(), 4);
    }

    #[test]
    fn test_filters_are_and_combined() {
        let jobs = sample();
        let filters = Filters {
            keyword: Some("engineer".to_string()),
            experience: Some(Experience::OneToThree),
            ..Filters::default()
        };
        let out = apply(&jobs, &filters, SortKey::Latest, 40, no_status);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].job.id, "a");
    }

    #[test]
    fn test_status_filter_with_no_matching_jobs_is_empty() {
        let jobs = sample();
        let filters = Filters {
            status: Some(JobStatus::Selected),
            ..Filters::default()
        };
        assert!(apply(&jobs, &filters, SortKey::Latest, 40, no_status).is_empty());
    }

    #[test]
    fn test_status_filter_consults_lookup() {
        let jobs = sample();
        let filters = Filters {
            status: Some(JobStatus::Applied),
            ..Filters::default()
        };
        let out = apply(&jobs, &filters, SortKey::Latest, 40, |id| {
            if id == "c" { JobStatus::Applied } else { JobStatus::NotApplied }
        });
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].job.id, "c");
    }

    #[test]
    fn test_threshold_gate_uses_min_score() {
        let mut jobs = sample();
        jobs[0].match_score = 55;
        jobs[2].match_score = 40;
        let filters = Filters {
            only_matches: true,
            ..Filters::default()
        };
        let out = apply(&jobs, &filters, SortKey::MatchScore, 40, no_status);
        let ids: Vec<&str> = out.iter().map(|s| s.job.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_latest_sort_is_stable_on_ties() {
        let jobs = sample();
        let out = apply(&jobs, &Filters::default(), SortKey::Latest, 40, no_status);
        let ids: Vec<&str> = out.iter().map(|s| s.job.id.as_str()).collect();
        // b and c tie at 1 day; catalog order between them is preserved
        assert_eq!(ids, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_match_score_sorts_descending() {
        let mut jobs = sample();
        jobs[0].match_score = 30;
        jobs[1].match_score = 90;
        jobs[2].match_score = 60;
        let out = apply(&jobs, &Filters::default(), SortKey::MatchScore, 40, no_status);
        let scores: Vec<u8> = out.iter().map(|s| s.match_score).collect();
        assert_eq!(scores, vec![90, 60, 30, 0]);
    }

    #[test]
    fn test_experience_sort_is_ordinal_ascending() {
        let jobs = sample();
        let out = apply(&jobs, &Filters::default(), SortKey::Experience, 40, no_status);
        for pair in out.windows(2) {
            assert!(pair[0].job.experience <= pair[1].job.experience);
        }
        assert_eq!(out[0].job.id, "b"); // Fresher first
    }

    #[test]
    fn test_salary_sort_uses_max_token() {
        let jobs = sample();
        let out = apply(&jobs, &Filters::default(), SortKey::Salary, 40, no_status);
        let ids: Vec<&str> = out.iter().map(|s| s.job.id.as_str()).collect();
        // c (30L) > a (18L) > b (6L) > d (no tokens, 0)
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_salary_value_extraction() {
        assert_eq!(salary_value("₹12,00,000 - ₹18,00,000"), 1_800_000.0);
        assert_eq!(salary_value("12.5 LPA"), 12.5);
        assert_eq!(salary_value("Not disclosed"), 0.0);
        assert_eq!(salary_value(""), 0.0);
        assert_eq!(salary_value("$80k-100k"), 100.0);
    }
}
