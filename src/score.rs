use crate::models::{Job, Preferences, ScoredJob, Source};

// Additive rule weights. Independent rules, sum capped at 100.
const TITLE_KEYWORD: u32 = 25;
const DESCRIPTION_KEYWORD: u32 = 15;
const LOCATION_MATCH: u32 = 15;
const MODE_MATCH: u32 = 10;
const EXPERIENCE_MATCH: u32 = 10;
const SKILL_OVERLAP: u32 = 15;
const RECENT_POSTING: u32 = 5;
const LINKEDIN_SOURCE: u32 = 5;

const RECENT_DAYS: u32 = 2;

pub fn match_score(job: &Job, prefs: &Preferences) -> u8 {
    let mut score = 0u32;

    let role_keywords = csv_tokens(&prefs.role_keywords);
    let user_skills = csv_tokens(&prefs.skills);

    let title = job.title.to_lowercase();
    let description = job.description.to_lowercase();

    if role_keywords.iter().any(|k| title.contains(k.as_str())) {
        score += TITLE_KEYWORD;
    }
    if role_keywords.iter().any(|k| description.contains(k.as_str())) {
        score += DESCRIPTION_KEYWORD;
    }

    if !prefs.preferred_locations.is_empty()
        && prefs.preferred_locations.iter().any(|l| *l == job.location)
    {
        score += LOCATION_MATCH;
    }

    if !prefs.preferred_mode.is_empty()
        && prefs
            .preferred_mode
            .iter()
            .any(|m| *m == job.mode.to_string())
    {
        score += MODE_MATCH;
    }

    if !prefs.experience_level.is_empty() && prefs.experience_level == job.experience.label() {
        score += EXPERIENCE_MATCH;
    }

    if !user_skills.is_empty()
        && job
            .skills
            .iter()
            .any(|s| user_skills.contains(&s.to_lowercase()))
    {
        score += SKILL_OVERLAP;
    }

    if job.posted_days_ago <= RECENT_DAYS {
        score += RECENT_POSTING;
    }
    if job.source == Source::LinkedIn {
        score += LINKEDIN_SOURCE;
    }

    score.min(100) as u8
}

pub fn score_all(jobs: &[Job], prefs: &Preferences) -> Vec<ScoredJob> {
    jobs.iter()
        .map(|job| ScoredJob {
            job: job.clone(),
            match_score: match_score(job, prefs),
        })
        .collect()
}

// Comma-split, trimmed, lower-cased, empties dropped. Malformed input just
// yields fewer tokens.
fn csv_tokens(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Green,
    Amber,
    Neutral,
    Grey,
}

pub fn score_band(score: u8) -> ScoreBand {
    if score >= 80 {
        ScoreBand::Green
    } else if score >= 60 {
        ScoreBand::Amber
    } else if score >= 40 {
        ScoreBand::Neutral
    } else {
        ScoreBand::Grey
    }
}
