use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Mode {
    Remote,
    Hybrid,
    Onsite,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Remote => "Remote",
            Mode::Hybrid => "Hybrid",
            Mode::Onsite => "Onsite",
        };
        write!(f, "{}", s)
    }
}

// Variant order doubles as the sort ordinal for the experience sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Experience {
    #[serde(rename = "Fresher")]
    #[value(name = "fresher")]
    Fresher,
    #[serde(rename = "0-1")]
    #[value(name = "0-1")]
    ZeroToOne,
    #[serde(rename = "1-3")]
    #[value(name = "1-3")]
    OneToThree,
    #[serde(rename = "3-5")]
    #[value(name = "3-5")]
    ThreeToFive,
}

impl Experience {
    pub fn label(&self) -> &'static str {
        match self {
            Experience::Fresher => "Fresher",
            Experience::ZeroToOne => "0-1",
            Experience::OneToThree => "1-3",
            Experience::ThreeToFive => "3-5",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Unrecognized source literals land in Other instead of failing catalog
// load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(from = "String")]
pub enum Source {
    #[value(name = "linkedin")]
    LinkedIn,
    #[value(name = "naukri")]
    Naukri,
    #[value(name = "indeed")]
    Indeed,
    #[value(name = "other")]
    Other,
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "linkedin" => Source::LinkedIn,
            "naukri" => Source::Naukri,
            "indeed" => Source::Indeed,
            _ => Source::Other,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::LinkedIn => "LinkedIn",
            Source::Naukri => "Naukri",
            Source::Indeed => "Indeed",
            Source::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub mode: Mode,
    pub experience: Experience,
    pub salary_range: String,
    pub source: Source,
    pub posted_days_ago: u32,
    pub description: String,
    pub skills: Vec<String>,
    pub apply_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub role_keywords: String,
    pub preferred_locations: Vec<String>,
    pub preferred_mode: Vec<String>,
    pub experience_level: String,
    pub skills: String,
    pub min_match_score: u8,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            role_keywords: String::new(),
            preferred_locations: Vec::new(),
            preferred_mode: Vec::new(),
            experience_level: String::new(),
            skills: String::new(),
            min_match_score: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "Not Applied")]
    #[value(name = "not-applied")]
    NotApplied,
    Applied,
    Rejected,
    Selected,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::NotApplied => "Not Applied",
            JobStatus::Applied => "Applied",
            JobStatus::Rejected => "Rejected",
            JobStatus::Selected => "Selected",
        }
    }

    // Stored values outside the enum are coerced to the default rather than
    // propagated.
    pub fn parse_loose(s: &str) -> JobStatus {
        match s {
            "Applied" => JobStatus::Applied,
            "Rejected" => JobStatus::Rejected,
            "Selected" => JobStatus::Selected,
            _ => JobStatus::NotApplied,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub status: JobStatus,
    pub changed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: Job,
    pub match_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDigest {
    pub date: String,
    pub jobs: Vec<ScoredJob>,
}
