use chrono::NaiveDate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use crate::models::{DailyDigest, Job, Preferences};
use crate::score;
use crate::storage::{self, Storage};

const DIGEST_SIZE: usize = 10;

// Unreserved characters per RFC 3986 stay literal; everything else is
// escaped.
const MAILTO_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

fn digest_key(date: NaiveDate) -> String {
    format!("digest:{}", date.format("%Y-%m-%d"))
}

// At most one digest per calendar day: a stored digest for `today` is
// returned unchanged, even if the catalog or preferences moved since.
pub fn build_or_load(
    storage: &dyn Storage,
    jobs: &[Job],
    prefs: &Preferences,
    today: NaiveDate,
) -> DailyDigest {
    let key = digest_key(today);
    if let Some(value) = storage::load_json(storage, &key) {
        if let Ok(digest) = serde_json::from_value::<DailyDigest>(value) {
            debug!("returning stored digest for {}", digest.date);
            return digest;
        }
    }

    let digest = build(jobs, prefs, today);
    storage::persist(storage, &key, &digest);
    digest
}

fn build(jobs: &[Job], prefs: &Preferences, today: NaiveDate) -> DailyDigest {
    let mut scored = score::score_all(jobs, prefs);
    scored.retain(|s| s.match_score >= prefs.min_match_score);
    // Score descending; earlier-posted wins ties
    scored.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then(a.job.posted_days_ago.cmp(&b.job.posted_days_ago))
    });
    scored.truncate(DIGEST_SIZE);

    DailyDigest {
        date: today.format("%Y-%m-%d").to_string(),
        jobs: scored,
    }
}

pub fn render_text(digest: &DailyDigest) -> String {
    let mut out = String::new();
    out.push_str(&format!("Daily Job Digest - {}\n\n", digest.date));
    for (i, scored) in digest.jobs.iter().enumerate() {
        let job = &scored.job;
        out.push_str(&format!(
            "{}. {} at {} | {} | {} | Match: {}% | Apply: {}\n",
            i + 1,
            job.title,
            job.company,
            job.location,
            job.experience,
            scored.match_score,
            job.apply_url
        ));
    }
    out.push_str("\nTune your preferences to change tomorrow's matches.\n");
    out
}

pub fn mailto_url(digest: &DailyDigest) -> String {
    let subject = format!("Job Digest {}", digest.date);
    let body = render_text(digest);
    format!(
        "mailto:?subject={}&body={}",
        utf8_percent_encode(&subject, MAILTO_ENCODE),
        utf8_percent_encode(&body, MAILTO_ENCODE)
    )
}
