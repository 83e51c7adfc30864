mod actions;
mod catalog;
mod checklist;
mod digest;
mod models;
mod pipeline;
mod prefs;
mod saved;
mod score;
mod status;
mod storage;
mod tui;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use checklist::{CHECKLIST_ITEMS, ChecklistStore};
use models::{Experience, Job, JobStatus, Mode, ScoredJob, Source};
use pipeline::{Filters, SortKey};
use prefs::PreferenceStore;
use saved::SavedJobsStore;
use status::StatusStore;
use storage::SqliteStorage;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Job tracking dashboard - browse, score, and digest opportunities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Keyword to match against title, company, or description
    #[arg(short, long)]
    keyword: Option<String>,

    /// Filter by exact location
    #[arg(short, long)]
    location: Option<String>,

    /// Filter by work mode
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Filter by experience level
    #[arg(short, long)]
    experience: Option<Experience>,

    /// Filter by job source
    #[arg(long)]
    source: Option<Source>,

    /// Filter by application status
    #[arg(long)]
    status: Option<JobStatus>,

    /// Only show jobs at or above your minimum match score
    #[arg(long)]
    only_matches: bool,

    /// Only show saved jobs
    #[arg(long)]
    saved: bool,

    /// Sort order
    #[arg(long, value_enum, default_value = "latest")]
    sort: SortKey,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs with filters and sorting
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Browse jobs in an interactive dashboard
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show job details
    Show {
        /// Job id
        id: String,
    },

    /// Save a job
    Save {
        /// Job id
        id: String,
    },

    /// Remove a job from saved
    Unsave {
        /// Job id
        id: String,
    },

    /// List saved jobs
    Saved,

    /// Manage application status
    Status {
        #[command(subcommand)]
        command: StatusCommands,
    },

    /// Show today's digest of top matches
    Digest {
        /// Copy the digest text to the clipboard
        #[arg(long)]
        copy: bool,

        /// Open a prefilled email compose window
        #[arg(long)]
        email: bool,
    },

    /// Manage matching preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },

    /// Manage the pre-ship test checklist
    Checklist {
        #[command(subcommand)]
        command: Option<ChecklistCommands>,
    },

    /// Show the ship gate
    Ship,

    /// Open a job's apply link in the browser
    Apply {
        /// Job id
        id: String,
    },
}

#[derive(Subcommand)]
enum StatusCommands {
    /// Set the application status for a job
    Set {
        /// Job id
        id: String,

        /// New status
        status: JobStatus,
    },

    /// Show recent status changes (newest first)
    Log,
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Show current preferences
    Show,

    /// Update preference fields (unset fields are left as they are)
    Set {
        /// Comma-separated role keywords matched against titles and descriptions
        #[arg(long)]
        role_keywords: Option<String>,

        /// Comma-separated preferred locations
        #[arg(long)]
        locations: Option<String>,

        /// Comma-separated preferred work modes (Remote, Hybrid, Onsite)
        #[arg(long)]
        modes: Option<String>,

        /// Experience level (fresher, 0-1, 1-3, 3-5); empty means any
        #[arg(long)]
        experience: Option<String>,

        /// Comma-separated skills
        #[arg(long)]
        skills: Option<String>,

        /// Minimum match score for digests and the only-matches filter
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_score: Option<u8>,
    },

    /// Reset preferences to defaults
    Clear,
}

#[derive(Subcommand)]
enum ChecklistCommands {
    /// Toggle a checklist item
    Toggle {
        /// Checklist item id
        id: String,
    },

    /// Mark every item as not passed
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let jobs = catalog::load()?;
    let storage = SqliteStorage::open()?;

    let mut prefs = PreferenceStore::new(&storage);
    prefs.load();
    let mut saved = SavedJobsStore::new(&storage);
    saved.load();
    let mut statuses = StatusStore::new(&storage);
    statuses.load();
    let mut checklist = ChecklistStore::new(&storage);
    checklist.load();

    // Stores must be hydrated before anything trusts their state
    debug_assert!(
        prefs.is_loaded() && saved.is_loaded() && statuses.is_loaded() && checklist.is_loaded()
    );

    match cli.command {
        Commands::List { filters } => {
            let view = filtered_view(&jobs, &filters, &prefs, &saved, &statuses);
            print_job_table(&view, &statuses);
        }

        Commands::Browse { filters } => {
            let view = filtered_view(&jobs, &filters, &prefs, &saved, &statuses);
            tui::run_browse(view, &mut statuses, &mut saved)?;
        }

        Commands::Show { id } => match catalog::find(&jobs, &id) {
            Some(job) => {
                let score = score::match_score(job, prefs.get());
                println!("{}", job.title);
                println!("Company: {}", job.company);
                println!("Location: {} | {} | {}", job.location, job.mode, job.experience);
                println!("Salary: {}", job.salary_range);
                println!(
                    "Source: {} | Posted {} day(s) ago",
                    job.source, job.posted_days_ago
                );
                println!("Match: {}%", score);
                println!("Status: {}", statuses.get(&job.id));
                println!("Saved: {}", if saved.is_saved(&job.id) { "yes" } else { "no" });
                println!("Skills: {}", job.skills.join(", "));
                println!("Apply: {}", job.apply_url);
                println!("\n{}", job.description);
            }
            None => println!("Job '{}' not found.", id),
        },

        Commands::Save { id } => {
            if catalog::find(&jobs, &id).is_none() {
                println!("Job '{}' not found.", id);
            } else {
                saved.save(&id);
                println!("Saved {}.", id);
            }
        }

        Commands::Unsave { id } => {
            saved.unsave(&id);
            println!("Removed {} from saved jobs.", id);
        }

        Commands::Saved => {
            // Ids whose jobs left the catalog are skipped, not errors
            let scored: Vec<ScoredJob> = saved
                .ids()
                .iter()
                .filter_map(|id| catalog::find(&jobs, id))
                .map(|job| ScoredJob {
                    job: job.clone(),
                    match_score: score::match_score(job, prefs.get()),
                })
                .collect();
            if scored.is_empty() {
                println!("No saved jobs.");
            } else {
                print_job_table(&scored, &statuses);
            }
        }

        Commands::Status { command } => match command {
            StatusCommands::Set { id, status } => match catalog::find(&jobs, &id) {
                Some(job) => {
                    statuses.set(&job.id, &job.title, &job.company, status);
                    println!("{} -> {}", job.title, status);
                }
                None => println!("Job '{}' not found.", id),
            },
            StatusCommands::Log => {
                if statuses.updates().is_empty() {
                    println!("No status changes recorded.");
                } else {
                    println!("{:<22} {:<12} {:<28} {:<18}", "CHANGED", "STATUS", "TITLE", "COMPANY");
                    println!("{}", "-".repeat(82));
                    for update in statuses.updates() {
                        println!(
                            "{:<22} {:<12} {:<28} {:<18}",
                            truncate(&update.changed_at, 20),
                            update.status,
                            truncate(&update.title, 26),
                            truncate(&update.company, 16)
                        );
                    }
                }
            }
        },

        Commands::Digest { copy, email } => {
            let today = chrono::Local::now().date_naive();
            let daily = digest::build_or_load(&storage, &jobs, prefs.get(), today);
            let text = digest::render_text(&daily);
            println!("{}", text);

            if copy {
                match actions::copy_to_clipboard(&text) {
                    Ok(()) => println!("Copied digest to clipboard."),
                    Err(e) => println!("{e:#}"),
                }
            }
            if email {
                match actions::open_url(&digest::mailto_url(&daily)) {
                    Ok(()) => println!("Opened email compose window."),
                    Err(e) => println!("{e:#}"),
                }
            }
        }

        Commands::Prefs { command } => match command {
            PrefsCommands::Show => {
                let p = prefs.get();
                println!("Role keywords: {}", display_or_any(&p.role_keywords));
                println!("Locations: {}", display_or_any(&p.preferred_locations.join(", ")));
                println!("Modes: {}", display_or_any(&p.preferred_mode.join(", ")));
                println!("Experience: {}", display_or_any(&p.experience_level));
                println!("Skills: {}", display_or_any(&p.skills));
                println!("Minimum match score: {}", p.min_match_score);
                if !prefs.has_preferences() {
                    println!("\nNo preferences set; scores only reflect recency and source.");
                }
            }
            PrefsCommands::Set {
                role_keywords,
                locations,
                modes,
                experience,
                skills,
                min_score,
            } => {
                let mut updated = prefs.get().clone();
                if let Some(value) = role_keywords {
                    updated.role_keywords = value;
                }
                if let Some(value) = locations {
                    updated.preferred_locations = split_list(&value);
                }
                if let Some(value) = modes {
                    updated.preferred_mode = split_list(&value);
                }
                if let Some(value) = experience {
                    updated.experience_level = value.trim().to_string();
                }
                if let Some(value) = skills {
                    updated.skills = value;
                }
                if let Some(value) = min_score {
                    updated.min_match_score = value;
                }
                prefs.set(updated);
                println!("Preferences updated.");
            }
            PrefsCommands::Clear => {
                prefs.clear();
                println!("Preferences reset to defaults.");
            }
        },

        Commands::Checklist { command } => {
            match command {
                None => {
                    for item in &CHECKLIST_ITEMS {
                        let mark = if checklist.is_passed(item.id) { "x" } else { " " };
                        println!("[{}] {:<26} {}", mark, item.id, item.label);
                        println!("    {}", item.how_to_test);
                    }
                    println!(
                        "\nPassed: {} / {}",
                        checklist.passed_count(),
                        checklist.total_count()
                    );
                }
                Some(ChecklistCommands::Toggle { id }) => match checklist.toggle(&id) {
                    Some(true) => println!("Marked '{}' as passed.", id),
                    Some(false) => println!("Marked '{}' as not passed.", id),
                    None => println!("Unknown checklist item '{}'.", id),
                },
                Some(ChecklistCommands::Reset) => {
                    checklist.reset();
                    println!("Checklist reset.");
                }
            }
        }

        Commands::Ship => {
            if checklist.all_passed() {
                println!("All tests passed. Ship gate unlocked.");
            } else {
                println!("Complete all tests before shipping.");
            }
            println!(
                "Tests passed: {} / {}",
                checklist.passed_count(),
                checklist.total_count()
            );
        }

        Commands::Apply { id } => match catalog::find(&jobs, &id) {
            Some(job) => match actions::open_url(&job.apply_url) {
                Ok(()) => println!("Opened {}", job.apply_url),
                Err(e) => println!("{e:#}"),
            },
            None => println!("Job '{}' not found.", id),
        },
    }

    Ok(())
}

fn filtered_view(
    jobs: &[Job],
    args: &FilterArgs,
    prefs: &PreferenceStore,
    saved: &SavedJobsStore,
    statuses: &StatusStore,
) -> Vec<ScoredJob> {
    let mut scored = score::score_all(jobs, prefs.get());
    if args.saved {
        scored.retain(|s| saved.is_saved(&s.job.id));
    }
    let filters = Filters {
        keyword: args.keyword.clone(),
        location: args.location.clone(),
        mode: args.mode,
        experience: args.experience,
        source: args.source,
        status: args.status,
        only_matches: args.only_matches,
    };
    pipeline::apply(
        &scored,
        &filters,
        args.sort,
        prefs.get().min_match_score,
        |id| statuses.get(id),
    )
}

fn print_job_table(view: &[ScoredJob], statuses: &StatusStore) {
    if view.is_empty() {
        println!("No jobs found.");
        return;
    }
    println!(
        "{:<9} {:>5} {:<12} {:<28} {:<16} {:<12} {:>7}",
        "ID", "MATCH", "STATUS", "TITLE", "COMPANY", "LOCATION", "POSTED"
    );
    println!("{}", "-".repeat(96));
    for scored in view {
        let job = &scored.job;
        println!(
            "{:<9} {:>4}% {:<12} {:<28} {:<16} {:<12} {:>6}d",
            job.id,
            scored.match_score,
            statuses.get(&job.id).to_string(),
            truncate(&job.title, 26),
            truncate(&job.company, 14),
            truncate(&job.location, 10),
            job.posted_days_ago
        );
    }
    println!("\n{} job(s) found", view.len());
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn display_or_any(value: &str) -> &str {
    if value.is_empty() { "(any)" } else { value }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list(" Bangalore , Pune ,,Remote"),
            vec!["Bangalore", "Pune", "Remote"]
        );
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long job title here", 10), "a very ...");
    }
}
