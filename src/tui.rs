use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::actions;
use crate::models::{JobStatus, ScoredJob};
use crate::saved::SavedJobsStore;
use crate::score::{ScoreBand, score_band};
use crate::status::StatusStore;

struct AppState {
    jobs: Vec<ScoredJob>,
    selected: usize,
    scroll_offset: u16,
    message: Option<String>,
}

impl AppState {
    fn new(jobs: Vec<ScoredJob>) -> Self {
        Self {
            jobs,
            selected: 0,
            scroll_offset: 0,
            message: None,
        }
    }

    fn current_job(&self) -> Option<&ScoredJob> {
        self.jobs.get(self.selected)
    }

    fn next(&mut self) {
        if !self.jobs.is_empty() && self.selected < self.jobs.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

pub fn run_browse(
    jobs: Vec<ScoredJob>,
    statuses: &mut StatusStore,
    saved: &mut SavedJobsStore,
) -> Result<()> {
    if jobs.is_empty() {
        println!("No jobs match the current filters.");
        return Ok(());
    }

    let mut state = AppState::new(jobs);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, statuses, saved);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    statuses: &mut StatusStore,
    saved: &mut SavedJobsStore,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, statuses, saved, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let prev_selected = state.selected;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('n') => set_status(state, statuses, JobStatus::NotApplied),
                KeyCode::Char('a') => set_status(state, statuses, JobStatus::Applied),
                KeyCode::Char('x') => set_status(state, statuses, JobStatus::Rejected),
                KeyCode::Char('s') => set_status(state, statuses, JobStatus::Selected),
                KeyCode::Char(' ') => {
                    if let Some(scored) = state.current_job() {
                        let id = scored.job.id.clone();
                        let title = scored.job.title.clone();
                        let now_saved = saved.toggle(&id);
                        state.message = Some(if now_saved {
                            format!("Saved {title}")
                        } else {
                            format!("Removed {title}")
                        });
                    }
                }
                KeyCode::Char('o') => {
                    if let Some(scored) = state.current_job() {
                        let url = scored.job.apply_url.clone();
                        state.message = match actions::open_url(&url) {
                            Ok(()) => Some(format!("Opened {url}")),
                            Err(e) => Some(format!("{e:#}")),
                        };
                    }
                }
                _ => {}
            }
            if state.selected != prev_selected {
                list_state.select(Some(state.selected));
            }
        }
    }
    Ok(())
}

fn set_status(state: &mut AppState, statuses: &mut StatusStore, status: JobStatus) {
    if let Some(scored) = state.current_job() {
        let id = scored.job.id.clone();
        let title = scored.job.title.clone();
        let company = scored.job.company.clone();
        statuses.set(&id, &title, &company, status);
        state.message = Some(format!("{title} -> {status}"));
    }
}

fn status_icon(status: JobStatus) -> &'static str {
    match status {
        JobStatus::NotApplied => " ",
        JobStatus::Applied => "+",
        JobStatus::Rejected => "x",
        JobStatus::Selected => "#",
    }
}

fn status_style(status: JobStatus) -> Style {
    match status {
        JobStatus::NotApplied => Style::default().fg(Color::DarkGray),
        JobStatus::Applied => Style::default().fg(Color::Cyan),
        JobStatus::Rejected => Style::default().fg(Color::Red),
        JobStatus::Selected => Style::default().fg(Color::Green),
    }
}

fn band_color(score: u8) -> Color {
    match score_band(score) {
        ScoreBand::Green => Color::Green,
        ScoreBand::Amber => Color::Yellow,
        ScoreBand::Neutral => Color::White,
        ScoreBand::Grey => Color::DarkGray,
    }
}

fn draw(
    frame: &mut Frame,
    state: &AppState,
    statuses: &StatusStore,
    saved: &SavedJobsStore,
    list_state: &mut ListState,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(frame.area());

    // Left panel: job list
    let items: Vec<ListItem> = state
        .jobs
        .iter()
        .map(|scored| {
            let job = &scored.job;
            let icon = status_icon(statuses.get(&job.id));
            let star = if saved.is_saved(&job.id) { "*" } else { " " };
            let title = if job.title.len() > 30 {
                format!("{}...", &job.title[..27])
            } else {
                job.title.clone()
            };
            ListItem::new(format!(
                "{}{} {:>3}% {} | {}",
                icon, star, scored.match_score, title, job.company
            ))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Jobs ({}) ", state.jobs.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = build_detail(state, statuses, saved);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer help / status line
    let help_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let footer = match &state.message {
        Some(message) => message.as_str(),
        None => {
            " j/k:navigate  J/K:scroll  space:save  n/a/x/s:status  o:open apply link  q:quit"
        }
    };
    let help = Paragraph::new(footer).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area[1]);
}

fn build_detail<'a>(
    state: &'a AppState,
    statuses: &StatusStore,
    saved: &SavedJobsStore,
) -> Text<'a> {
    let Some(scored) = state.current_job() else {
        return Text::raw("No job selected");
    };
    let job = &scored.job;

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        &job.title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company)));
    lines.push(Line::from(format!(
        "{} | {} | {}",
        job.location, job.mode, job.experience
    )));
    lines.push(Line::from(format!("Salary: {}", job.salary_range)));
    lines.push(Line::from(format!(
        "Source: {} | Posted {} day(s) ago",
        job.source, job.posted_days_ago
    )));

    let status = statuses.get(&job.id);
    lines.push(Line::from(Span::styled(
        format!("Status: {}", status),
        status_style(status),
    )));
    if saved.is_saved(&job.id) {
        lines.push(Line::from(Span::styled(
            "Saved",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("Match: {}%", scored.match_score),
        Style::default().fg(band_color(scored.match_score)),
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(format!("Skills: {}", job.skills.join(", "))));
    lines.push(Line::from(format!("Apply: {}", job.apply_url)));
    lines.push(Line::from(""));

    for line in textwrap::fill(&job.description, 70).lines() {
        lines.push(Line::from(line.to_string()));
    }

    Text::from(lines)
}
