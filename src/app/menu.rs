use chrono::{Days, NaiveDate};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::analysis::{build_timeline, restrict_to_window, IssueAggregator, MAX_DAYS, MIN_DAYS};
use crate::error::Result;
use crate::plotting::ChartRenderer;
use crate::types::TimelineReport;

const RULE_WIDTH: usize = 60;

/// One entry of the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    ResolutionTime,
    ResolutionByStatus,
    CreatedVsClosed,
    TopUsers,
    TimeSpent,
    PriorityDistribution,
    Exit,
}

impl MenuChoice {
    /// Menu order; `Exit` is listed last.
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::ResolutionTime,
        MenuChoice::ResolutionByStatus,
        MenuChoice::CreatedVsClosed,
        MenuChoice::TopUsers,
        MenuChoice::TimeSpent,
        MenuChoice::PriorityDistribution,
        MenuChoice::Exit,
    ];

    pub fn key(self) -> char {
        match self {
            MenuChoice::Exit => '0',
            MenuChoice::ResolutionTime => '1',
            MenuChoice::ResolutionByStatus => '2',
            MenuChoice::CreatedVsClosed => '3',
            MenuChoice::TopUsers => '4',
            MenuChoice::TimeSpent => '5',
            MenuChoice::PriorityDistribution => '6',
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MenuChoice::ResolutionTime => "Resolution time histogram",
            MenuChoice::ResolutionByStatus => "Resolution time by status",
            MenuChoice::CreatedVsClosed => "Created vs closed timeline",
            MenuChoice::TopUsers => "Top users",
            MenuChoice::TimeSpent => "Time spent histogram",
            MenuChoice::PriorityDistribution => "Priority distribution",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Parse a line typed by the user; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        MenuChoice::ALL
            .into_iter()
            .find(|choice| input.len() == 1 && input.starts_with(choice.key()))
    }
}

pub fn render_menu(project_key: &str, issue_count: usize) -> String {
    let mut text = String::new();
    text.push('\n');
    text.push_str(&"=".repeat(RULE_WIDTH));
    text.push_str(&format!("\nJira analytics for project: {project_key}\n"));
    text.push_str(&format!("Issues loaded: {issue_count}\n"));
    text.push_str(&"=".repeat(RULE_WIDTH));
    text.push('\n');
    for choice in MenuChoice::ALL {
        text.push_str(&format!("{}. {}\n", choice.key(), choice.title()));
    }
    text.push_str(&"-".repeat(RULE_WIDTH));
    text.push('\n');
    text
}

/// What running a menu entry produced.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuOutcome {
    Rendered { files: Vec<PathBuf>, summary: String },
    Exit,
}

/// Runs menu entries against one loaded issue collection.
#[derive(Debug)]
pub struct MenuHandler {
    aggregator: IssueAggregator,
    renderer: ChartRenderer,
    window: Option<(NaiveDate, NaiveDate)>,
}

impl MenuHandler {
    pub fn new(aggregator: IssueAggregator, renderer: ChartRenderer) -> Self {
        Self {
            aggregator,
            renderer,
            window: None,
        }
    }

    /// Limit the timeline to the inclusive window `[today - days, today]`.
    pub fn with_last_days(mut self, today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        self.window = Some((start, today));
        self
    }

    pub fn aggregator(&self) -> &IssueAggregator {
        &self.aggregator
    }

    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.window
    }

    /// The created-vs-closed report, restricted to the window when one is set.
    pub fn timeline_report(&self) -> TimelineReport {
        let Some((start, end)) = self.window else {
            return self.aggregator.timeline();
        };
        let (created, closed) = self.aggregator.created_and_closed_counts();
        build_timeline(
            &restrict_to_window(&created, start, end),
            &restrict_to_window(&closed, start, end),
            self.aggregator.issue_count(),
        )
    }

    pub fn handle(&self, choice: MenuChoice) -> Result<MenuOutcome> {
        let (files, summary) = match choice {
            MenuChoice::Exit => return Ok(MenuOutcome::Exit),
            MenuChoice::ResolutionTime => {
                let days = self.aggregator.resolution_days(MIN_DAYS, MAX_DAYS);
                let file = self.renderer.render_resolution_histogram(&days)?;
                (vec![file], format!("{} resolved issues", days.len()))
            }
            MenuChoice::ResolutionByStatus => {
                let by_status = self.aggregator.resolution_days_by_status(MIN_DAYS, MAX_DAYS);
                let files = self.renderer.render_status_histograms(&by_status)?;
                (files, format!("{} statuses", by_status.len()))
            }
            MenuChoice::CreatedVsClosed => {
                let report = self.timeline_report();
                let file = self.renderer.render_timeline(&report)?;
                let summary = format!(
                    "{} timeline over {} days: {} created, {} closed",
                    report.strategy(),
                    report.distinct_days,
                    report.total_created,
                    report.total_closed
                );
                (vec![file], summary)
            }
            MenuChoice::TopUsers => {
                let users = self.aggregator.user_counts();
                let file = self.renderer.render_top_users(&users)?;
                (vec![file], format!("{} users", users.len()))
            }
            MenuChoice::TimeSpent => {
                let days = self.aggregator.time_spent_days();
                let total: f64 = days.iter().sum();
                let file = self.renderer.render_time_spent(&days)?;
                (
                    vec![file],
                    format!("{} issues, {:.1} days in total", days.len(), total),
                )
            }
            MenuChoice::PriorityDistribution => {
                let shares = self.aggregator.priority_shares();
                let file = self.renderer.render_priority_distribution(&shares)?;
                let summary = shares
                    .iter()
                    .map(|s| format!("{} {:.1}%", s.label, s.percent))
                    .collect::<Vec<_>>()
                    .join(", ");
                (vec![file], summary)
            }
        };
        Ok(MenuOutcome::Rendered { files, summary })
    }
}

/// Show the menu and run entries until the user exits or input ends.
///
/// Failures of a single entry are reported and the loop continues.
pub fn run_interactive<R: BufRead, W: Write>(
    handler: &MenuHandler,
    project_key: &str,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    let mut line = String::new();
    loop {
        write!(
            output,
            "{}",
            render_menu(project_key, handler.aggregator().issue_count())
        )?;
        write!(output, "Choose an option (0-6): ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        let Some(choice) = MenuChoice::parse(&line) else {
            writeln!(output, "Invalid choice, try again.")?;
            continue;
        };

        match handler.handle(choice) {
            Ok(MenuOutcome::Exit) => {
                writeln!(output, "Exiting...")?;
                return Ok(());
            }
            Ok(MenuOutcome::Rendered { files, summary }) => {
                writeln!(output, "{summary}")?;
                for file in files {
                    writeln!(output, "Saved {}", file.display())?;
                }
            }
            Err(e) => {
                tracing::error!("{} failed: {}", choice.title(), e);
                writeln!(output, "Error: {e}")?;
            }
        }

        write!(output, "\nPress Enter to continue...")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }
    }
}
