use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::menu::MenuChoice;
use crate::config::DEFAULT_CONFIG_PATH;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Resolution,
    ByStatus,
    Timeline,
    Users,
    TimeSpent,
    Priority,
    All,
}

impl ReportKind {
    /// Menu entries this report renders.
    pub fn choices(self) -> Vec<MenuChoice> {
        match self {
            ReportKind::Resolution => vec![MenuChoice::ResolutionTime],
            ReportKind::ByStatus => vec![MenuChoice::ResolutionByStatus],
            ReportKind::Timeline => vec![MenuChoice::CreatedVsClosed],
            ReportKind::Users => vec![MenuChoice::TopUsers],
            ReportKind::TimeSpent => vec![MenuChoice::TimeSpent],
            ReportKind::Priority => vec![MenuChoice::PriorityDistribution],
            ReportKind::All => MenuChoice::ALL
                .into_iter()
                .filter(|choice| *choice != MenuChoice::Exit)
                .collect(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "jira-analytics")]
#[command(version)]
#[command(about = "Resolution-time, timeline and workload charts for a Jira project")]
#[command(long_about = "
jira-analytics fetches the resolved issues of a Jira project and renders
charts of resolution times, created vs closed issues, assignee workload,
logged time and priorities.

Example usage:
  jira-analytics                              # Interactive menu
  jira-analytics report timeline --last-days 90
  jira-analytics --input dump.json export --output snapshot.json
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Require jira_url, project_key and max_results in the configuration file
    #[arg(long)]
    pub strict: bool,

    /// Read issues from a saved search response instead of querying Jira
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(long, value_name = "DIR", default_value = "charts")]
    pub output_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Render one report, or every report with `all`
    Report {
        #[arg(value_enum)]
        kind: ReportKind,

        /// Only plot the created vs closed timeline for the last N days
        #[arg(long, value_name = "N")]
        last_days: Option<u64>,
    },
    /// Write every view as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    /// Default `tracing` directive implied by `-v` / `-q`.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
