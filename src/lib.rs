//! # Jira Analytics Library
//!
//! `jira_analytics` turns the resolved issues of a Jira project into summary
//! statistics and charts: resolution-time distributions, a created-vs-closed
//! timeline, per-assignee and per-priority counts.
//!
//! ## Features
//!
//! - Tolerant timestamp parsing with diagnostics instead of failures
//! - Created-vs-closed timeline that switches between daily, smoothed and
//!   monthly series depending on how many days the data spans
//! - Paged fetching from the Jira REST search endpoint
//! - PNG charts for every view
//! - JSON export of every view at once
//!
//! ## Example
//!
//! ```no_run
//! use jira_analytics::{IssueAggregator, parse_issue_dump};
//!
//! let text = std::fs::read_to_string("dump.json").unwrap();
//! let issues = parse_issue_dump(&text, "dump.json").unwrap();
//! let aggregator = IssueAggregator::new(issues);
//!
//! let report = aggregator.timeline();
//! println!(
//!     "{}: {} created, {} closed",
//!     report.strategy(),
//!     report.total_created,
//!     report.total_closed
//! );
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod jira;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analysis::{CollectingSink, Diagnostic, DiagnosticSink, IssueAggregator};
pub use config::Config;
pub use error::{AnalyticsError, ParseFailure, Result};
pub use jira::{parse_issue_dump, JiraClient};
pub use plotting::ChartRenderer;
pub use types::{AnalyticsSnapshot, Issue, Timeline, TimelineReport, TimelineStrategy, User};
