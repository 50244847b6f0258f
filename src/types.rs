//! # Common Types
//!
//! This module contains the types shared by the aggregation core, the tracker
//! client and the chart renderer: the immutable [`Issue`] record, explicit tally
//! maps, and the timeline series produced by the strategy selector.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Label used for issues that carry no priority.
pub const NO_PRIORITY_LABEL: &str = "no priority";

/// Label used for a user object that carries no display name.
pub const UNKNOWN_USER_LABEL: &str = "Unknown";

/// A person attached to an issue as assignee or reporter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Display name, when the tracker supplied one
    pub display_name: Option<String>,
}

impl User {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
        }
    }

    /// Name used when tallying, falling back to [`UNKNOWN_USER_LABEL`].
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(UNKNOWN_USER_LABEL)
    }
}

/// A resolved (or still open) issue as handed over by the tracker client.
///
/// Timestamps are kept as the raw tracker strings; they are parsed lazily by each
/// aggregation so that one malformed value only affects the views that need it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Issue {
    /// Tracker key such as `KAFKA-123`, used only to label diagnostics
    pub key: Option<String>,
    /// Creation timestamp
    pub created: String,
    /// Resolution timestamp; `None` means unresolved
    pub resolution_date: Option<String>,
    /// Workflow status name
    pub status_name: String,
    pub assignee: Option<User>,
    pub reporter: Option<User>,
    /// Priority name; `None` is tallied under [`NO_PRIORITY_LABEL`]
    pub priority_name: Option<String>,
    /// Logged work in seconds
    pub time_spent_seconds: Option<f64>,
}

impl Issue {
    pub fn is_resolved(&self) -> bool {
        self.resolution_date.is_some()
    }

    pub fn priority_label(&self) -> &str {
        self.priority_name.as_deref().unwrap_or(NO_PRIORITY_LABEL)
    }
}

/// Number of events per calendar date.
///
/// Lookups of dates that were never incremented return zero; iteration is in
/// ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DateCountMap {
    counts: BTreeMap<NaiveDate, u64>,
}

impl DateCountMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, date: NaiveDate) {
        self.add(date, 1);
    }

    pub fn add(&mut self, date: NaiveDate, amount: u64) {
        *self.counts.entry(date).or_insert(0) += amount;
    }

    /// Count for `date`, zero when absent.
    pub fn count(&self, date: NaiveDate) -> u64 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.counts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.counts.iter().map(|(date, count)| (*date, *count))
    }
}

impl FromIterator<(NaiveDate, u64)> for DateCountMap {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (date, count) in iter {
            map.add(date, count);
        }
        map
    }
}

/// Number of issues per category label (user, priority).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryCounts {
    counts: BTreeMap<String, u64>,
}

impl CategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: &str) {
        match self.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(label.to_string(), 1);
            }
        }
    }

    /// Count for `label`, zero when absent.
    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Entries ordered by count descending, then label ascending, truncated to `n`.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

    /// Every entry with its percentage of the total, ordered like [`Self::top`].
    pub fn shares(&self) -> Vec<CategoryShare> {
        let total = self.total();
        self.top(self.counts.len())
            .into_iter()
            .map(|(label, count)| CategoryShare {
                percent: if total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / total as f64
                },
                label,
                count,
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (label, count) in iter {
            *map.counts.entry(label.into()).or_insert(0) += count;
        }
        map
    }
}

/// One category with its share of the whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: String,
    pub count: u64,
    /// Share of the total in percent (0–100)
    pub percent: f64,
}

/// How the created-vs-closed timeline was aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStrategy {
    /// One point per day with the literal counts
    Raw,
    /// One point per day, 7-day centered moving average
    Smoothed,
    /// One point per calendar month (keyed by its first day)
    Monthly,
}

impl std::fmt::Display for TimelineStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimelineStrategy::Raw => "daily",
            TimelineStrategy::Smoothed => "7-day moving average",
            TimelineStrategy::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// A single `(date, created, closed)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelinePoint<T> {
    pub date: NaiveDate,
    pub created: T,
    pub closed: T,
}

/// The plottable timeline, tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", content = "points", rename_all = "lowercase")]
pub enum Timeline {
    Raw(Vec<TimelinePoint<u64>>),
    Smoothed(Vec<TimelinePoint<f64>>),
    Monthly(Vec<TimelinePoint<u64>>),
}

impl Timeline {
    pub fn strategy(&self) -> TimelineStrategy {
        match self {
            Timeline::Raw(_) => TimelineStrategy::Raw,
            Timeline::Smoothed(_) => TimelineStrategy::Smoothed,
            Timeline::Monthly(_) => TimelineStrategy::Monthly,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Timeline::Raw(points) | Timeline::Monthly(points) => points.len(),
            Timeline::Smoothed(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Points widened to `f64`, for renderers that do not care about the strategy.
    pub fn plot_points(&self) -> Vec<TimelinePoint<f64>> {
        match self {
            Timeline::Raw(points) | Timeline::Monthly(points) => points
                .iter()
                .map(|p| TimelinePoint {
                    date: p.date,
                    created: p.created as f64,
                    closed: p.closed as f64,
                })
                .collect(),
            Timeline::Smoothed(points) => points.clone(),
        }
    }
}

/// Result of the timeline strategy selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineReport {
    /// The series, tagged with its strategy
    pub timeline: Timeline,
    /// Created issues over the plotted period
    pub total_created: u64,
    /// Closed issues over the plotted period
    pub total_closed: u64,
    /// Number of distinct dates across both input maps
    pub distinct_days: usize,
    /// Size of the issue collection the maps were built from
    pub issue_count: usize,
}

impl TimelineReport {
    pub fn strategy(&self) -> TimelineStrategy {
        self.timeline.strategy()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }
}

/// Every derived view at once, for JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub issue_count: usize,
    pub resolution_days: Vec<i64>,
    pub resolution_days_by_status: BTreeMap<String, Vec<i64>>,
    pub timeline: TimelineReport,
    pub user_counts: CategoryCounts,
    pub time_spent_days: Vec<f64>,
    pub priority_shares: Vec<CategoryShare>,
}
