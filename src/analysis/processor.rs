use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::dates::{days_between, parse_optional_timestamp, parse_timestamp};
use super::diagnostics::{Diagnostic, DiagnosticSink, TimestampField, TracingSink};
use super::timeline::build_timeline;
use crate::error::ParseFailure;
use crate::types::{
    AnalyticsSnapshot, CategoryCounts, CategoryShare, DateCountMap, Issue, TimelineReport,
};

/// Lower bound of the default resolution-day filter.
pub const MIN_DAYS: i64 = 0;
/// Upper bound for resolution and time-spent days (ten years).
pub const MAX_DAYS: i64 = 3650;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Computes every derived view over a fixed collection of issues.
///
/// The collection is set at construction and never changes, so every query is
/// recomputed from scratch and calling one twice yields identical results.
pub struct IssueAggregator {
    issues: Vec<Issue>,
    sink: Arc<dyn DiagnosticSink>,
}

impl IssueAggregator {
    /// Aggregator reporting diagnostics through `tracing`.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self::with_sink(issues, Arc::new(TracingSink))
    }

    pub fn with_sink(issues: Vec<Issue>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { issues, sink }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    fn report_parse_failure(&self, issue: &Issue, field: TimestampField, failure: ParseFailure) {
        self.sink.emit(Diagnostic::UnparseableTimestamp {
            issue_key: issue.key.clone(),
            field,
            failure,
        });
    }

    fn parse_field(&self, issue: &Issue, field: TimestampField) -> Option<NaiveDateTime> {
        let parsed = match field {
            TimestampField::Created => parse_timestamp(&issue.created),
            TimestampField::Resolved => parse_optional_timestamp(issue.resolution_date.as_deref()),
        };
        match parsed {
            Ok(dt) => Some(dt),
            Err(failure) => {
                self.report_parse_failure(issue, field, failure);
                None
            }
        }
    }

    /// Whole days from creation to resolution, clamped at zero.
    ///
    /// `None` for unresolved issues and for issues whose timestamps cannot be parsed.
    fn resolution_days_of(&self, issue: &Issue) -> Option<i64> {
        issue.resolution_date.as_ref()?;
        let created = self.parse_field(issue, TimestampField::Created)?;
        let resolved = self.parse_field(issue, TimestampField::Resolved)?;

        match days_between(created, resolved) {
            Ok(days) => Some(days),
            Err(_) => {
                self.sink.emit(Diagnostic::ResolvedBeforeCreated {
                    issue_key: issue.key.clone(),
                    created,
                    resolved,
                });
                Some(0)
            }
        }
    }

    /// Resolution times in days within `min_days..=max_days`, in issue order.
    pub fn resolution_days(&self, min_days: i64, max_days: i64) -> Vec<i64> {
        self.issues
            .iter()
            .filter_map(|issue| self.resolution_days_of(issue))
            .filter(|days| (min_days..=max_days).contains(days))
            .collect()
    }

    /// Resolution times grouped by status name.
    pub fn resolution_days_by_status(
        &self,
        min_days: i64,
        max_days: i64,
    ) -> BTreeMap<String, Vec<i64>> {
        let mut groups: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for issue in &self.issues {
            let Some(days) = self.resolution_days_of(issue) else {
                continue;
            };
            if (min_days..=max_days).contains(&days) {
                groups
                    .entry(issue.status_name.clone())
                    .or_default()
                    .push(days);
            }
        }
        groups
    }

    /// Issues created and closed per calendar date.
    ///
    /// An issue whose creation timestamp cannot be parsed is skipped entirely; an
    /// unparseable resolution timestamp only drops the closed side.
    pub fn created_and_closed_counts(&self) -> (DateCountMap, DateCountMap) {
        let mut created = DateCountMap::new();
        let mut closed = DateCountMap::new();

        for issue in &self.issues {
            let Some(created_at) = self.parse_field(issue, TimestampField::Created) else {
                continue;
            };
            created.increment(created_at.date());

            if issue.is_resolved() {
                if let Some(resolved_at) = self.parse_field(issue, TimestampField::Resolved) {
                    closed.increment(resolved_at.date());
                }
            }
        }

        (created, closed)
    }

    /// Created-vs-closed timeline over the whole collection.
    pub fn timeline(&self) -> TimelineReport {
        let (created, closed) = self.created_and_closed_counts();
        build_timeline(&created, &closed, self.issue_count())
    }

    /// Issue count per user; assignee and reporter are counted independently.
    pub fn user_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::new();
        for issue in &self.issues {
            for user in [&issue.assignee, &issue.reporter].into_iter().flatten() {
                counts.increment(user.label());
            }
        }
        counts
    }

    /// Time spent per issue in days.
    ///
    /// Logged work is preferred; without a usable value the resolution time is
    /// used instead. Only values in `(0, 3650]` are kept.
    pub fn time_spent_days(&self) -> Vec<f64> {
        let in_range = |days: f64| days > 0.0 && days <= MAX_DAYS as f64;

        self.issues
            .iter()
            .filter_map(|issue| {
                let logged = issue
                    .time_spent_seconds
                    .map(|secs| secs / SECONDS_PER_DAY)
                    .filter(|days| in_range(*days));
                logged.or_else(|| {
                    self.resolution_days_of(issue)
                        .map(|days| days as f64)
                        .filter(|days| in_range(*days))
                })
            })
            .collect()
    }

    /// Issue count per priority name.
    pub fn priority_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::new();
        for issue in &self.issues {
            counts.increment(issue.priority_label());
        }
        counts
    }

    /// Priorities with their percentage of all issues, most common first.
    pub fn priority_shares(&self) -> Vec<CategoryShare> {
        self.priority_counts().shares()
    }

    /// Every view at once, with the default day bounds.
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            issue_count: self.issue_count(),
            resolution_days: self.resolution_days(MIN_DAYS, MAX_DAYS),
            resolution_days_by_status: self.resolution_days_by_status(MIN_DAYS, MAX_DAYS),
            timeline: self.timeline(),
            user_counts: self.user_counts(),
            time_spent_days: self.time_spent_days(),
            priority_shares: self.priority_shares(),
        }
    }
}

impl std::fmt::Debug for IssueAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueAggregator")
            .field("issues", &self.issues.len())
            .finish_non_exhaustive()
    }
}
