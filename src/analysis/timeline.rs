//! Created-vs-closed timeline construction.
//!
//! The number of distinct event days decides how the two date-count maps are
//! turned into a series: short histories are plotted day by day, medium ones get
//! a 7-day centered moving average, and anything longer than a year is folded
//! into calendar months so the number of plotted points stays bounded.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::types::{DateCountMap, Timeline, TimelinePoint, TimelineReport, TimelineStrategy};
use crate::utils::{bucket_by_month, SmoothingWindow};

/// Up to this many distinct days the timeline is plotted as-is.
pub const RAW_MAX_DAYS: usize = 90;

/// Up to this many distinct days the timeline is smoothed; beyond it, bucketed by month.
pub const SMOOTHED_MAX_DAYS: usize = 365;

/// Strategy for a timeline spanning `num_days` distinct dates.
pub fn select_strategy(num_days: usize) -> TimelineStrategy {
    if num_days > SMOOTHED_MAX_DAYS {
        TimelineStrategy::Monthly
    } else if num_days > RAW_MAX_DAYS {
        TimelineStrategy::Smoothed
    } else {
        TimelineStrategy::Raw
    }
}

/// Ascending union of the dates present in either map.
fn union_dates(created: &DateCountMap, closed: &DateCountMap) -> Vec<NaiveDate> {
    created
        .dates()
        .chain(closed.dates())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn zero_filled(created: &DateCountMap, closed: &DateCountMap) -> Vec<TimelinePoint<u64>> {
    union_dates(created, closed)
        .into_iter()
        .map(|date| TimelinePoint {
            date,
            created: created.count(date),
            closed: closed.count(date),
        })
        .collect()
}

/// Build the plottable timeline for a pair of created/closed date-count maps.
///
/// `issue_count` is carried through to the report for captions only. Totals are
/// summed over the series that is actually plotted.
pub fn build_timeline(
    created: &DateCountMap,
    closed: &DateCountMap,
    issue_count: usize,
) -> TimelineReport {
    let daily = zero_filled(created, closed);
    let distinct_days = daily.len();
    let strategy = select_strategy(distinct_days);
    tracing::debug!(distinct_days, %strategy, "selected timeline strategy");

    let (timeline, total_created, total_closed) = match strategy {
        TimelineStrategy::Raw => {
            let (c, r) = totals(&daily);
            (Timeline::Raw(daily), c, r)
        }
        TimelineStrategy::Smoothed => {
            let (c, r) = totals(&daily);
            (Timeline::Smoothed(smooth(&daily, SmoothingWindow::WEEK)), c, r)
        }
        TimelineStrategy::Monthly => {
            let monthly = zero_filled(&bucket_by_month(created), &bucket_by_month(closed));
            let (c, r) = totals(&monthly);
            (Timeline::Monthly(monthly), c, r)
        }
    };

    TimelineReport {
        timeline,
        total_created,
        total_closed,
        distinct_days,
        issue_count,
    }
}

fn totals(points: &[TimelinePoint<u64>]) -> (u64, u64) {
    points.iter().fold((0, 0), |(created, closed), p| {
        (created + p.created, closed + p.closed)
    })
}

fn smooth(points: &[TimelinePoint<u64>], window: SmoothingWindow) -> Vec<TimelinePoint<f64>> {
    let created: Vec<f64> = points.iter().map(|p| p.created as f64).collect();
    let closed: Vec<f64> = points.iter().map(|p| p.closed as f64).collect();
    let created = window.apply(&created);
    let closed = window.apply(&closed);

    points
        .iter()
        .zip(created.into_iter().zip(closed))
        .map(|(p, (created, closed))| TimelinePoint {
            date: p.date,
            created,
            closed,
        })
        .collect()
}

/// Keep only the dates inside `start..=end`.
pub fn restrict_to_window(counts: &DateCountMap, start: NaiveDate, end: NaiveDate) -> DateCountMap {
    counts
        .iter()
        .filter(|(date, _)| (start..=end).contains(date))
        .collect()
}
