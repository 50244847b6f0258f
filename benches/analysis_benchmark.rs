/// Benchmark module for the aggregation core.
/// Measures the per-view aggregations and timeline construction over synthetic issues.
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jira_analytics::analysis::{build_timeline, NullSink};
use jira_analytics::types::{Issue, User};
use jira_analytics::IssueAggregator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const STATUSES: [&str; 3] = ["Closed", "Resolved", "Done"];
const PRIORITIES: [&str; 4] = ["Blocker", "Major", "Minor", "Trivial"];

/// Generate `count` resolved issues created within `span_days` days
///
/// # Arguments
/// * `count` - Number of issues
/// * `span_days` - Width of the creation date range
fn generate_issues(count: usize, span_days: i64) -> Vec<Issue> {
    let mut rng = StdRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    (0..count)
        .map(|i| {
            let created = start + Duration::days(rng.gen_range(0..span_days));
            let resolved = created + Duration::hours(rng.gen_range(1..24 * 120));
            Issue {
                key: Some(format!("BENCH-{i}")),
                created: format!("{}.000+0000", created.format("%Y-%m-%dT%H:%M:%S")),
                resolution_date: Some(format!("{}.000+0000", resolved.format("%Y-%m-%dT%H:%M:%S"))),
                status_name: STATUSES[rng.gen_range(0..STATUSES.len())].to_string(),
                assignee: Some(User::named(format!("user{}", rng.gen_range(0..50)))),
                reporter: Some(User::named(format!("user{}", rng.gen_range(0..50)))),
                priority_name: Some(PRIORITIES[rng.gen_range(0..PRIORITIES.len())].to_string()),
                time_spent_seconds: if rng.gen_bool(0.5) {
                    Some(rng.gen_range(600.0..864_000.0))
                } else {
                    None
                },
            }
        })
        .collect()
}

/// Benchmark the per-view aggregations
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for count in [1_000, 10_000] {
        let aggregator = IssueAggregator::with_sink(generate_issues(count, 730), Arc::new(NullSink));

        group.bench_with_input(BenchmarkId::new("resolution_days", count), &aggregator, |b, a| {
            b.iter(|| black_box(a.resolution_days(0, 3650)))
        });
        group.bench_with_input(BenchmarkId::new("created_and_closed", count), &aggregator, |b, a| {
            b.iter(|| black_box(a.created_and_closed_counts()))
        });
        group.bench_with_input(BenchmarkId::new("snapshot", count), &aggregator, |b, a| {
            b.iter(|| black_box(a.snapshot()))
        });
    }

    group.finish();
}

/// Benchmark timeline construction for each strategy
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_timeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeline");

    // Spans chosen to land on the raw, smoothed and monthly strategies.
    for span_days in [60, 300, 1500] {
        let aggregator =
            IssueAggregator::with_sink(generate_issues(5_000, span_days), Arc::new(NullSink));
        let (created, closed) = aggregator.created_and_closed_counts();

        group.bench_with_input(
            BenchmarkId::new("build_timeline", span_days),
            &(created, closed),
            |b, (created, closed)| b.iter(|| black_box(build_timeline(created, closed, 5_000))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_aggregation, bench_timeline);
criterion_main!(benches);
