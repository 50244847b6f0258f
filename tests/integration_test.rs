use chrono::NaiveDate;
use jira_analytics::analysis::diagnostics::TimestampField;
use jira_analytics::app::{run_interactive, MenuHandler};
use jira_analytics::types::NO_PRIORITY_LABEL;
use jira_analytics::{
    parse_issue_dump, ChartRenderer, CollectingSink, Diagnostic, IssueAggregator,
    TimelineStrategy,
};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

const SEARCH_RESPONSE: &str = include_str!("fixtures/search_response.json");

fn load_fixture() -> (IssueAggregator, Arc<CollectingSink>) {
    let issues = parse_issue_dump(SEARCH_RESPONSE, "search_response.json").unwrap();
    let sink = Arc::new(CollectingSink::new());
    (IssueAggregator::with_sink(issues, sink.clone()), sink)
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

#[test]
fn test_resolution_days_from_search_response() {
    let (aggregator, sink) = load_fixture();
    assert_eq!(aggregator.issue_count(), 5);

    // KAFKA-4 has no usable creation date, KAFKA-5 was resolved before it was created.
    assert_eq!(aggregator.resolution_days(0, 3650), vec![4, 8, 0]);

    let diagnostics = sink.take();
    assert_eq!(diagnostics.len(), 2);
    assert!(matches!(
        &diagnostics[0],
        Diagnostic::UnparseableTimestamp {
            issue_key: Some(key),
            field: TimestampField::Created,
            ..
        } if key == "KAFKA-4"
    ));
    assert!(matches!(
        &diagnostics[1],
        Diagnostic::ResolvedBeforeCreated { issue_key: Some(key), .. } if key == "KAFKA-5"
    ));
}

#[test]
fn test_grouping_and_counts_from_search_response() {
    let (aggregator, _sink) = load_fixture();

    let by_status = aggregator.resolution_days_by_status(0, 3650);
    assert_eq!(by_status.get("Closed"), Some(&vec![4, 0]));
    assert_eq!(by_status.get("Resolved"), Some(&vec![8]));

    let users = aggregator.user_counts();
    assert_eq!(
        users.top(4),
        vec![
            ("Alice".to_string(), 3),
            ("Bob".to_string(), 3),
            ("Carol".to_string(), 1),
            ("Unknown".to_string(), 1),
        ]
    );

    let time_spent = aggregator.time_spent_days();
    assert_eq!(time_spent.len(), 2);
    assert!((time_spent[0] - 7200.0 / 86_400.0).abs() < 1e-9);
    assert_eq!(time_spent[1], 8.0);

    let shares = aggregator.priority_shares();
    let labels: Vec<&str> = shares.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["High", "Major", NO_PRIORITY_LABEL]);
    assert!((shares[0].percent - 40.0).abs() < 1e-9);
    assert!((shares[2].percent - 20.0).abs() < 1e-9);
}

#[test]
fn test_timeline_from_search_response() {
    let (aggregator, _sink) = load_fixture();
    let report = aggregator.timeline();

    assert_eq!(report.strategy(), TimelineStrategy::Raw);
    assert_eq!(report.distinct_days, 6);
    assert_eq!(report.total_created, 4);
    assert_eq!(report.total_closed, 3);
    assert_eq!(report.issue_count, 5);

    let dates: Vec<NaiveDate> = report.timeline.plot_points().iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![date(1, 1), date(1, 2), date(1, 3), date(1, 5), date(1, 9), date(1, 10)]
    );
}

#[test]
fn test_snapshot_exports_as_json() {
    let (aggregator, _sink) = load_fixture();
    let snapshot = aggregator.snapshot();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["issue_count"], 5);
    assert_eq!(json["resolution_days"], serde_json::json!([4, 8, 0]));
    assert_eq!(json["timeline"]["timeline"]["strategy"], "raw");
    assert_eq!(json["timeline"]["timeline"]["points"][0]["date"], "2024-01-01");
    assert_eq!(json["user_counts"]["Alice"], 3);
    assert_eq!(json["priority_shares"][0]["label"], "High");
}

#[test]
fn test_queries_are_repeatable() {
    let (aggregator, _sink) = load_fixture();
    assert_eq!(aggregator.snapshot(), aggregator.snapshot());
}

#[test]
fn test_menu_session_over_search_response() {
    let temp_dir = TempDir::new().unwrap();
    let (aggregator, _sink) = load_fixture();
    let handler = MenuHandler::new(aggregator, ChartRenderer::new("KAFKA", temp_dir.path()));
    let mut output = Vec::new();

    run_interactive(&handler, "KAFKA", Cursor::new("x\n0\n"), &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Issues loaded: 5"));
    assert!(text.contains("Invalid choice"));
}
