use super::*;
use crate::analysis::build_timeline;
use crate::types::{CategoryCounts, DateCountMap};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

fn setup_renderer() -> (ChartRenderer, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let renderer = ChartRenderer::new("KAFKA", temp_dir.path().join("charts"));
    (renderer, temp_dir)
}

fn assert_png(path: &std::path::Path) {
    let metadata = fs::metadata(path).unwrap();
    assert!(metadata.len() > 0, "{} is empty", path.display());
}

#[test]
fn test_histogram_bins_cover_every_value() {
    let values = vec![0.0, 1.0, 2.5, 5.0, 9.9, 10.0];
    let bins = histogram_bins(&values, 2);

    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].start, 0.0);
    assert_eq!(bins[1].end, 10.0);
    // The maximum falls into the last bin.
    assert_eq!(bins[0].count, 3);
    assert_eq!(bins[1].count, 3);
}

#[test]
fn test_histogram_bins_single_value() {
    let bins = histogram_bins(&[4.0, 4.0, 4.0], 15);
    assert_eq!(bins.len(), 15);
    assert_eq!(bins[0].count, 3);
    assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 3);
    assert_eq!(bins[0].start, 4.0);
}

#[test]
fn test_histogram_bins_empty() {
    assert!(histogram_bins(&[], 10).is_empty());
    assert!(histogram_bins(&[1.0], 0).is_empty());
    assert!(histogram_bins(&[f64::NAN], 5).is_empty());
}

#[test]
fn test_format_count() {
    assert_eq!(format_count(12.0), "12");
    assert_eq!(format_count(1_500.0), "1.5K");
    assert_eq!(format_count(2_000_000.0), "2.0M");
}

#[test]
fn test_value_range() {
    let (min, max) = value_range(&[1.0, 5.0, 10.0]);
    assert_eq!(min, 0.0);
    assert!((max - 11.0).abs() < 1e-9);

    assert_eq!(value_range(&[]), (0.0, 1.0));
    assert_eq!(value_range(&[0.0, 0.0]), (0.0, 1.0));
}

#[test]
fn test_output_path_uses_project_key() {
    let (renderer, _temp_dir) = setup_renderer();
    let path = renderer.output_path("time_spent").unwrap();

    assert!(renderer.output_dir().is_dir());
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("kafka_time_spent.png")
    );
}

// Rendering needs a system font for captions and labels.
#[test]
#[ignore]
fn test_render_every_chart() {
    let (renderer, _temp_dir) = setup_renderer();
    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();

    let created: DateCountMap = (1..=20).map(|d| (day(d), u64::from(d % 4))).collect();
    let closed: DateCountMap = (3..=25).map(|d| (day(d), 1)).collect();
    let report = build_timeline(&created, &closed, 40);

    let mut by_status = BTreeMap::new();
    by_status.insert("Closed".to_string(), vec![1, 4, 8, 8, 30]);
    by_status.insert("Resolved".to_string(), vec![2, 3]);

    let users: CategoryCounts = [("Ada", 7), ("Grace", 3), ("Unknown", 1)]
        .into_iter()
        .collect();

    let mut paths = vec![
        renderer
            .render_resolution_histogram(&[1, 2, 2, 5, 40])
            .unwrap(),
        renderer.render_timeline(&report).unwrap(),
        renderer.render_top_users(&users).unwrap(),
        renderer.render_time_spent(&[0.5, 1.0, 3.25]).unwrap(),
        renderer
            .render_priority_distribution(&users.shares())
            .unwrap(),
    ];
    paths.extend(renderer.render_status_histograms(&by_status).unwrap());

    assert_eq!(paths.len(), 7);
    for path in &paths {
        assert_png(path);
    }
}

#[test]
#[ignore]
fn test_render_no_data_placeholders() {
    let (renderer, _temp_dir) = setup_renderer();
    let report = build_timeline(&DateCountMap::new(), &DateCountMap::new(), 0);

    assert_png(&renderer.render_resolution_histogram(&[]).unwrap());
    assert_png(&renderer.render_timeline(&report).unwrap());
    assert_png(&renderer.render_top_users(&CategoryCounts::new()).unwrap());
    assert_png(&renderer.render_time_spent(&[]).unwrap());
    assert_png(&renderer.render_priority_distribution(&[]).unwrap());

    let placeholders = renderer.render_status_histograms(&BTreeMap::new()).unwrap();
    assert_eq!(placeholders.len(), 1);
}

#[test]
#[ignore]
fn test_status_histograms_are_capped() {
    let (renderer, _temp_dir) = setup_renderer();
    let by_status: BTreeMap<String, Vec<i64>> = ["A", "B", "C", "D", "E", "F", "G"]
        .iter()
        .map(|s| (s.to_string(), vec![1, 2, 3]))
        .collect();

    let paths = renderer.render_status_histograms(&by_status).unwrap();
    assert_eq!(paths.len(), 5);
    assert!(paths[0].ends_with("kafka_resolution_time_a.png"));
}
