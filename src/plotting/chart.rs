use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use super::styles::{ChartStyle, ChartTheme};
use crate::error::{AnalyticsError, Result};
use crate::types::{CategoryCounts, CategoryShare, TimelineReport, TimelineStrategy};

type PlotError = Box<dyn Error + Send + Sync>;

pub const RESOLUTION_BINS: usize = 15;
pub const STATUS_BINS: usize = 10;
/// Per-status histograms are drawn for this many statuses at most.
pub const MAX_STATUS_CHARTS: usize = 5;
pub const TOP_USERS: usize = 30;
pub const TIME_SPENT_BINS: usize = 15;

const NO_DATA_TEXT: &str = "No data available";

/// One histogram bar covering `[start, end)`; the last bar is closed on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Split `values` into `bins` equal-width bins between their minimum and maximum.
///
/// Non-finite values are ignored. Returns no bins for empty input; when every
/// value is equal the bins span one unit starting at that value.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for value in finite {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

/// Axis label with K/M suffixes for large numbers.
pub fn format_count(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// Y range for non-negative data: zero up to 10% above the largest value.
pub fn value_range(values: &[f64]) -> (f64, f64) {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        (0.0, 1.0)
    } else {
        (0.0, max * 1.1)
    }
}

/// Lowercase file-name fragment: anything but ASCII letters and digits becomes `_`.
fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes one PNG per analysis into `output_dir`.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    project_key: String,
    output_dir: PathBuf,
    theme: ChartTheme,
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(project_key: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_key: project_key.into(),
            output_dir: output_dir.into(),
            theme: ChartTheme::default(),
            style: ChartStyle::default(),
        }
    }

    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the chart called `name`, creating the output directory if needed.
    pub fn output_path(&self, name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| AnalyticsError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        Ok(self
            .output_dir
            .join(format!("{}_{}.png", file_stem(&self.project_key), name)))
    }

    pub fn render_resolution_histogram(&self, days: &[i64]) -> Result<PathBuf> {
        let values: Vec<f64> = days.iter().map(|d| *d as f64).collect();
        let caption = format!("{} resolution time ({} issues)", self.project_key, days.len());
        self.render("resolution_time", |root| {
            self.draw_histogram(root, &caption, "Days to resolve", &values, RESOLUTION_BINS)
        })
    }

    /// One histogram per status, for the first [`MAX_STATUS_CHARTS`] statuses by name.
    pub fn render_status_histograms(
        &self,
        by_status: &BTreeMap<String, Vec<i64>>,
    ) -> Result<Vec<PathBuf>> {
        if by_status.is_empty() {
            let caption = format!("{} resolution time by status", self.project_key);
            let path = self.render("resolution_time_by_status", |root| {
                self.draw_no_data(root, &caption)
            })?;
            return Ok(vec![path]);
        }

        by_status
            .iter()
            .take(MAX_STATUS_CHARTS)
            .map(|(status, days)| {
                let values: Vec<f64> = days.iter().map(|d| *d as f64).collect();
                let caption = format!(
                    "{} resolution time: {} ({} issues)",
                    self.project_key,
                    status,
                    days.len()
                );
                let name = format!("resolution_time_{}", file_stem(status));
                self.render(&name, |root| {
                    self.draw_histogram(root, &caption, "Days to resolve", &values, STATUS_BINS)
                })
            })
            .collect()
    }

    pub fn render_timeline(&self, report: &TimelineReport) -> Result<PathBuf> {
        self.render("created_vs_closed", |root| self.draw_timeline(root, report))
    }

    pub fn render_top_users(&self, counts: &CategoryCounts) -> Result<PathBuf> {
        self.render("top_users", |root| self.draw_top_users(root, counts))
    }

    pub fn render_time_spent(&self, days: &[f64]) -> Result<PathBuf> {
        let caption = format!("{} time spent ({} issues)", self.project_key, days.len());
        self.render("time_spent", |root| {
            self.draw_histogram(root, &caption, "Days", days, TIME_SPENT_BINS)
        })
    }

    pub fn render_priority_distribution(&self, shares: &[CategoryShare]) -> Result<PathBuf> {
        self.render("priority_distribution", |root| self.draw_priorities(root, shares))
    }

    fn render<F>(&self, name: &str, draw: F) -> Result<PathBuf>
    where
        F: FnOnce(&DrawingArea<BitMapBackend, Shift>) -> std::result::Result<(), PlotError>,
    {
        let path = self.output_path(name)?;
        self.draw_to_file(&path, draw)
            .map_err(|e| AnalyticsError::Visualization(format!("{}: {e}", path.display())))?;
        tracing::info!("saved chart to {}", path.display());
        Ok(path)
    }

    fn draw_to_file<F>(&self, path: &Path, draw: F) -> std::result::Result<(), PlotError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend, Shift>) -> std::result::Result<(), PlotError>,
    {
        let root =
            BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        root.fill(&self.theme.background_color)?;
        draw(&root)?;
        root.present()?;
        Ok(())
    }

    fn caption_font(&self) -> TextStyle<'static> {
        ("sans-serif", self.style.caption_size)
            .into_font()
            .color(&self.theme.text_color)
    }

    fn label_font(&self) -> TextStyle<'static> {
        ("sans-serif", self.style.font_size)
            .into_font()
            .color(&self.theme.text_color)
    }

    fn draw_no_data(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        caption: &str,
    ) -> std::result::Result<(), PlotError> {
        let (width, height) = root.dim_in_pixel();
        let center = ((width / 2) as i32, (height / 2) as i32);
        let centered = Pos::new(HPos::Center, VPos::Center);

        root.draw(&Text::new(
            caption.to_string(),
            (center.0, center.1 - 2 * self.style.caption_size),
            self.caption_font().pos(centered),
        ))?;
        root.draw(&Text::new(
            NO_DATA_TEXT,
            center,
            self.label_font().pos(centered),
        ))?;
        Ok(())
    }

    fn draw_histogram(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        caption: &str,
        x_desc: &str,
        values: &[f64],
        bins: usize,
    ) -> std::result::Result<(), PlotError> {
        let bins = histogram_bins(values, bins);
        let (x_min, x_max) = match (bins.first(), bins.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => return self.draw_no_data(root, caption),
        };
        let counts: Vec<f64> = bins.iter().map(|b| b.count as f64).collect();
        let (y_min, y_max) = value_range(&counts);

        let mut chart = ChartBuilder::on(root)
            .caption(caption, self.caption_font())
            .margin(self.style.margin)
            .set_all_label_area_size(self.style.label_area_size)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(self.theme.grid_color)
            .axis_style(self.theme.axis_color)
            .x_desc(x_desc)
            .y_desc("Issues")
            .label_style(self.label_font())
            .x_label_formatter(&|x: &f64| format!("{:.1}", x))
            .y_label_formatter(&|y: &f64| format_count(*y))
            .draw()?;

        let fill = self.theme.primary_color.mix(0.7).filled();
        chart.draw_series(
            bins.iter()
                .map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], fill)),
        )?;

        Ok(())
    }

    fn draw_timeline(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        report: &TimelineReport,
    ) -> std::result::Result<(), PlotError> {
        let caption = format!(
            "{} created vs closed: {}, {} days ({} created, {} closed)",
            self.project_key,
            report.strategy(),
            report.distinct_days,
            report.total_created,
            report.total_closed
        );
        if report.is_empty() {
            return self.draw_no_data(root, &caption);
        }

        let points = report.timeline.plot_points();
        let date_format = match report.strategy() {
            TimelineStrategy::Monthly => "%Y-%m",
            TimelineStrategy::Raw | TimelineStrategy::Smoothed => "%Y-%m-%d",
        };
        let dates: Vec<String> = points
            .iter()
            .map(|p| p.date.format(date_format).to_string())
            .collect();
        let values: Vec<f64> = points.iter().flat_map(|p| [p.created, p.closed]).collect();
        let (y_min, y_max) = value_range(&values);
        let x_max = points.len().saturating_sub(1).max(1) as f64;

        let mut chart = ChartBuilder::on(root)
            .caption(&caption, self.caption_font())
            .margin(self.style.margin)
            .set_all_label_area_size(self.style.label_area_size)
            .x_label_area_size(self.style.label_area_size * 2)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

        let x_label_formatter = move |x: &f64| {
            let idx = x.round() as usize;
            if idx >= dates.len() {
                return String::new();
            }
            // Show fewer labels to prevent overlap
            let step = (dates.len() / 6).max(1);
            if idx == 0 || idx == dates.len() - 1 || idx % step == 0 {
                dates[idx].clone()
            } else {
                String::new()
            }
        };

        chart
            .configure_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(self.theme.grid_color)
            .axis_style(self.theme.axis_color)
            .y_desc("Issues")
            .label_style(self.label_font())
            .x_label_formatter(&x_label_formatter)
            .x_label_style(
                self.label_font()
                    .transform(FontTransform::Rotate90)
                    .pos(Pos::new(HPos::Right, VPos::Center)),
            )
            .y_label_formatter(&|y: &f64| format_count(*y))
            .draw()?;

        let created_style =
            ShapeStyle::from(&self.theme.primary_color).stroke_width(self.style.line_width);
        let closed_style =
            ShapeStyle::from(&self.theme.secondary_color).stroke_width(self.style.line_width);

        chart
            .draw_series(LineSeries::new(
                points.iter().enumerate().map(|(i, p)| (i as f64, p.created)),
                created_style,
            ))?
            .label("Created")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], created_style));

        chart
            .draw_series(LineSeries::new(
                points.iter().enumerate().map(|(i, p)| (i as f64, p.closed)),
                closed_style,
            ))?
            .label("Closed")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], closed_style));

        chart
            .configure_series_labels()
            .background_style(&self.theme.background_color)
            .border_style(&self.theme.axis_color)
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(self.label_font())
            .draw()?;

        Ok(())
    }

    /// Horizontal bars, busiest user at the top.
    fn draw_top_users(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        counts: &CategoryCounts,
    ) -> std::result::Result<(), PlotError> {
        let top = counts.top(TOP_USERS);
        let caption = format!("{} top {} assignees", self.project_key, top.len());
        if top.is_empty() {
            return self.draw_no_data(root, &caption);
        }

        let rows = top.len();
        let values: Vec<f64> = top.iter().map(|(_, count)| *count as f64).collect();
        let (x_min, x_max) = value_range(&values);
        let names: Vec<String> = top.iter().map(|(name, _)| name.clone()).collect();

        let mut chart = ChartBuilder::on(root)
            .caption(&caption, self.caption_font())
            .margin(self.style.margin)
            .x_label_area_size(self.style.label_area_size)
            .y_label_area_size(self.style.label_area_size * 4)
            .build_cartesian_2d(x_min..x_max, -0.5f64..(rows as f64 - 0.5))?;

        // Row `rank` is centered on y = rows - 1 - rank.
        let y_label_formatter = move |y: &f64| {
            let position = y.round();
            if position < 0.0 || position >= names.len() as f64 {
                return String::new();
            }
            names[names.len() - 1 - position as usize].clone()
        };

        chart
            .configure_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(self.theme.grid_color)
            .axis_style(self.theme.axis_color)
            .x_desc("Issues")
            .label_style(self.label_font())
            .y_labels(rows)
            .y_label_formatter(&y_label_formatter)
            .x_label_formatter(&|x: &f64| format_count(*x))
            .draw()?;

        let fill = self.theme.primary_color.mix(0.8).filled();
        chart.draw_series(top.iter().enumerate().map(|(rank, (_, count))| {
            let center = (rows - 1 - rank) as f64;
            Rectangle::new([(0.0, center - 0.4), (*count as f64, center + 0.4)], fill)
        }))?;

        Ok(())
    }

    fn draw_priorities(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        shares: &[CategoryShare],
    ) -> std::result::Result<(), PlotError> {
        let caption = format!("{} issues by priority", self.project_key);
        if shares.is_empty() {
            return self.draw_no_data(root, &caption);
        }

        let columns = shares.len();
        let values: Vec<f64> = shares.iter().map(|s| s.count as f64).collect();
        let (y_min, y_max) = value_range(&values);
        let labels: Vec<String> = shares.iter().map(|s| s.label.clone()).collect();

        let mut chart = ChartBuilder::on(root)
            .caption(&caption, self.caption_font())
            .margin(self.style.margin)
            .set_all_label_area_size(self.style.label_area_size)
            .build_cartesian_2d(-0.5f64..(columns as f64 - 0.5), y_min..y_max)?;

        let x_label_formatter = move |x: &f64| {
            let position = x.round();
            if position < 0.0 || position >= labels.len() as f64 {
                return String::new();
            }
            labels[position as usize].clone()
        };

        chart
            .configure_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(self.theme.grid_color)
            .axis_style(self.theme.axis_color)
            .y_desc("Issues")
            .label_style(self.label_font())
            .x_labels(columns)
            .x_label_formatter(&x_label_formatter)
            .y_label_formatter(&|y: &f64| format_count(*y))
            .draw()?;

        let fill = self.theme.primary_color.mix(0.8).filled();
        chart.draw_series(shares.iter().enumerate().map(|(i, share)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, share.count as f64)], fill)
        }))?;

        let annotation = self
            .label_font()
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(shares.iter().enumerate().map(|(i, share)| {
            Text::new(
                format!("{:.1}%", share.percent),
                (i as f64, share.count as f64),
                annotation.clone(),
            )
        }))?;

        Ok(())
    }
}
