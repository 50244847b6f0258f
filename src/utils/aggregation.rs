use chrono::{Datelike, NaiveDate};

use crate::error::{AnalyticsError, Result};
use crate::types::DateCountMap;

/// Centered moving average over a fixed, odd-sized window.
///
/// Near either end of the sequence the window shrinks to the elements that
/// exist instead of padding, so edge values are not dragged toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingWindow {
    size: usize,
}

impl SmoothingWindow {
    /// The 7-day window used for medium-sized timelines.
    pub const WEEK: SmoothingWindow = SmoothingWindow { size: 7 };

    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(AnalyticsError::InvalidWindow(size));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Smooth `values`; the output always has the same length as the input.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        let half = self.size / 2;
        (0..values.len())
            .map(|i| {
                let start = i.saturating_sub(half);
                let end = (i + half + 1).min(values.len());
                let window = &values[start..end];
                window.iter().sum::<f64>() / window.len() as f64
            })
            .collect()
    }
}

impl Default for SmoothingWindow {
    fn default() -> Self {
        Self::WEEK
    }
}

/// First day of the month `date` falls in.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Re-key every count to the first day of its month, summing per month.
pub fn bucket_by_month(counts: &DateCountMap) -> DateCountMap {
    counts
        .iter()
        .map(|(date, count)| (month_start(date), count))
        .collect()
}
