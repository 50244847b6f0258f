//! PNG chart rendering for every analysis view.

pub mod chart;
pub mod styles;

#[cfg(test)]
mod tests;

pub use chart::{format_count, histogram_bins, value_range, ChartRenderer, HistogramBin};
pub use styles::{ChartStyle, ChartTheme};
