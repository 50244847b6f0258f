pub mod aggregation;

pub use aggregation::{bucket_by_month, month_start, SmoothingWindow};
