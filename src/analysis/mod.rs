pub mod dates;
pub mod diagnostics;
pub mod processor;
pub mod timeline;


pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use processor::{IssueAggregator, MAX_DAYS, MIN_DAYS};
pub use timeline::{build_timeline, restrict_to_window, select_strategy};
