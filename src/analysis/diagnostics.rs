//! Per-record data-quality diagnostics.
//!
//! The aggregator never fails on a single bad issue. It skips or clamps the
//! record and hands a [`Diagnostic`] to whatever [`DiagnosticSink`] it was built
//! with, which keeps the aggregation itself free of output side effects.

use chrono::NaiveDateTime;
use std::sync::Mutex;

use crate::error::ParseFailure;

/// Which timestamp of an issue a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    Created,
    Resolved,
}

impl std::fmt::Display for TimestampField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TimestampField::Created => "created",
            TimestampField::Resolved => "resolutiondate",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The record was left out of date-dependent views.
    UnparseableTimestamp {
        issue_key: Option<String>,
        field: TimestampField,
        failure: ParseFailure,
    },
    /// The resolution precedes creation; the duration was clamped to zero days.
    ResolvedBeforeCreated {
        issue_key: Option<String>,
        created: NaiveDateTime,
        resolved: NaiveDateTime,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnparseableTimestamp {
                issue_key,
                field,
                failure,
            } => write!(
                f,
                "{}: skipping {field}: {failure}",
                issue_key.as_deref().unwrap_or("<no key>")
            ),
            Diagnostic::ResolvedBeforeCreated {
                issue_key,
                created,
                resolved,
            } => write!(
                f,
                "{}: resolved {resolved} before created {created}, counting 0 days",
                issue_key.as_deref().unwrap_or("<no key>")
            ),
        }
    }
}

/// Receiver for diagnostics emitted while aggregating.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Diagnostic) + Send + Sync,
{
    fn emit(&self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Default sink: forwards every diagnostic to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory so callers can inspect them afterwards.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything collected so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drain the collected diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut *self
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }
}
