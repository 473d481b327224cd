//! Error types for filter and report configuration.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors detected while building filters, age buckets, or output writers.
///
/// All of these are raised before any network activity; a run that fails with
/// a `ConfigError` never fetched anything.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A date bound could not be parsed.
    #[error(
        "invalid date format: '{input}'. Expected ISO-8601 format \
         (e.g. '2024-06-01' or '2024-06-01T00:00:00Z') or 'Nd' format (e.g. '30d')"
    )]
    InvalidDateFormat { input: String },

    /// A before/after pair points the wrong way.
    #[error(
        "invalid {label} filter: 'before' date ({before}) cannot be earlier \
         than 'after' date ({after})"
    )]
    InvalidDateRange {
        label: String,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
    },

    /// The never-downloaded flag was combined with a downloaded date bound.
    #[error("cannot combine never-downloaded with downloaded-before or downloaded-after filters")]
    ConflictingFilters,

    /// An age bucket spec matched neither "min-max" nor ">N".
    #[error("invalid age bucket format: '{spec}'. Expected formats: '0-7', '8-30', or '>365'")]
    InvalidBucketSpec { spec: String },

    /// An age bucket range with min greater than max.
    #[error("invalid age bucket range: '{spec}' (min days cannot be greater than max days)")]
    InvalidBucketRange { spec: String },

    /// No age bucket ranges were supplied.
    #[error("age bucket ranges cannot be empty")]
    EmptyBuckets,

    /// An output destination whose type cannot be inferred.
    #[error("unsupported output file format: '{path}' (expected a .json or .csv path)")]
    UnsupportedOutput { path: String },
}
