//! Aggregation summaries and report writers for repotally.
//!
//! This crate provides the three independent report views built during a
//! scan, and the encoders that render them:
//!
//! - **Repository summary** - component count and size per repository
//! - **Groups summary** - component count and size per group/namespace
//! - **Age summary** - an age histogram over configurable day-range buckets
//!
//! Summaries are plain accumulators: a scan fills them page by page (or
//! builds per-repository partials and merges them) and hands the populated
//! value to a [`ReportWriter`] or the console printer.

mod age;
pub mod console;
mod sort;
mod summary;
mod writer;

pub use age::{AgeBucket, AgeSummary};
pub use sort::SortBy;
pub use summary::{GroupStats, GroupsSummary, RepositoryComponentsSummary, RepositoryStats};
pub use writer::{CsvReportWriter, JsonReportWriter, OutputKind, ReportWriter, WriteError};
