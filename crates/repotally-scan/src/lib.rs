//! Repository traversal and aggregation engine for repotally.
//!
//! This crate walks every eligible repository of a component source
//! concurrently, pulls paginated component listings, applies the compiled
//! component filter, and folds survivors into the enabled report summaries.
//!
//! # Overview
//!
//! - [`ComponentSource`] abstracts the repository manager: list repositories,
//!   fetch one page of components at a time via a continuation token.
//! - [`HttpSource`] implements it against the manager's REST API.
//! - [`run`] drives the scan: repositories fan out concurrently, pages within
//!   one repository are fetched strictly in sequence, and per-repository
//!   partial summaries are merged at a single join point. The first source
//!   failure aborts the whole run and discards everything.

mod client;
mod error;
mod scanner;
mod source;

pub use client::{Credentials, HttpSource};
pub use error::{ScanError, SourceError};
pub use scanner::{
    DEFAULT_AGE_BUCKETS, ScanOptions, ScanOptionsBuilder, ScanReport, run,
};
pub use source::ComponentSource;
