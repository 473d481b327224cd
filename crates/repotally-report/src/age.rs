//! Age bucket classification and the age histogram summary.
//!
//! Buckets are configured from textual range specs, either `"min-max"` (both
//! inclusive) or `">N"` (meaning N+1 days and older). They are evaluated in
//! the order supplied and need not be contiguous or non-overlapping; a
//! component lands in the first bucket that contains its age.

use chrono::{DateTime, Utc};
use serde::Serialize;

use repotally_core::{Component, ConfigError};

/// One day-count range with its running totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBucket {
    range: String,
    min_days: i64,
    max_days: Option<i64>,
    component_count: u64,
    size_bytes: u64,
}

impl AgeBucket {
    /// Parses a range spec like `"0-7"`, `"8-30"`, or `">365"`.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let trimmed = spec.trim();

        let (min_days, max_days) = if let Some(rest) = trimmed.strip_prefix('>') {
            let min = parse_days(rest)
                .and_then(|n| n.checked_add(1))
                .ok_or_else(|| ConfigError::InvalidBucketSpec {
                    spec: trimmed.to_string(),
                })?;
            (min, None)
        } else if let Some((min, max)) = trimmed.split_once('-') {
            let (min, max) = parse_days(min)
                .zip(parse_days(max))
                .ok_or_else(|| ConfigError::InvalidBucketSpec {
                    spec: trimmed.to_string(),
                })?;
            if min > max {
                return Err(ConfigError::InvalidBucketRange {
                    spec: trimmed.to_string(),
                });
            }
            (min, Some(max))
        } else {
            return Err(ConfigError::InvalidBucketSpec {
                spec: trimmed.to_string(),
            });
        };

        Ok(Self {
            range: trimmed.to_string(),
            min_days,
            max_days,
            component_count: 0,
            size_bytes: 0,
        })
    }

    /// Whether an age in whole days falls inside this bucket.
    pub fn contains(&self, age_days: i64) -> bool {
        age_days >= self.min_days && self.max_days.is_none_or(|max| age_days <= max)
    }

    fn add(&mut self, component_count: u64, size_bytes: u64) {
        self.component_count += component_count;
        self.size_bytes += size_bytes;
    }

    /// The original range spec, e.g. `"0-7"`.
    pub fn range(&self) -> &str {
        &self.range
    }

    /// Human-readable range label, e.g. `"0-7 days"`.
    pub fn range_label(&self) -> String {
        format!("{} days", self.range)
    }

    pub fn min_days(&self) -> i64 {
        self.min_days
    }

    pub fn max_days(&self) -> Option<i64> {
        self.max_days
    }

    pub fn component_count(&self) -> u64 {
        self.component_count
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Histogram of components by age since their earliest asset creation date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeSummary {
    age_buckets: Vec<AgeBucket>,
    total_components: u64,
    total_size_bytes: u64,

    /// Ages are measured against this instant, fixed at construction so
    /// every partial summary of one run classifies identically.
    #[serde(skip)]
    reference: DateTime<Utc>,
}

impl AgeSummary {
    /// Builds a summary from range specs, evaluated in the order given.
    pub fn new(ranges: &[String]) -> Result<Self, ConfigError> {
        Self::with_reference(ranges, Utc::now())
    }

    /// Like [`AgeSummary::new`] with an explicit reference instant.
    pub fn with_reference(ranges: &[String], reference: DateTime<Utc>) -> Result<Self, ConfigError> {
        if ranges.is_empty() {
            return Err(ConfigError::EmptyBuckets);
        }
        let age_buckets = ranges
            .iter()
            .map(|r| AgeBucket::parse(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            age_buckets,
            total_components: 0,
            total_size_bytes: 0,
            reference,
        })
    }

    /// Classifies a component into the first bucket containing its age.
    ///
    /// Age is whole days between the earliest `blobCreated` among the
    /// component's assets and the reference instant. Components without any
    /// creation timestamp, and components no bucket contains, are silently
    /// excluded from the buckets and the totals.
    pub fn add_component(&mut self, component: &Component, size_bytes: u64) {
        let Some(earliest) = component.assets.iter().filter_map(|a| a.blob_created).min() else {
            return;
        };
        let age_days = (self.reference - earliest).num_days();

        for bucket in &mut self.age_buckets {
            if bucket.contains(age_days) {
                bucket.add(1, size_bytes);
                self.total_components += 1;
                self.total_size_bytes += size_bytes;
                return;
            }
        }
        // No configured bucket covers this age: dropped, not even counted.
    }

    /// Absorbs a partial summary built from the same range specs.
    pub fn merge(&mut self, other: &AgeSummary) {
        debug_assert_eq!(self.age_buckets.len(), other.age_buckets.len());
        for (bucket, partial) in self.age_buckets.iter_mut().zip(&other.age_buckets) {
            bucket.add(partial.component_count, partial.size_bytes);
        }
        self.total_components += other.total_components;
        self.total_size_bytes += other.total_size_bytes;
    }

    pub fn age_buckets(&self) -> &[AgeBucket] {
        &self.age_buckets
    }

    pub fn total_components(&self) -> u64 {
        self.total_components
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.total_size_bytes
    }
}

fn parse_days(text: &str) -> Option<i64> {
    (!text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()))
        .then(|| text.parse().ok())
        .flatten()
}
