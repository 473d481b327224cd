//! Component filter construction and evaluation.
//!
//! A [`ComponentFilter`] is compiled once from [`FilterCriteria`] before any
//! traversal starts. Compilation parses and validates every date bound, so a
//! malformed filter fails before the first network request. Evaluation is a
//! pure predicate over a component and its assets.

use chrono::{DateTime, Utc};

use crate::datespec;
use crate::error::ConfigError;
use crate::model::{Asset, Component};
use crate::wildcard;

/// Raw filter criteria as supplied by the caller, date bounds still textual.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub created_before: Option<String>,
    pub created_after: Option<String>,
    pub updated_before: Option<String>,
    pub updated_after: Option<String>,
    pub downloaded_before: Option<String>,
    pub downloaded_after: Option<String>,

    /// Only match components none of whose assets were ever downloaded.
    pub never_downloaded: bool,

    /// Wildcard patterns, OR within each list, AND across the three lists.
    /// An empty list places no constraint on its dimension.
    pub repositories: Vec<String>,
    pub groups: Vec<String>,
    pub names: Vec<String>,
}

/// A compiled component predicate. Immutable once built.
#[derive(Debug, Clone)]
pub struct ComponentFilter {
    created_before: Option<DateTime<Utc>>,
    created_after: Option<DateTime<Utc>>,
    updated_before: Option<DateTime<Utc>>,
    updated_after: Option<DateTime<Utc>>,
    downloaded_before: Option<DateTime<Utc>>,
    downloaded_after: Option<DateTime<Utc>>,
    never_downloaded: bool,
    repositories: Vec<String>,
    groups: Vec<String>,
    names: Vec<String>,
}

impl ComponentFilter {
    /// Compiles filter criteria into a predicate.
    ///
    /// Fails when any date bound is malformed, when a before/after pair is
    /// reversed, or when the never-downloaded flag is combined with a
    /// downloaded bound.
    pub fn new(criteria: &FilterCriteria) -> Result<Self, ConfigError> {
        let created_before = datespec::parse_date(criteria.created_before.as_deref())?;
        let created_after = datespec::parse_date(criteria.created_after.as_deref())?;
        let updated_before = datespec::parse_date(criteria.updated_before.as_deref())?;
        let updated_after = datespec::parse_date(criteria.updated_after.as_deref())?;
        let downloaded_before = datespec::parse_date(criteria.downloaded_before.as_deref())?;
        let downloaded_after = datespec::parse_date(criteria.downloaded_after.as_deref())?;

        datespec::validate_range(created_before, created_after, "created")?;
        datespec::validate_range(updated_before, updated_after, "updated")?;
        datespec::validate_range(downloaded_before, downloaded_after, "downloaded")?;

        if criteria.never_downloaded && (downloaded_before.is_some() || downloaded_after.is_some())
        {
            return Err(ConfigError::ConflictingFilters);
        }

        Ok(Self {
            created_before,
            created_after,
            updated_before,
            updated_after,
            downloaded_before,
            downloaded_after,
            never_downloaded: criteria.never_downloaded,
            repositories: criteria.repositories.clone(),
            groups: criteria.groups.clone(),
            names: criteria.names.clone(),
        })
    }

    /// Tests a repository name against the repository pattern list.
    ///
    /// Used to skip entire repositories before their components are listed.
    /// An empty list means every repository is eligible.
    pub fn matches_repository(&self, name: &str) -> bool {
        self.repositories.is_empty() || wildcard::matches_any(Some(name), &self.repositories)
    }

    /// Tests a component against every configured criterion.
    ///
    /// A component with no assets never matches. Date windows are evaluated
    /// per asset: the component matches when at least one asset satisfies all
    /// three windows simultaneously.
    pub fn matches(&self, component: &Component) -> bool {
        if component.assets.is_empty() {
            return false;
        }

        if !self.matches_repository(&component.repository) {
            return false;
        }
        if !self.groups.is_empty() && !wildcard::matches_any(component.group.as_deref(), &self.groups)
        {
            return false;
        }
        if !self.names.is_empty() && !wildcard::matches_any(component.name.as_deref(), &self.names) {
            return false;
        }

        // Never-downloaded: reject if any asset was ever downloaded. The
        // downloaded window below is vacuous in this case since conflicting
        // bounds were rejected at construction.
        if self.never_downloaded
            && component.assets.iter().any(|a| a.last_downloaded.is_some())
        {
            return false;
        }

        component.assets.iter().any(|asset| self.matches_windows(asset))
    }

    fn matches_windows(&self, asset: &Asset) -> bool {
        within_window(asset.blob_created, self.created_before, self.created_after)
            && within_window(asset.last_modified, self.updated_before, self.updated_after)
            && within_window(
                asset.last_downloaded,
                self.downloaded_before,
                self.downloaded_after,
            )
    }
}

/// A timestamp satisfies a window when it lies strictly inside both set
/// bounds. When either bound is set, a missing timestamp fails the window;
/// with no bounds set the window passes regardless.
fn within_window(
    timestamp: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
    after: Option<DateTime<Utc>>,
) -> bool {
    if before.is_none() && after.is_none() {
        return true;
    }
    let Some(timestamp) = timestamp else {
        return false;
    };
    if let Some(before) = before {
        if timestamp >= before {
            return false;
        }
    }
    if let Some(after) = after {
        if timestamp <= after {
            return false;
        }
    }
    true
}
