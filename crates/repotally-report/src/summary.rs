//! Keyed accumulators for repository and group statistics.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::sort::SortBy;

/// Running stats for one repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    /// Repository format (e.g. "maven2", "npm"), recorded on first insert.
    pub format: String,
    pub component_count: u64,
    pub size_bytes: u64,
}

impl RepositoryStats {
    fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            component_count: 0,
            size_bytes: 0,
        }
    }

    fn add(&mut self, component_count: u64, size_bytes: u64) {
        self.component_count += component_count;
        self.size_bytes += size_bytes;
    }
}

/// Running stats for one group (Maven groupId, npm scope, ...).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub component_count: u64,
    pub size_bytes: u64,
}

impl GroupStats {
    fn add(&mut self, component_count: u64, size_bytes: u64) {
        self.component_count += component_count;
        self.size_bytes += size_bytes;
    }
}

/// Per-repository component totals plus grand totals.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryComponentsSummary {
    repository_stats: BTreeMap<String, RepositoryStats>,
    total_components: u64,
    total_size_bytes: u64,
}

impl RepositoryComponentsSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a batch of components into the named repository's entry,
    /// creating it on first use. The format is recorded once, on creation.
    pub fn add_repository_stats(
        &mut self,
        repository: &str,
        format: &str,
        component_count: u64,
        size_bytes: u64,
    ) {
        self.repository_stats
            .entry(repository.to_string())
            .or_insert_with(|| RepositoryStats::new(format))
            .add(component_count, size_bytes);
        self.total_components += component_count;
        self.total_size_bytes += size_bytes;
    }

    /// Absorbs another summary. Counts and bytes add commutatively, so
    /// per-repository partials can be merged in any order.
    pub fn merge(&mut self, other: RepositoryComponentsSummary) {
        for (repository, stats) in other.repository_stats {
            self.repository_stats
                .entry(repository)
                .or_insert_with(|| RepositoryStats::new(&stats.format))
                .add(stats.component_count, stats.size_bytes);
        }
        self.total_components += other.total_components;
        self.total_size_bytes += other.total_size_bytes;
    }

    pub fn repository_stats(&self) -> &BTreeMap<String, RepositoryStats> {
        &self.repository_stats
    }

    /// Entries ordered by the given sort key.
    pub fn sorted(&self, sort: SortBy) -> Vec<(&String, &RepositoryStats)> {
        match sort {
            SortBy::Name => self.repository_stats.iter().collect(),
            SortBy::Components => self
                .repository_stats
                .iter()
                .sorted_by(|a, b| {
                    b.1.component_count
                        .cmp(&a.1.component_count)
                        .then_with(|| a.0.cmp(b.0))
                })
                .collect(),
            SortBy::Size => self
                .repository_stats
                .iter()
                .sorted_by(|a, b| b.1.size_bytes.cmp(&a.1.size_bytes).then_with(|| a.0.cmp(b.0)))
                .collect(),
        }
    }

    pub fn total_components(&self) -> u64 {
        self.total_components
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.total_size_bytes
    }
}

/// Per-group component totals plus grand totals.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsSummary {
    group_stats: BTreeMap<String, GroupStats>,
    total_components: u64,
    total_size_bytes: u64,
}

impl GroupsSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group_stats(&mut self, group: &str, component_count: u64, size_bytes: u64) {
        self.group_stats
            .entry(group.to_string())
            .or_default()
            .add(component_count, size_bytes);
        self.total_components += component_count;
        self.total_size_bytes += size_bytes;
    }

    /// Absorbs another summary; see
    /// [`RepositoryComponentsSummary::merge`] for ordering guarantees.
    pub fn merge(&mut self, other: GroupsSummary) {
        for (group, stats) in other.group_stats {
            self.group_stats
                .entry(group)
                .or_default()
                .add(stats.component_count, stats.size_bytes);
        }
        self.total_components += other.total_components;
        self.total_size_bytes += other.total_size_bytes;
    }

    pub fn group_stats(&self) -> &BTreeMap<String, GroupStats> {
        &self.group_stats
    }

    /// Entries ordered by the given sort key; callers apply their own top-N.
    pub fn sorted(&self, sort: SortBy) -> Vec<(&String, &GroupStats)> {
        match sort {
            SortBy::Name => self.group_stats.iter().collect(),
            SortBy::Components => self
                .group_stats
                .iter()
                .sorted_by(|a, b| {
                    b.1.component_count
                        .cmp(&a.1.component_count)
                        .then_with(|| a.0.cmp(b.0))
                })
                .collect(),
            SortBy::Size => self
                .group_stats
                .iter()
                .sorted_by(|a, b| b.1.size_bytes.cmp(&a.1.size_bytes).then_with(|| a.0.cmp(b.0)))
                .collect(),
        }
    }

    pub fn total_components(&self) -> u64 {
        self.total_components
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.total_size_bytes
    }
}
