//! Concurrent paginated traversal and aggregation.

use derive_builder::Builder;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, trace};

use repotally_core::{Component, ComponentFilter, Repository};
use repotally_report::{AgeSummary, GroupsSummary, RepositoryComponentsSummary};

use crate::error::{ScanError, SourceError};
use crate::source::ComponentSource;

/// Default age bucket ranges for the age report.
pub const DEFAULT_AGE_BUCKETS: &str = "0-7,8-30,31-90,91-365,>365";

/// Options controlling which aggregates a scan produces.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ScanOptions {
    /// Build the per-repository summary.
    #[builder(default = "true")]
    pub repository_summary: bool,

    /// Build the per-group summary.
    #[builder(default = "true")]
    pub group_summary: bool,

    /// Build the age histogram.
    #[builder(default = "true")]
    pub age_summary: bool,

    /// Keep the raw filtered components for export.
    #[builder(default = "false")]
    pub collect_components: bool,

    /// Age bucket range specs, evaluated in order.
    #[builder(default = "Self::default_age_buckets()")]
    pub age_buckets: Vec<String>,

    /// Maximum number of repositories traversed concurrently.
    #[builder(default = "8")]
    pub concurrency: usize,
}

impl ScanOptionsBuilder {
    fn default_age_buckets() -> Vec<String> {
        DEFAULT_AGE_BUCKETS.split(',').map(String::from).collect()
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            repository_summary: true,
            group_summary: true,
            age_summary: true,
            collect_components: false,
            age_buckets: ScanOptionsBuilder::default_age_buckets(),
            concurrency: 8,
        }
    }
}

impl ScanOptions {
    /// Create a new options builder.
    pub fn builder() -> ScanOptionsBuilder {
        ScanOptionsBuilder::default()
    }
}

/// Fully-populated aggregates from one successful run.
///
/// Disabled sections are `None`; `components` is empty unless collection was
/// requested. Read-only once the run completes.
#[derive(Debug)]
pub struct ScanReport {
    pub repositories: Option<RepositoryComponentsSummary>,
    pub groups: Option<GroupsSummary>,
    pub ages: Option<AgeSummary>,
    pub components: Vec<Component>,
}

/// Runs one full scan against a component source.
///
/// Repositories that are group-type or fail the repository pattern filter are
/// skipped without listing their components. The rest fan out concurrently,
/// bounded by `options.concurrency`; within one repository pages are chained
/// strictly through the continuation token. Each repository task fills a
/// private partial aggregate; partials merge at the join point, so no locks
/// are held during traversal. The first failure aborts the run and all
/// partial aggregation is discarded.
pub async fn run<S: ComponentSource>(
    source: &S,
    filter: &ComponentFilter,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    // Bucket specs are validated before the first network call. The template
    // also pins one reference instant for every partial's age arithmetic.
    let age_template = if options.age_summary {
        Some(AgeSummary::new(&options.age_buckets)?)
    } else {
        None
    };

    let repositories = source.repositories().await?;
    let eligible: Vec<Repository> = repositories
        .into_iter()
        .filter(|repository| {
            if repository.is_group() {
                trace!(repository = %repository.name, "skipping group repository");
                return false;
            }
            filter.matches_repository(&repository.name)
        })
        .collect();

    debug!(repositories = eligible.len(), "starting traversal");

    let mut pending = stream::iter(
        eligible
            .iter()
            .map(|repository| scan_repository(source, repository, filter, options, &age_template)),
    )
    .buffer_unordered(options.concurrency.max(1));

    let mut merged = Partial::new(options, age_template.clone());
    while let Some(partial) = pending.try_next().await? {
        merged.merge(partial);
    }

    Ok(merged.into_report())
}

/// Walks one repository's pages sequentially, folding matches into a private
/// partial aggregate.
async fn scan_repository<S: ComponentSource>(
    source: &S,
    repository: &Repository,
    filter: &ComponentFilter,
    options: &ScanOptions,
    age_template: &Option<AgeSummary>,
) -> Result<Partial, SourceError> {
    let mut partial = Partial::new(options, age_template.clone());
    let mut token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        debug!(
            repository = %repository.name,
            token = token.as_deref().unwrap_or("<none>"),
            "fetching components page"
        );
        let page = source
            .components_page(&repository.name, token.as_deref())
            .await?;
        pages += 1;
        partial.fold_page(repository, page.items, filter);

        match page.continuation_token {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }

    trace!(repository = %repository.name, pages, "repository traversal complete");
    Ok(partial)
}

/// Aggregates for one repository task, merged at the join point.
#[derive(Debug)]
struct Partial {
    repositories: Option<RepositoryComponentsSummary>,
    groups: Option<GroupsSummary>,
    ages: Option<AgeSummary>,
    components: Option<Vec<Component>>,
}

impl Partial {
    fn new(options: &ScanOptions, ages: Option<AgeSummary>) -> Self {
        Self {
            repositories: options
                .repository_summary
                .then(RepositoryComponentsSummary::new),
            groups: options.group_summary.then(GroupsSummary::new),
            ages,
            components: options.collect_components.then(Vec::new),
        }
    }

    fn fold_page(
        &mut self,
        repository: &Repository,
        items: Vec<Component>,
        filter: &ComponentFilter,
    ) {
        let fetched = items.len();
        let matched: Vec<Component> = items
            .into_iter()
            .filter(|component| filter.matches(component))
            .collect();
        debug!(
            repository = %repository.name,
            matched = matched.len(),
            fetched,
            "filtered page"
        );
        if matched.is_empty() {
            return;
        }

        if let Some(summary) = &mut self.repositories {
            let size_bytes: u64 = matched.iter().map(Component::size_bytes).sum();
            summary.add_repository_stats(
                &repository.name,
                &repository.format,
                matched.len() as u64,
                size_bytes,
            );
        }

        if let Some(summary) = &mut self.groups {
            for component in &matched {
                if let Some(group) = &component.group {
                    summary.add_group_stats(group, 1, component.size_bytes());
                }
            }
        }

        if let Some(summary) = &mut self.ages {
            for component in &matched {
                let size_bytes = component.size_bytes();
                summary.add_component(component, size_bytes);
            }
        }

        if let Some(collected) = &mut self.components {
            collected.extend(matched);
        }
    }

    fn merge(&mut self, other: Partial) {
        if let (Some(merged), Some(partial)) = (&mut self.repositories, other.repositories) {
            merged.merge(partial);
        }
        if let (Some(merged), Some(partial)) = (&mut self.groups, other.groups) {
            merged.merge(partial);
        }
        if let (Some(merged), Some(partial)) = (&mut self.ages, other.ages) {
            merged.merge(&partial);
        }
        if let (Some(merged), Some(partial)) = (&mut self.components, other.components) {
            merged.extend(partial);
        }
    }

    fn into_report(self) -> ScanReport {
        ScanReport {
            repositories: self.repositories,
            groups: self.groups,
            ages: self.ages,
            components: self.components.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder_applies_defaults() {
        let options = ScanOptions::builder().build().unwrap();
        assert!(options.repository_summary);
        assert!(options.group_summary);
        assert!(options.age_summary);
        assert!(!options.collect_components);
        assert_eq!(options.age_buckets.len(), 5);
        assert_eq!(options.age_buckets[0], "0-7");
        assert_eq!(options.age_buckets[4], ">365");
        assert_eq!(options.concurrency, 8);
    }

    #[test]
    fn options_builder_overrides() {
        let options = ScanOptions::builder()
            .repository_summary(false)
            .collect_components(true)
            .age_buckets(vec!["0-30".to_string(), ">30".to_string()])
            .concurrency(2usize)
            .build()
            .unwrap();
        assert!(!options.repository_summary);
        assert!(options.collect_components);
        assert_eq!(options.age_buckets.len(), 2);
        assert_eq!(options.concurrency, 2);
    }
}
