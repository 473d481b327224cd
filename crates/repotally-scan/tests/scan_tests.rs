use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};

use repotally_core::{
    Asset, Component, ComponentFilter, ComponentPage, FilterCriteria, Repository, RepositoryType,
};
use repotally_scan::{ComponentSource, ScanError, ScanOptions, SourceError, run};

/// In-memory source: pages per repository, tokens are page indices. Requests
/// are recorded so tests can assert which repositories were walked and in
/// what order pages were chained.
struct FakeSource {
    repositories: Vec<Repository>,
    pages: HashMap<String, Vec<Vec<Component>>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeSource {
    fn new(repositories: Vec<Repository>, pages: HashMap<String, Vec<Vec<Component>>>) -> Self {
        Self {
            repositories,
            pages,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl ComponentSource for FakeSource {
    async fn repositories(&self) -> Result<Vec<Repository>, SourceError> {
        Ok(self.repositories.clone())
    }

    async fn components_page(
        &self,
        repository: &str,
        token: Option<&str>,
    ) -> Result<ComponentPage, SourceError> {
        self.requests
            .lock()
            .unwrap()
            .push((repository.to_string(), token.map(String::from)));

        let pages = self
            .pages
            .get(repository)
            .ok_or_else(|| SourceError::Other {
                message: format!("unexpected repository: {repository}"),
            })?;

        let index: usize = match token {
            Some(token) => token.parse().unwrap(),
            None => 0,
        };
        let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
        Ok(ComponentPage {
            items: pages[index].clone(),
            continuation_token: next,
        })
    }
}

fn hosted(name: &str, format: &str) -> Repository {
    Repository {
        name: name.to_string(),
        format: format.to_string(),
        kind: RepositoryType::Hosted,
    }
}

fn group(name: &str, format: &str) -> Repository {
    Repository {
        name: name.to_string(),
        format: format.to_string(),
        kind: RepositoryType::Group,
    }
}

fn component(repository: &str, group: Option<&str>, age_days: i64, size: u64) -> Component {
    Component {
        repository: repository.to_string(),
        group: group.map(String::from),
        name: Some("artifact".to_string()),
        version: Some("1.0.0".to_string()),
        assets: vec![Asset {
            blob_created: Some(Utc::now() - Duration::days(age_days)),
            file_size: Some(size),
            ..Asset::default()
        }],
    }
}

fn no_filter() -> ComponentFilter {
    ComponentFilter::new(&FilterCriteria::default()).unwrap()
}

#[tokio::test]
async fn end_to_end_summaries_for_two_repositories() {
    // Repository A: 120 matching components, 1,000,000 bytes across 3 pages.
    // Repository B is group-type and must contribute nothing.
    let mut page_a1: Vec<Component> = (0..50)
        .map(|_| component("A", Some("com.left"), 10, 10_000))
        .collect();
    page_a1.extend((0..10).map(|_| component("A", Some("com.right"), 10, 5_000)));
    let page_a2: Vec<Component> = (0..30)
        .map(|_| component("A", Some("com.left"), 10, 10_000))
        .collect();
    let page_a3: Vec<Component> = (0..30)
        .map(|_| component("A", Some("com.right"), 10, 5_000))
        .collect();

    let source = FakeSource::new(
        vec![hosted("A", "maven2"), group("B", "maven2")],
        HashMap::from([("A".to_string(), vec![page_a1, page_a2, page_a3])]),
    );

    let report = run(&source, &no_filter(), &ScanOptions::default())
        .await
        .unwrap();

    let repositories = report.repositories.unwrap();
    assert_eq!(repositories.repository_stats().len(), 1);
    let stats = &repositories.repository_stats()["A"];
    assert_eq!(stats.format, "maven2");
    assert_eq!(stats.component_count, 120);
    assert_eq!(stats.size_bytes, 1_000_000);
    assert_eq!(repositories.total_components(), 120);
    assert_eq!(repositories.total_size_bytes(), 1_000_000);

    let groups = report.groups.unwrap();
    assert_eq!(groups.group_stats()["com.left"].component_count, 80);
    assert_eq!(groups.group_stats()["com.right"].component_count, 40);
    assert_eq!(groups.total_components(), 120);

    // All components are 10 days old: everything lands in the 8-30 bucket.
    let ages = report.ages.unwrap();
    let bucket = &ages.age_buckets()[1];
    assert_eq!(bucket.range(), "8-30");
    assert_eq!(bucket.component_count(), 120);
    assert_eq!(bucket.size_bytes(), 1_000_000);
    assert_eq!(ages.total_components(), 120);

    // The group repository was never queried for components.
    assert!(source.requests().iter().all(|(repo, _)| repo == "A"));
}

#[tokio::test]
async fn pages_chain_through_continuation_tokens() {
    let pages = vec![
        vec![component("A", None, 1, 10)],
        vec![component("A", None, 1, 20)],
        vec![component("A", None, 1, 30)],
    ];
    let source = FakeSource::new(
        vec![hosted("A", "npm")],
        HashMap::from([("A".to_string(), pages)]),
    );

    let report = run(&source, &no_filter(), &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(report.repositories.unwrap().total_size_bytes(), 60);
    assert_eq!(
        source.requests(),
        vec![
            ("A".to_string(), None),
            ("A".to_string(), Some("1".to_string())),
            ("A".to_string(), Some("2".to_string())),
        ]
    );
}

#[tokio::test]
async fn repository_patterns_skip_repositories_before_listing() {
    let criteria = FilterCriteria {
        repositories: vec!["maven-*".to_string()],
        ..FilterCriteria::default()
    };
    let filter = ComponentFilter::new(&criteria).unwrap();

    let source = FakeSource::new(
        vec![hosted("maven-releases", "maven2"), hosted("npm-hosted", "npm")],
        HashMap::from([(
            "maven-releases".to_string(),
            vec![vec![component("maven-releases", None, 1, 100)]],
        )]),
    );

    let report = run(&source, &filter, &ScanOptions::default()).await.unwrap();

    let repositories = report.repositories.unwrap();
    assert_eq!(repositories.repository_stats().len(), 1);
    assert!(repositories.repository_stats().contains_key("maven-releases"));
    assert!(
        source
            .requests()
            .iter()
            .all(|(repo, _)| repo == "maven-releases")
    );
}

#[tokio::test]
async fn component_filter_is_applied_during_traversal() {
    let mut downloaded = component("A", Some("com.example"), 5, 100);
    downloaded.assets[0].last_downloaded = Some(Utc::now() - Duration::days(1));
    let never = component("A", Some("com.example"), 5, 40);

    let criteria = FilterCriteria {
        never_downloaded: true,
        ..FilterCriteria::default()
    };
    let filter = ComponentFilter::new(&criteria).unwrap();

    let source = FakeSource::new(
        vec![hosted("A", "maven2")],
        HashMap::from([("A".to_string(), vec![vec![downloaded, never]])]),
    );

    let options = ScanOptions::builder()
        .collect_components(true)
        .build()
        .unwrap();
    let report = run(&source, &filter, &options).await.unwrap();

    assert_eq!(report.components.len(), 1);
    assert_eq!(report.components[0].size_bytes(), 40);
    let repositories = report.repositories.unwrap();
    assert_eq!(repositories.total_components(), 1);
    assert_eq!(repositories.total_size_bytes(), 40);
}

#[tokio::test]
async fn disabled_sections_are_absent() {
    let source = FakeSource::new(
        vec![hosted("A", "maven2")],
        HashMap::from([("A".to_string(), vec![vec![component("A", None, 1, 10)]])]),
    );

    let options = ScanOptions::builder()
        .group_summary(false)
        .age_summary(false)
        .build()
        .unwrap();
    let report = run(&source, &no_filter(), &options).await.unwrap();

    assert!(report.repositories.is_some());
    assert!(report.groups.is_none());
    assert!(report.ages.is_none());
    assert!(report.components.is_empty());
}

#[tokio::test]
async fn first_source_failure_aborts_the_run() {
    // Repository "broken" has no pages configured: the fake errors on it.
    let source = FakeSource::new(
        vec![hosted("A", "maven2"), hosted("broken", "maven2")],
        HashMap::from([("A".to_string(), vec![vec![component("A", None, 1, 10)]])]),
    );

    let result = run(&source, &no_filter(), &ScanOptions::default()).await;
    assert!(matches!(result, Err(ScanError::Source(_))));
}

#[tokio::test]
async fn invalid_age_buckets_fail_before_any_fetch() {
    let source = FakeSource::new(vec![hosted("A", "maven2")], HashMap::new());

    let options = ScanOptions::builder()
        .age_buckets(vec!["banana".to_string()])
        .build()
        .unwrap();
    let result = run(&source, &no_filter(), &options).await;

    assert!(matches!(result, Err(ScanError::Config(_))));
    assert!(source.requests().is_empty());
}
