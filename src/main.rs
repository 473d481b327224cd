//! repotally - component inventory reports for a package repository manager.
//!
//! Usage:
//!   repotally --url https://nexus.example.com       Full report to the console
//!   repotally repositories-summary --url ...        Per-repository totals only
//!   repotally top-groups --url ... --top-groups 20  Largest groups
//!   repotally age-report --url ...                  Age histogram
//!   repotally --help                                Show help
//!
//! One invocation performs one full scan and terminates. A run either fully
//! succeeds or produces no report.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use tracing::info;

use repotally_core::{ComponentFilter, FilterCriteria};
use repotally_report::{OutputKind, SortBy, console};
use repotally_scan::{Credentials, DEFAULT_AGE_BUCKETS, HttpSource, ScanOptions, ScanReport};

#[derive(Parser)]
#[command(
    name = "repotally",
    version,
    about = "Component inventory reports for a package repository manager",
    long_about = "repotally scans every eligible repository of a package \
                  repository manager, filters components by timestamps and \
                  name patterns, and aggregates the survivors into \
                  per-repository, per-group, and age-histogram reports."
)]
struct Cli {
    /// Report to produce
    #[arg(value_enum, default_value_t = ReportKind::All)]
    report: ReportKind,

    /// Repository manager base URL
    #[arg(long, env = "NEXUS_URL")]
    url: String,

    /// Username for basic authentication
    #[arg(long, env = "NEXUS_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "NEXUS_PASSWORD")]
    password: Option<String>,

    /// Bearer token; takes precedence over username/password
    #[arg(long, env = "NEXUS_TOKEN")]
    token: Option<String>,

    /// Sort order for the repository summary
    #[arg(long = "repo-sort", value_enum, default_value_t = SortKey::Components)]
    repo_sort: SortKey,

    /// Sort order for the groups summary
    #[arg(long = "group-sort", value_enum, default_value_t = SortKey::Components)]
    group_sort: SortKey,

    /// Number of groups to show in the groups summary
    #[arg(long = "top-groups", default_value_t = 10)]
    top_groups: usize,

    /// Comma-separated age bucket ranges, e.g. "0-30,31-365,>365"
    #[arg(long = "age-buckets", default_value = DEFAULT_AGE_BUCKETS)]
    age_buckets: String,

    /// Keep components created before this date (ISO-8601, or 'Nd' for N days ago)
    #[arg(long = "created-before")]
    created_before: Option<String>,

    /// Keep components created after this date
    #[arg(long = "created-after")]
    created_after: Option<String>,

    /// Keep components updated before this date
    #[arg(long = "updated-before")]
    updated_before: Option<String>,

    /// Keep components updated after this date
    #[arg(long = "updated-after")]
    updated_after: Option<String>,

    /// Keep components downloaded before this date
    #[arg(long = "downloaded-before")]
    downloaded_before: Option<String>,

    /// Keep components downloaded after this date
    #[arg(long = "downloaded-after")]
    downloaded_after: Option<String>,

    /// Keep only components that have never been downloaded
    #[arg(long = "never-downloaded")]
    never_downloaded: bool,

    /// Repository name pattern (* and ? wildcards; repeatable, any may match)
    #[arg(long = "repository")]
    repositories: Vec<String>,

    /// Group pattern (* and ? wildcards; repeatable, any may match)
    #[arg(long = "group")]
    groups: Vec<String>,

    /// Component name pattern (* and ? wildcards; repeatable, any may match)
    #[arg(long = "name")]
    names: Vec<String>,

    /// Write the report to this file (.json or .csv) instead of the console
    #[arg(long)]
    output: Option<String>,

    /// Also write the raw filtered component list to this file (.json or .csv)
    #[arg(long = "output-components")]
    output_components: Option<String>,

    /// Maximum number of repositories scanned concurrently
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    /// All report sections
    All,
    /// Per-repository component counts and sizes
    RepositoriesSummary,
    /// Largest groups by components or size
    TopGroups,
    /// Component counts and sizes per age bucket
    AgeReport,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortKey {
    Name,
    Components,
    Size,
}

impl From<SortKey> for SortBy {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => SortBy::Name,
            SortKey::Components => SortBy::Components,
            SortKey::Size => SortBy::Size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    // Everything configuration-shaped is checked before the first request:
    // filter bounds, bucket specs, and both output destination types.
    let criteria = FilterCriteria {
        created_before: cli.created_before.clone(),
        created_after: cli.created_after.clone(),
        updated_before: cli.updated_before.clone(),
        updated_after: cli.updated_after.clone(),
        downloaded_before: cli.downloaded_before.clone(),
        downloaded_after: cli.downloaded_after.clone(),
        never_downloaded: cli.never_downloaded,
        repositories: cli.repositories.clone(),
        groups: cli.groups.clone(),
        names: cli.names.clone(),
    };
    let filter = ComponentFilter::new(&criteria)?;

    let output = cli
        .output
        .as_deref()
        .map(|path| OutputKind::from_path(path).map(|kind| (path, kind)))
        .transpose()?;
    let component_output = cli
        .output_components
        .as_deref()
        .map(|path| OutputKind::from_path(path).map(|kind| (path, kind)))
        .transpose()?;

    let options = ScanOptions::builder()
        .repository_summary(matches!(
            cli.report,
            ReportKind::All | ReportKind::RepositoriesSummary
        ))
        .group_summary(matches!(cli.report, ReportKind::All | ReportKind::TopGroups))
        .age_summary(matches!(cli.report, ReportKind::All | ReportKind::AgeReport))
        .collect_components(component_output.is_some())
        .age_buckets(
            cli.age_buckets
                .split(',')
                .map(String::from)
                .collect::<Vec<_>>(),
        )
        .concurrency(cli.concurrency)
        .build()?;

    let credentials = match (&cli.token, &cli.username, &cli.password) {
        (Some(token), _, _) if !token.is_empty() => Credentials::Token(token.clone()),
        (_, Some(username), Some(password)) => Credentials::Basic {
            username: username.clone(),
            password: password.clone(),
        },
        _ => Credentials::Anonymous,
    };
    let source = HttpSource::new(&cli.url, credentials)?;

    info!(url = %cli.url, "starting scan");
    let report = repotally_scan::run(&source, &filter, &options).await?;

    match output {
        Some((path, kind)) => {
            let mut writer = kind.create(path)?;
            if let Some(summary) = &report.repositories {
                writer.write_repository_summary(summary, cli.repo_sort.into())?;
            }
            if let Some(summary) = &report.groups {
                writer.write_groups_summary(summary, cli.group_sort.into(), cli.top_groups)?;
            }
            if let Some(summary) = &report.ages {
                writer.write_age_summary(summary)?;
            }
            writer.finish()?;
            info!(path, "report written");
        }
        None => print_report(&cli, &report),
    }

    if let Some((path, kind)) = component_output {
        let mut writer = kind.create(path)?;
        writer.write_components(&report.components)?;
        writer.finish()?;
        info!(
            path,
            components = report.components.len(),
            "component export written"
        );
    }

    Ok(())
}

fn print_report(cli: &Cli, report: &ScanReport) {
    let mut printed = false;
    if let Some(summary) = &report.repositories {
        console::print_repository_summary(summary, cli.repo_sort.into());
        printed = true;
    }
    if let Some(summary) = &report.groups {
        if printed {
            println!();
        }
        console::print_groups_summary(summary, cli.group_sort.into(), cli.top_groups);
        printed = true;
    }
    if let Some(summary) = &report.ages {
        if printed {
            println!();
        }
        console::print_age_summary(summary);
    }
}
