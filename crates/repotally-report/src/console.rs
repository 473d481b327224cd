//! Console rendering of report sections.

use crate::age::AgeSummary;
use crate::sort::SortBy;
use crate::summary::{GroupsSummary, RepositoryComponentsSummary};

/// Prints the per-repository component summary as a table.
pub fn print_repository_summary(summary: &RepositoryComponentsSummary, sort: SortBy) {
    println!("Repository Report Summary:");
    println!("{}", "=".repeat(70));
    println!(
        "{:<30} {:<10} {:>12} {:>15}",
        "Repository", "Format", "Components", "Total Size"
    );
    println!(
        "{:<30} {:<10} {:>12} {:>15}",
        "-".repeat(30),
        "-".repeat(10),
        "-".repeat(12),
        "-".repeat(15)
    );

    for (repository, stats) in summary.sorted(sort) {
        println!(
            "{:<30} {:<10} {:>12} {:>15}",
            repository,
            stats.format,
            stats.component_count,
            format_size(stats.size_bytes)
        );
    }

    println!();
    println!(
        "{:<30} {:<10} {:>12} {:>15}",
        "TOTAL",
        "-",
        summary.total_components(),
        format_size(summary.total_size_bytes())
    );
}

/// Prints the top-N groups as a table; totals cover all groups.
pub fn print_groups_summary(summary: &GroupsSummary, sort: SortBy, top_groups: usize) {
    println!("Top {} Groups:", top_groups);
    println!("{}", "=".repeat(70));
    println!("{:<40} {:>12} {:>15}", "Group", "Components", "Total Size");
    println!(
        "{:<40} {:>12} {:>15}",
        "-".repeat(40),
        "-".repeat(12),
        "-".repeat(15)
    );

    for (group, stats) in summary.sorted(sort).into_iter().take(top_groups) {
        println!(
            "{:<40} {:>12} {:>15}",
            group,
            stats.component_count,
            format_size(stats.size_bytes)
        );
    }

    println!();
    println!(
        "{:<40} {:>12} {:>15}",
        "TOTAL",
        summary.total_components(),
        format_size(summary.total_size_bytes())
    );
}

/// Prints the age histogram; unmatched components are not shown anywhere.
pub fn print_age_summary(summary: &AgeSummary) {
    println!("Component Age Report:");
    println!("{}", "=".repeat(70));
    println!("{:<20} {:>12} {:>15}", "Age Range", "Components", "Total Size");
    println!(
        "{:<20} {:>12} {:>15}",
        "-".repeat(20),
        "-".repeat(12),
        "-".repeat(15)
    );

    for bucket in summary.age_buckets() {
        println!(
            "{:<20} {:>12} {:>15}",
            bucket.range_label(),
            bucket.component_count(),
            format_size(bucket.size_bytes())
        );
    }

    println!();
    println!(
        "{:<20} {:>12} {:>15}",
        "TOTAL",
        summary.total_components(),
        format_size(summary.total_size_bytes())
    );
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
