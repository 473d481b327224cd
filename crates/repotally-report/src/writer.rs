//! Report writers for JSON and CSV destinations.
//!
//! The destination type is inferred from the file extension up front, so an
//! unsupported path is rejected before any scan work happens. Writers buffer
//! sections and must be finished once after the last one.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use repotally_core::{Component, ConfigError};

use crate::age::AgeSummary;
use crate::sort::SortBy;
use crate::summary::{GroupsSummary, RepositoryComponentsSummary};

/// Errors while encoding or writing a report.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error writing report: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
}

/// Sink for the report sections a run produces.
pub trait ReportWriter {
    fn write_repository_summary(
        &mut self,
        summary: &RepositoryComponentsSummary,
        sort: SortBy,
    ) -> Result<(), WriteError>;

    fn write_groups_summary(
        &mut self,
        summary: &GroupsSummary,
        sort: SortBy,
        top_groups: usize,
    ) -> Result<(), WriteError>;

    fn write_age_summary(&mut self, summary: &AgeSummary) -> Result<(), WriteError>;

    /// Writes the flat list of filtered components.
    fn write_components(&mut self, components: &[Component]) -> Result<(), WriteError>;

    /// Flushes buffered output. Call once, after the last section.
    fn finish(&mut self) -> Result<(), WriteError>;
}

/// Output destination type, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Json,
    Csv,
}

impl OutputKind {
    /// Infers the destination type from a path. An unrecognized extension is
    /// a configuration error, raised before any network activity.
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".json") {
            Ok(Self::Json)
        } else if path.ends_with(".csv") {
            Ok(Self::Csv)
        } else {
            Err(ConfigError::UnsupportedOutput {
                path: path.to_string(),
            })
        }
    }

    /// Creates the destination file wrapped in the matching writer.
    pub fn create(self, path: impl AsRef<Path>) -> Result<Box<dyn ReportWriter>, WriteError> {
        let file = File::create(path)?;
        Ok(match self {
            Self::Json => Box::new(JsonReportWriter::new(file)),
            Self::Csv => Box::new(CsvReportWriter::new(file)),
        })
    }
}

/// Writes all requested sections as one pretty-printed JSON document.
///
/// Summaries serialize whole; group sorting and top-N are console/CSV
/// presentation concerns. A document holding only the component export is
/// emitted as a bare array.
pub struct JsonReportWriter<W: Write> {
    writer: W,
    root: Map<String, Value>,
}

impl<W: Write> JsonReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            root: Map::new(),
        }
    }
}

impl<W: Write> ReportWriter for JsonReportWriter<W> {
    fn write_repository_summary(
        &mut self,
        summary: &RepositoryComponentsSummary,
        _sort: SortBy,
    ) -> Result<(), WriteError> {
        self.root
            .insert("repositorySummary".to_string(), serde_json::to_value(summary)?);
        Ok(())
    }

    fn write_groups_summary(
        &mut self,
        summary: &GroupsSummary,
        _sort: SortBy,
        _top_groups: usize,
    ) -> Result<(), WriteError> {
        self.root
            .insert("groupsSummary".to_string(), serde_json::to_value(summary)?);
        Ok(())
    }

    fn write_age_summary(&mut self, summary: &AgeSummary) -> Result<(), WriteError> {
        self.root
            .insert("ageSummary".to_string(), serde_json::to_value(summary)?);
        Ok(())
    }

    fn write_components(&mut self, components: &[Component]) -> Result<(), WriteError> {
        self.root
            .insert("components".to_string(), serde_json::to_value(components)?);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        let root = std::mem::take(&mut self.root);
        let document = if root.len() == 1 && root.contains_key("components") {
            root.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
        } else {
            Value::Object(root)
        };
        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Writes sections as delimited text, one table per section, separated by a
/// blank line.
pub struct CsvReportWriter<W: Write> {
    writer: W,
    wrote_section: bool,
}

impl<W: Write> CsvReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            wrote_section: false,
        }
    }

    // Each section gets its own csv writer over the shared sink, so the
    // separator between sections is a genuinely blank line.
    fn start_section(&mut self) -> Result<csv::Writer<&mut W>, WriteError> {
        if self.wrote_section {
            self.writer.write_all(b"\n")?;
        }
        self.wrote_section = true;
        Ok(csv::Writer::from_writer(&mut self.writer))
    }
}

impl<W: Write> ReportWriter for CsvReportWriter<W> {
    fn write_repository_summary(
        &mut self,
        summary: &RepositoryComponentsSummary,
        sort: SortBy,
    ) -> Result<(), WriteError> {
        let mut writer = self.start_section()?;
        writer.write_record(["Repository", "Format", "Components", "Total Size"])?;
        for (repository, stats) in summary.sorted(sort) {
            writer.write_record([
                repository.as_str(),
                &stats.format,
                &stats.component_count.to_string(),
                &stats.size_bytes.to_string(),
            ])?;
        }
        writer.write_record([
            "TOTAL",
            "-",
            &summary.total_components().to_string(),
            &summary.total_size_bytes().to_string(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    fn write_groups_summary(
        &mut self,
        summary: &GroupsSummary,
        sort: SortBy,
        top_groups: usize,
    ) -> Result<(), WriteError> {
        let mut writer = self.start_section()?;
        writer.write_record(["Group", "Components", "Total Size"])?;
        for (group, stats) in summary.sorted(sort).into_iter().take(top_groups) {
            writer.write_record([
                group.as_str(),
                &stats.component_count.to_string(),
                &stats.size_bytes.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_age_summary(&mut self, summary: &AgeSummary) -> Result<(), WriteError> {
        let mut writer = self.start_section()?;
        writer.write_record(["Age Range", "Components", "Total Size"])?;
        for bucket in summary.age_buckets() {
            writer.write_record([
                bucket.range(),
                &bucket.component_count().to_string(),
                &bucket.size_bytes().to_string(),
            ])?;
        }
        writer.write_record([
            "TOTAL",
            &summary.total_components().to_string(),
            &summary.total_size_bytes().to_string(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    fn write_components(&mut self, components: &[Component]) -> Result<(), WriteError> {
        let mut writer = self.start_section()?;
        writer.write_record(["Repository", "Group", "Name", "Version", "Size"])?;
        for component in components {
            writer.write_record([
                component.repository.as_str(),
                component.group.as_deref().unwrap_or(""),
                component.name.as_deref().unwrap_or(""),
                component.version.as_deref().unwrap_or(""),
                &component.size_bytes().to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WriteError> {
        self.writer.flush()?;
        Ok(())
    }
}
