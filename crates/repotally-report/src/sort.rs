//! Sort keys for report rendering.

use serde::Serialize;

/// How repository and group tables are ordered.
///
/// `Name` sorts ascending; `Components` and `Size` sort descending, with the
/// name as a tiebreaker so output is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Name,
    #[default]
    Components,
    Size,
}

impl SortBy {
    /// The string form used on the command line and in report metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Components => "components",
            SortBy::Size => "size",
        }
    }
}
