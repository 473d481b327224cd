//! The component source abstraction.

use repotally_core::{ComponentPage, Repository};

use crate::error::SourceError;

/// A paginated source of repositories and their components.
///
/// Implementations must be safe to query concurrently: the scanner issues
/// page requests for several repositories at once, though pages within one
/// repository are always requested strictly in sequence.
#[allow(async_fn_in_trait)]
pub trait ComponentSource {
    /// Lists every repository known to the manager, including group-type
    /// repositories (the scanner skips those itself).
    async fn repositories(&self) -> Result<Vec<Repository>, SourceError>;

    /// Fetches one page of components for a repository. `token` is the
    /// continuation token returned by the previous page, or `None` for the
    /// first page.
    async fn components_page(
        &self,
        repository: &str,
        token: Option<&str>,
    ) -> Result<ComponentPage, SourceError>;
}
