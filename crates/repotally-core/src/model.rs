//! Wire-level data model for repositories, components, and assets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One physical file belonging to a component.
///
/// Timestamps are optional on the wire: an asset that has never been
/// downloaded carries no `lastDownloaded`, and some formats omit blob
/// creation dates entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// When the underlying blob was created.
    #[serde(default)]
    pub blob_created: Option<DateTime<Utc>>,

    /// When the asset was last modified.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,

    /// When the asset was last downloaded, absent if never downloaded.
    #[serde(default)]
    pub last_downloaded: Option<DateTime<Utc>>,

    /// Size of the asset in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// One logical artifact (e.g. a published library version) composed of assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Name of the repository holding this component.
    pub repository: String,

    /// Namespace field (Maven groupId, npm scope, ...).
    #[serde(default)]
    pub group: Option<String>,

    /// Component name.
    #[serde(default)]
    pub name: Option<String>,

    /// Component version.
    #[serde(default)]
    pub version: Option<String>,

    /// Assets belonging to this component.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Component {
    /// Total size of all assets in bytes, missing sizes counted as zero.
    pub fn size_bytes(&self) -> u64 {
        self.assets.iter().map(|a| a.file_size.unwrap_or(0)).sum()
    }
}

/// Kind of repository as reported by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    Hosted,
    Proxy,
    Group,
}

/// A repository known to the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name.
    pub name: String,

    /// Repository format (e.g. "maven2", "npm").
    #[serde(default)]
    pub format: String,

    /// Repository kind.
    #[serde(rename = "type")]
    pub kind: RepositoryType,
}

impl Repository {
    /// Group repositories aggregate others and hold no components themselves.
    pub fn is_group(&self) -> bool {
        self.kind == RepositoryType::Group
    }
}

/// One page of a component listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPage {
    /// Components on this page.
    #[serde(default)]
    pub items: Vec<Component>,

    /// Cursor for the next page, absent or empty when this is the last page.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_size_counts_missing_as_zero() {
        let component = Component {
            repository: "releases".to_string(),
            assets: vec![
                Asset {
                    file_size: Some(100),
                    ..Asset::default()
                },
                Asset::default(),
                Asset {
                    file_size: Some(42),
                    ..Asset::default()
                },
            ],
            ..Component::default()
        };
        assert_eq!(component.size_bytes(), 142);
    }

    #[test]
    fn repository_page_deserializes_wire_shape() {
        let json = r#"{
            "items": [{
                "repository": "maven-releases",
                "group": "com.example",
                "name": "demo",
                "version": "1.0.0",
                "assets": [{
                    "blobCreated": "2024-06-01T00:00:00Z",
                    "fileSize": 1024
                }]
            }],
            "continuationToken": "abc123"
        }"#;

        let page: ComponentPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.continuation_token.as_deref(), Some("abc123"));
        let component = &page.items[0];
        assert_eq!(component.group.as_deref(), Some("com.example"));
        assert!(component.assets[0].blob_created.is_some());
        assert!(component.assets[0].last_downloaded.is_none());
        assert_eq!(component.size_bytes(), 1024);
    }

    #[test]
    fn repository_type_distinguishes_groups() {
        let json = r#"{"name": "maven-public", "format": "maven2", "type": "group"}"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert!(repo.is_group());

        let json = r#"{"name": "maven-releases", "format": "maven2", "type": "hosted"}"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert!(!repo.is_group());
    }
}
