//! Site content: announcements, banners, the popup offer and the tiers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};

const BUNDLED: &str = include_str!("../assets/site.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read site content from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid site content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid service tiers: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub image: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupContent {
    pub title: String,
    pub message: String,
    pub desktop_image: String,
    pub mobile_image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    #[serde(default)]
    pub announcements: Vec<String>,
    #[serde(default)]
    pub banners: Vec<Banner>,
    pub popup: Option<PopupContent>,
    #[serde(default)]
    pub tiers: Catalog,
}

impl SiteContent {
    /// Content compiled into the binary.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::parse(BUNDLED)
    }

    pub fn parse(json: &str) -> Result<Self, ContentError> {
        let content: Self = serde_json::from_str(json)?;
        content.tiers.validate()?;
        Ok(content)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = Self::parse(&json)?;
        tracing::info!(
            path = %path.display(),
            tiers = content.tiers.tiers().len(),
            announcements = content.announcements.len(),
            "Loaded site content"
        );
        Ok(content)
    }

    /// Load from `path` when given, otherwise use the bundled content.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ContentError> {
        path.map_or_else(Self::bundled, Self::load)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_bundled_content_is_valid() {
        let content = SiteContent::bundled().unwrap();
        assert!(!content.announcements.is_empty());
        assert!(!content.banners.is_empty());
        assert!(content.popup.is_some());

        let keys: Vec<_> = content.tiers.tiers().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["basic", "premium", "deluxe"]);
    }

    #[test]
    fn test_sections_default_to_empty() {
        let content = SiteContent::parse("{}").unwrap();
        assert!(content.announcements.is_empty());
        assert!(content.popup.is_none());
        assert!(content.tiers.is_empty());
    }

    #[test]
    fn test_duplicate_tiers_rejected() {
        let json = r#"{"tiers": [
            {"key": "basic", "name": "Basic", "price": 1},
            {"key": "basic", "name": "Again", "price": 2}
        ]}"#;
        assert!(matches!(
            SiteContent::parse(json),
            Err(ContentError::Catalog(CatalogError::DuplicateTier(_)))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"announcements": ["Om"]}}"#).unwrap();

        let content = SiteContent::resolve(Some(file.path())).unwrap();
        assert_eq!(content.announcements, ["Om"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = SiteContent::load(Path::new("/nonexistent/site.json"));
        assert!(matches!(result, Err(ContentError::Read { .. })));
    }
}
