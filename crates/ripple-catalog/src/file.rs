//! Catalog source reading a local directory laid out like the catalog server.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use ripple_core::error::CatalogError;
use ripple_core::traits::CatalogSource;

/// Reads `<root>/<path>` for each resource.
///
/// A missing file is reported as HTTP 404 so callers treat both sources alike.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, CatalogError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(CatalogError::Status {
                resource: path.to_string(),
                status: 404,
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch_json(&self, path: &str) -> Result<Value, CatalogError> {
        let full = self.resolve(path)?;
        let content = tokio::fs::read_to_string(&full).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CatalogError::Status {
                resource: path.to_string(),
                status: 404,
            },
            _ => CatalogError::Network {
                resource: path.to_string(),
                message: format!("{}: {e}", full.display()),
            },
        })?;

        serde_json::from_str(&content).map_err(|e| CatalogError::Malformed {
            resource: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_nested_resources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("banks")).unwrap();
        std::fs::write(
            dir.path().join("banks/math-9.json"),
            r#"{"meta": {"subject": "math"}, "items": []}"#,
        )
        .unwrap();

        let source = FileSource::new(dir.path());
        let value = source.fetch_json("banks/math-9.json").await.unwrap();
        assert_eq!(value["meta"]["subject"], "math");
        assert!(source.fetch_json("/banks/math-9.json").await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path());
        let err = source.fetch_json("manifest.json").await.unwrap_err();
        assert_eq!(
            err,
            CatalogError::Status {
                resource: "manifest.json".into(),
                status: 404
            }
        );
    }

    #[tokio::test]
    async fn parent_components_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("catalog"));
        let err = source.fetch_json("../secrets.json").await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tokens.json"), "[1, 2,").unwrap();
        let source = FileSource::new(dir.path());
        let err = source.fetch_json("tokens.json").await.unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }
}
