//! Configuration file loading and catalog source factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ripple_core::session::DEFAULT_ITEM_COUNT;
use ripple_core::traits::CatalogSource;

use crate::file::FileSource;
use crate::http::{HttpSource, DEFAULT_TIMEOUT_SECS};
use crate::loader::{CatalogLoader, DEFAULT_MANIFEST_PATH, DEFAULT_TOKENS_PATH};

/// Where catalog resources come from.
///
/// Exactly one of `base_url` and `root_dir` is normally set; `base_url` wins
/// when both are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Root URL of the catalog file server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Local directory laid out like the catalog server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,
    /// HTTP request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Path of the manifest relative to the catalog root.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Token catalog path used when the manifest does not name one.
    #[serde(default = "default_tokens")]
    pub tokens: String,
}

/// Where exams are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// Top-level ripple configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RippleConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Item count of a new exam.
    #[serde(default = "default_item_count")]
    pub default_item_count: usize,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_manifest() -> String {
    DEFAULT_MANIFEST_PATH.to_string()
}
fn default_tokens() -> String {
    DEFAULT_TOKENS_PATH.to_string()
}
fn default_db_path() -> PathBuf {
    PathBuf::from("ripple.db")
}
fn default_item_count() -> usize {
    DEFAULT_ITEM_COUNT
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            root_dir: None,
            timeout_secs: default_timeout(),
            manifest: default_manifest(),
            tokens: default_tokens(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            store: StoreConfig::default(),
            default_item_count: default_item_count(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again, so a value that itself holds
/// `${...}` is kept literally.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
        from = start + value.len();
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Apply `RIPPLE_CATALOG_URL`, `RIPPLE_CATALOG_DIR` and `RIPPLE_DB` overrides.
///
/// A catalog override replaces the other catalog location so the override
/// is the one actually used.
fn apply_overrides(config: &mut RippleConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("RIPPLE_CATALOG_URL") {
        config.catalog.base_url = Some(url);
        config.catalog.root_dir = None;
    } else if let Some(dir) = lookup("RIPPLE_CATALOG_DIR") {
        config.catalog.root_dir = Some(PathBuf::from(dir));
        config.catalog.base_url = None;
    }
    if let Some(db) = lookup("RIPPLE_DB") {
        config.store.path = PathBuf::from(db);
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `ripple.toml` in the current directory
/// 2. `~/.config/ripple/config.toml`
///
/// Environment variable overrides: `RIPPLE_CATALOG_URL`, `RIPPLE_CATALOG_DIR`, `RIPPLE_DB`.
pub fn load_config() -> Result<RippleConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RippleConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("ripple.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = toml::from_str::<RippleConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            // Relative locations in a config file are relative to that file.
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                rebase(&mut config, dir);
            }
            config
        }
        None => RippleConfig::default(),
    };

    config.catalog.base_url = config.catalog.base_url.as_deref().map(resolve_env_vars);
    config.catalog.root_dir = config.catalog.root_dir.as_deref().map(resolve_path);
    config.store.path = resolve_path(&config.store.path);

    apply_overrides(&mut config, |name| std::env::var(name).ok());

    Ok(config)
}

fn rebase(config: &mut RippleConfig, dir: &Path) {
    let rebased = |path: &Path| {
        if path.is_relative() && !path.to_string_lossy().starts_with("${") {
            dir.join(path)
        } else {
            path.to_path_buf()
        }
    };
    config.catalog.root_dir = config.catalog.root_dir.as_deref().map(rebased);
    config.store.path = rebased(&config.store.path);
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("ripple"))
}

/// Create a catalog source from its configuration.
pub fn create_source(config: &CatalogConfig) -> Result<Arc<dyn CatalogSource>> {
    if let Some(url) = &config.base_url {
        tracing::debug!(url = %url, "using HTTP catalog");
        return Ok(Arc::new(HttpSource::new(url, config.timeout_secs)?));
    }
    if let Some(dir) = &config.root_dir {
        tracing::debug!(dir = %dir.display(), "using file catalog");
        return Ok(Arc::new(FileSource::new(dir)));
    }
    anyhow::bail!(
        "no catalog configured: set [catalog] base_url or root_dir in ripple.toml, \
         or RIPPLE_CATALOG_URL / RIPPLE_CATALOG_DIR"
    )
}

/// Create a loader for the configured catalog.
pub fn create_loader(config: &CatalogConfig) -> Result<CatalogLoader> {
    Ok(CatalogLoader::new(create_source(config)?)
        .with_manifest_path(config.manifest.clone())
        .with_tokens_path(config.tokens.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_RIPPLE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_RIPPLE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_RIPPLE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_RIPPLE_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_substituted_text() {
        std::env::set_var("_RIPPLE_TEST_SELF", "a${_RIPPLE_TEST_SELF}b");
        assert_eq!(
            resolve_env_vars("${_RIPPLE_TEST_SELF}/x"),
            "a${_RIPPLE_TEST_SELF}b/x"
        );
        std::env::set_var("_RIPPLE_TEST_PART", "v");
        assert_eq!(
            resolve_env_vars("${_RIPPLE_TEST_PART}-${_RIPPLE_TEST_PART}"),
            "v-v"
        );
        std::env::remove_var("_RIPPLE_TEST_SELF");
        std::env::remove_var("_RIPPLE_TEST_PART");
    }

    #[test]
    fn default_config() {
        let config = RippleConfig::default();
        assert_eq!(config.default_item_count, DEFAULT_ITEM_COUNT);
        assert_eq!(config.catalog.manifest, "manifest.json");
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.store.path, PathBuf::from("ripple.db"));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_item_count = 20

[catalog]
base_url = "https://catalog.example.org/v1"
timeout_secs = 5

[store]
path = "/var/lib/ripple/exams.db"
"#;
        let config: RippleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_item_count, 20);
        assert_eq!(
            config.catalog.base_url.as_deref(),
            Some("https://catalog.example.org/v1")
        );
        assert_eq!(config.catalog.timeout_secs, 5);
        assert_eq!(config.catalog.tokens, "tokens.json");
        assert_eq!(config.store.path, PathBuf::from("/var/lib/ripple/exams.db"));
    }

    #[test]
    fn env_overrides_replace_catalog_location() {
        let mut config: RippleConfig =
            toml::from_str("[catalog]\nroot_dir = \"./catalog\"\n").unwrap();
        let env: HashMap<&str, &str> = [
            ("RIPPLE_CATALOG_URL", "http://localhost:8080"),
            ("RIPPLE_DB", "/tmp/x.db"),
        ]
        .into_iter()
        .collect();
        apply_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.catalog.base_url.as_deref(), Some("http://localhost:8080"));
        assert!(config.catalog.root_dir.is_none());
        assert_eq!(config.store.path, PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn explicit_path_is_loaded_and_rebased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ripple.toml");
        std::fs::write(
            &path,
            "[catalog]\nroot_dir = \"catalog\"\n[store]\npath = \"exams.db\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        if std::env::var("RIPPLE_CATALOG_URL").is_err()
            && std::env::var("RIPPLE_CATALOG_DIR").is_err()
        {
            assert_eq!(config.catalog.root_dir, Some(dir.path().join("catalog")));
        }
        if std::env::var("RIPPLE_DB").is_err() {
            assert_eq!(config.store.path, dir.path().join("exams.db"));
        }
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn source_factory() {
        let mut config = CatalogConfig::default();
        assert!(create_source(&config).is_err());

        config.root_dir = Some(PathBuf::from("/srv/catalog"));
        assert_eq!(create_source(&config).unwrap().name(), "file");

        config.base_url = Some("http://localhost:1".into());
        assert_eq!(create_source(&config).unwrap().name(), "http");
    }
}
