//! Validating, cached loaders for every catalog resource.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;

use ripple_core::error::CatalogError;
use ripple_core::model::{ItemBank, Manifest, Route, TokenCatalog, TopicCatalog};
use ripple_core::traits::CatalogSource;

use crate::cache::CatalogCache;
use crate::shape::{Shape, ITEM_BANK, MANIFEST, TOKEN_CATALOG, TOPIC_CATALOG};

pub const DEFAULT_MANIFEST_PATH: &str = "manifest.json";
pub const DEFAULT_TOKENS_PATH: &str = "tokens.json";

/// Loads catalog resources through one source, caching each by path.
///
/// The caches belong to the loader: two loaders never share results.
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    manifest_path: String,
    tokens_path: String,
    manifests: CatalogCache<Manifest>,
    banks: CatalogCache<ItemBank>,
    tokens: CatalogCache<TokenCatalog>,
    topics: CatalogCache<TopicCatalog>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            tokens_path: DEFAULT_TOKENS_PATH.to_string(),
            manifests: CatalogCache::new(),
            banks: CatalogCache::new(),
            tokens: CatalogCache::new(),
            topics: CatalogCache::new(),
        }
    }

    pub fn with_manifest_path(mut self, path: impl Into<String>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Token catalog path used when the manifest does not name one.
    pub fn with_tokens_path(mut self, path: impl Into<String>) -> Self {
        self.tokens_path = path.into();
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn load_manifest(&self) -> Result<Arc<Manifest>, CatalogError> {
        load(&self.manifests, &self.source, &self.manifest_path, MANIFEST).await
    }

    /// Look up a route of the manifest.
    pub async fn route(&self, route_id: &str) -> Result<Route, CatalogError> {
        let manifest = self.load_manifest().await?;
        manifest
            .route(route_id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownRoute(route_id.to_string()))
    }

    /// The item bank of a manifest route.
    pub async fn load_bank(&self, route_id: &str) -> Result<Arc<ItemBank>, CatalogError> {
        let route = self.route(route_id).await?;
        self.load_bank_at(&route.bank).await
    }

    /// An item bank by resource path, bypassing the manifest.
    #[instrument(skip(self))]
    pub async fn load_bank_at(&self, path: &str) -> Result<Arc<ItemBank>, CatalogError> {
        let bank = load(&self.banks, &self.source, path, ITEM_BANK).await?;
        tracing::debug!(items = bank.len(), version = ?bank.meta.content_version, "bank ready");
        Ok(bank)
    }

    pub async fn load_tokens(&self) -> Result<Arc<TokenCatalog>, CatalogError> {
        let path = match self.load_manifest().await {
            Ok(manifest) => manifest
                .tokens
                .clone()
                .unwrap_or_else(|| self.tokens_path.clone()),
            Err(e) => {
                tracing::debug!("manifest unavailable, using default token path: {e}");
                self.tokens_path.clone()
            }
        };
        load(&self.tokens, &self.source, &path, TOKEN_CATALOG).await
    }

    /// The topic catalog of a route, or `None` if the route has none.
    pub async fn load_topics(
        &self,
        route_id: &str,
    ) -> Result<Option<Arc<TopicCatalog>>, CatalogError> {
        let route = self.route(route_id).await?;
        match route.topics {
            Some(path) => Ok(Some(
                load(&self.topics, &self.source, &path, TOPIC_CATALOG).await?,
            )),
            None => Ok(None),
        }
    }

    /// Re-fetch the manifest and drop every cached resource if its content
    /// version changed.
    ///
    /// Returns `true` when the version changed. Without a completed manifest
    /// to compare against (never loaded, or still in flight) there is no
    /// known previous version, so nothing is dropped and `false` is returned.
    pub async fn refresh(&self) -> Result<bool, CatalogError> {
        let previous = self.manifests.peek(&self.manifest_path);
        self.manifests.invalidate(&self.manifest_path);

        let current = self.load_manifest().await?;
        let Some(previous) = previous else {
            tracing::debug!(version = ?current.content_version, "catalog manifest loaded");
            return Ok(false);
        };
        let changed = previous.content_version != current.content_version;
        if changed {
            tracing::info!(
                from = ?previous.content_version,
                to = ?current.content_version,
                "catalog content version changed"
            );
            self.banks.clear();
            self.tokens.clear();
            self.topics.clear();
        }
        Ok(changed)
    }

    /// Drop every cached resource.
    pub fn invalidate_all(&self) {
        self.manifests.clear();
        self.banks.clear();
        self.tokens.clear();
        self.topics.clear();
    }
}

async fn load<T>(
    cache: &CatalogCache<T>,
    source: &Arc<dyn CatalogSource>,
    path: &str,
    shape: Shape,
) -> Result<Arc<T>, CatalogError>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let source = Arc::clone(source);
    let owned = path.to_string();
    cache
        .get_or_fetch(path, move || async move {
            let value = source.fetch_json(&owned).await?;
            shape.decode(&owned, value)
        })
        .await
}
