//! ripple-catalog — Catalog sources and caching loaders.
//!
//! Implements the `CatalogSource` trait over HTTP and the local filesystem,
//! and layers validating, cached loaders for the manifest, item banks, and
//! the token and topic catalogs on top of any source.

pub mod cache;
pub mod config;
pub mod file;
pub mod http;
pub mod loader;
pub mod mock;
pub mod shape;

pub use cache::CatalogCache;
pub use config::{create_loader, create_source, load_config, RippleConfig};
pub use file::FileSource;
pub use http::HttpSource;
pub use loader::CatalogLoader;
