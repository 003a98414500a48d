pub mod catalog;
pub mod images;

pub use catalog::{DEFAULT_CATALOG_URL, HttpCatalog, HttpCatalogConfig, IDENTIFIER_PLACEHOLDER};
pub use images::HttpImageFetcher;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("product-images/", env!("CARGO_PKG_VERSION"));
