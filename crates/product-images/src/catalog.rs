use std::sync::Arc;

use crate::error::ImportError;
use crate::product::{Identifier, MetadataDocument};

/// A remote catalog that knows the image metadata of each product.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Human-readable label identifying this catalog.
    fn label(&self) -> &str;

    /// Fetch the raw metadata document for one product.
    async fn lookup(&self, product: &Identifier) -> Result<MetadataDocument, ImportError>;
}

#[async_trait::async_trait]
impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn lookup(&self, product: &Identifier) -> Result<MetadataDocument, ImportError> {
        (**self).lookup(product).await
    }
}

/// Retrieves the raw bytes behind an image URL.
#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ImportError>;
}

#[async_trait::async_trait]
impl<T: ImageFetcher + ?Sized> ImageFetcher for Arc<T> {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ImportError> {
        (**self).fetch_image(url).await
    }
}
