use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{TryStreamExt, stream};

use crate::catalog::ImageFetcher;
use crate::error::ImportError;
use crate::product::{Identifier, ImageDescriptor};

/// How many images of one product may download at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// Every image of the product at once.
    #[default]
    Unbounded,
    /// At most this many images in flight.
    Bounded(usize),
}

impl FanOut {
    /// `None` or zero means unbounded.
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(n) if n > 0 => Self::Bounded(n),
            _ => Self::Unbounded,
        }
    }

    fn limit(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(n) => Some(n),
        }
    }
}

/// Local layout for downloaded images: `{root}/{product}/{image name}`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn product_dir(&self, product: &Identifier) -> PathBuf {
        self.root.join(path_component(product.as_str()))
    }

    pub fn image_path(&self, image: &ImageDescriptor) -> PathBuf {
        self.product_dir(&image.product).join(path_component(&image.name))
    }

    /// Create the product directory if it is missing. Safe to call
    /// repeatedly and concurrently.
    pub async fn ensure_product_dir(&self, product: &Identifier) -> Result<PathBuf, ImportError> {
        let dir = self.product_dir(product);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ImportError::io(&dir, e))?;
        Ok(dir)
    }

    pub async fn write_image(&self, image: &ImageDescriptor, bytes: &[u8]) -> Result<PathBuf, ImportError> {
        let path = self.image_path(image);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ImportError::io(&path, e))?;
        Ok(path)
    }
}

/// Keep identifiers and image names from escaping their directory.
fn path_component(raw: &str) -> String {
    if raw.chars().all(|c| c == '.') {
        return raw.replace('.', "_");
    }
    raw.chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect()
}

/// Downloads every image of one product concurrently and stores them.
#[derive(Clone)]
pub struct FanOutDownloader {
    fetcher: Arc<dyn ImageFetcher>,
    store: ImageStore,
    fan_out: FanOut,
}

impl FanOutDownloader {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, store: ImageStore, fan_out: FanOut) -> Self {
        Self {
            fetcher,
            store,
            fan_out,
        }
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Download and write all `images`, returning how many were written.
    ///
    /// Completes only once every image is on disk; the first failure fails
    /// the whole set. An empty set touches nothing.
    pub async fn download(&self, images: &[ImageDescriptor]) -> Result<usize, ImportError> {
        if images.is_empty() {
            return Ok(0);
        }

        stream::iter(images.iter().map(Ok::<_, ImportError>))
            .try_for_each_concurrent(self.fan_out.limit(), |image| self.download_one(image))
            .await?;

        Ok(images.len())
    }

    async fn download_one(&self, image: &ImageDescriptor) -> Result<(), ImportError> {
        let (bytes, _) = futures::try_join!(
            self.fetcher.fetch_image(&image.url),
            self.store.ensure_product_dir(&image.product),
        )?;

        let path = self.store.write_image(image, &bytes).await?;
        tracing::debug!(
            product = %image.product,
            path = %path.display(),
            bytes = bytes.len(),
            "stored image"
        );
        Ok(())
    }
}
