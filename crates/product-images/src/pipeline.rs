//! Serial driver over the composed product stream.
//!
//! Input lines become identifiers, identifiers become catalog documents,
//! documents become image sets, and each image set is downloaded before the
//! next line is even looked at. Only the images of a single product are ever
//! in flight together.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future;
use futures::stream::Stream;
use futures::TryStreamExt;

use crate::catalog::{Catalog, ImageFetcher};
use crate::download::{FanOut, FanOutDownloader, ImageStore};
use crate::error::ImportError;
use crate::lines::read_lines;
use crate::parse::parse_document;
use crate::product::{Identifier, ImageDescriptor};
use crate::stage::{LazySeq, StageExt, run_serial};

/// Default output root, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "product-images";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub fan_out: FanOut,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fan_out: FanOut::default(),
        }
    }
}

/// Image descriptors of one product, in document order.
#[derive(Debug, Clone)]
pub struct ProductImages {
    pub product: Identifier,
    pub images: Vec<ImageDescriptor>,
}

/// Outcome of a run that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub products: usize,
}

pub struct Pipeline {
    catalog: Arc<dyn Catalog>,
    downloader: FanOutDownloader,
}

impl Pipeline {
    pub fn new(catalog: Arc<dyn Catalog>, fetcher: Arc<dyn ImageFetcher>, config: PipelineConfig) -> Self {
        let store = ImageStore::new(config.output_dir);
        Self {
            catalog,
            downloader: FanOutDownloader::new(fetcher, store, config.fan_out),
        }
    }

    /// Process every product listed in the file at `input`.
    pub async fn run(&self, input: &Path) -> Result<RunSummary, ImportError> {
        tracing::info!(
            input = %input.display(),
            catalog = self.catalog.label(),
            output = %self.downloader.store().root().display(),
            "getting products"
        );

        let lines = read_lines(input).await?;
        self.run_lines(lines).await
    }

    /// Process products from an already opened line stream.
    pub async fn run_lines(
        &self,
        lines: impl Stream<Item = Result<String, ImportError>> + Send + 'static,
    ) -> Result<RunSummary, ImportError> {
        let downloader = self.downloader.clone();

        let completed = self.image_sets(lines).map_stage(move |set: ProductImages| {
            let downloader = downloader.clone();
            async move {
                let written = downloader.download(&set.images).await?;
                tracing::info!(product = %set.product, images = written, "product done");
                Ok::<_, ImportError>(set.product)
            }
        });

        let products = run_serial(completed).await?;
        tracing::info!(products, "all products processed");
        Ok(RunSummary { products })
    }

    /// Compose the lazy identifier → document → image set chain.
    pub fn image_sets(
        &self,
        lines: impl Stream<Item = Result<String, ImportError>> + Send + 'static,
    ) -> LazySeq<'static, ProductImages, ImportError> {
        let catalog = Arc::clone(&self.catalog);

        identifiers(lines)
            .map_stage(move |product: Identifier| {
                let catalog = Arc::clone(&catalog);
                async move {
                    tracing::info!(%product, "looking up product");
                    catalog.lookup(&product).await
                }
            })
            .map_stage_sync(|doc| {
                let images = parse_document(&doc)?;
                Ok(ProductImages {
                    product: doc.product,
                    images,
                })
            })
    }
}

/// Blank lines are skipped; everything else becomes an identifier.
fn identifiers(
    lines: impl Stream<Item = Result<String, ImportError>> + Send + 'static,
) -> impl Stream<Item = Result<Identifier, ImportError>> + Send + 'static {
    lines.try_filter_map(|line| {
        let parsed = Identifier::parse(&line);
        if parsed.is_none() {
            tracing::debug!(line = ?line, "skipping blank input line");
        }
        future::ready(Ok(parsed))
    })
}
