pub mod catalog;
pub mod download;
pub mod error;
pub mod lines;
pub mod parse;
pub mod pipeline;
pub mod product;
pub mod stage;

pub use catalog::{Catalog, ImageFetcher};
pub use download::{FanOut, FanOutDownloader, ImageStore};
pub use error::ImportError;
pub use lines::read_lines;
pub use parse::parse_document;
pub use pipeline::{DEFAULT_OUTPUT_DIR, Pipeline, PipelineConfig, ProductImages, RunSummary};
pub use product::{Identifier, ImageDescriptor, MetadataDocument};
pub use stage::{LazySeq, StageExt, map_stage, map_stage_sync, run_serial};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
