use std::path::PathBuf;

use crate::product::Identifier;

/// Errors that can stop an import run.
///
/// Every variant is fatal: the pipeline halts at the first one it meets.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error for product {product}: {message}")]
    Parse { product: Identifier, message: String },

    #[error("image {index} of product {product} is missing the `{attribute}` attribute")]
    DataShape {
        product: Identifier,
        index: usize,
        attribute: &'static str,
    },
}

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error came from a remote call.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
