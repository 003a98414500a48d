use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{Catalog, Identifier, ImageFetcher, ImportError, MetadataDocument};

/// Ordered record of collaborator calls, shareable between fakes so tests can
/// assert on the interleaving of lookups and image fetches.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: impl Into<String>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Position of the first entry equal to `call`.
    pub fn position(&self, call: &str) -> Option<usize> {
        self.entries().iter().position(|entry| entry == call)
    }

    pub fn count_prefixed(&self, prefix: &str) -> usize {
        self.entries()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }
}

/// In-memory catalog for testing. Records `lookup {id}` for every call.
pub struct InMemoryCatalog {
    label: String,
    documents: HashMap<Identifier, String>,
    failing: HashSet<Identifier>,
    log: CallLog,
}

impl InMemoryCatalog {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_log(label, CallLog::new())
    }

    pub fn with_log(label: impl Into<String>, log: CallLog) -> Self {
        Self {
            label: label.into(),
            documents: HashMap::new(),
            failing: HashSet::new(),
            log,
        }
    }

    pub fn add(&mut self, product: &str, body: impl Into<String>) {
        self.documents.insert(Identifier::new(product), body.into());
    }

    /// Make lookups of `product` fail with a network error.
    pub fn fail(&mut self, product: &str) {
        self.failing.insert(Identifier::new(product));
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

#[async_trait::async_trait]
impl Catalog for InMemoryCatalog {
    fn label(&self) -> &str {
        &self.label
    }

    async fn lookup(&self, product: &Identifier) -> Result<MetadataDocument, ImportError> {
        self.log.record(format!("lookup {product}"));

        if self.failing.contains(product) {
            return Err(ImportError::Network(format!("lookup of {product} refused")));
        }

        self.documents
            .get(product)
            .map(|body| MetadataDocument::new(product.clone(), body.clone()))
            .ok_or_else(|| ImportError::Network(format!("HTTP 404 Not Found for {product}")))
    }
}

/// In-memory image host for testing. Records `fetch {url}` for every call.
pub struct InMemoryImageFetcher {
    images: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    log: CallLog,
}

impl InMemoryImageFetcher {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            images: HashMap::new(),
            failing: HashSet::new(),
            log,
        }
    }

    pub fn add(&mut self, url: &str, bytes: impl Into<Vec<u8>>) {
        self.images.insert(url.to_owned(), bytes.into());
    }

    pub fn fail(&mut self, url: &str) {
        self.failing.insert(url.to_owned());
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

impl Default for InMemoryImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ImageFetcher for InMemoryImageFetcher {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ImportError> {
        self.log.record(format!("fetch {url}"));

        if self.failing.contains(url) {
            return Err(ImportError::Network(format!("fetch of {url} refused")));
        }

        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| ImportError::Network(format!("HTTP 404 Not Found for {url}")))
    }
}
