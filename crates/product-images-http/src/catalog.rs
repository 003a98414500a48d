use product_images::{Catalog, Identifier, ImportError, MetadataDocument};

use crate::DEFAULT_USER_AGENT;

/// Placeholder replaced by the product identifier in a catalog URL template.
pub const IDENTIFIER_PLACEHOLDER: &str = "{identifier}";

/// MediaBank XML endpoint, one document per product.
pub const DEFAULT_CATALOG_URL: &str =
    "https://reima.mediabank.fi/fi/extension/onesite/xml/{identifier}";

/// Configuration for an HTTP catalog.
#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    /// URL with an `{identifier}` placeholder. Without one, the identifier
    /// is appended.
    pub url_template: String,
    pub user_agent: Option<String>,
}

impl Default for HttpCatalogConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_CATALOG_URL.to_owned(),
            user_agent: None,
        }
    }
}

/// Looks up product metadata documents over HTTP GET.
pub struct HttpCatalog {
    config: HttpCatalogConfig,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(config: HttpCatalogConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Reuse an existing client (and its connection pool).
    pub fn with_client(config: HttpCatalogConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn lookup_url(&self, product: &Identifier) -> String {
        let template = &self.config.url_template;
        if template.contains(IDENTIFIER_PLACEHOLDER) {
            template.replace(IDENTIFIER_PLACEHOLDER, product.as_str())
        } else {
            format!("{template}{product}")
        }
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let user_agent = self
            .config
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);
        self.client.get(url).header("User-Agent", user_agent)
    }
}

#[async_trait::async_trait]
impl Catalog for HttpCatalog {
    fn label(&self) -> &str {
        &self.config.url_template
    }

    async fn lookup(&self, product: &Identifier) -> Result<MetadataDocument, ImportError> {
        let url = self.lookup_url(product);
        tracing::debug!(%product, %url, "requesting catalog document");

        let response = self
            .build_request(&url)
            .send()
            .await
            .map_err(|e| ImportError::Network(format!("catalog lookup for {product} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ImportError::Network(format!(
                "catalog lookup for {product} returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            ImportError::Network(format!("failed to read catalog body for {product}: {e}"))
        })?;

        Ok(MetadataDocument::new(product.clone(), body))
    }
}
