use product_images::{ImageFetcher, ImportError};

use crate::DEFAULT_USER_AGENT;

/// Downloads image bytes over HTTP GET.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpImageFetcher {
    pub fn new(user_agent: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), user_agent)
    }

    pub fn with_client(client: reqwest::Client, user_agent: Option<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ImportError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| ImportError::Network(format!("image download from {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ImportError::Network(format!(
                "image download from {url} returned HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImportError::Network(format!("failed to read image body from {url}: {e}")))?;

        Ok(bytes.to_vec())
    }
}
