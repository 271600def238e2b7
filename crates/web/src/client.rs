//! Product service client.

use std::future::Future;

use reqwest::Url;
use shopfront_catalog::{Product, ProductId};
use thiserror::Error;

use crate::config::StorefrontConfig;

/// Why a product could not be fetched.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request failed with status code {0}")]
    Status(u16),
    #[error("Invalid product response: {0}")]
    Parse(String),
    #[error("Invalid product URL: {0}")]
    InvalidUrl(String),
}

/// Read access to the product service.
///
/// `Ok(None)` means the service answered successfully with an empty body
/// (JSON `null`).
pub trait ProductClient {
    fn fetch_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Option<Product>, FetchError>>;
}

/// HTTP client for `GET {base}/products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpProductClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpProductClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(base_url: Url, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: Some(token),
        }
    }

    pub fn from_config(config: &StorefrontConfig) -> Self {
        match &config.api_token {
            Some(token) => Self::with_token(config.api_url.clone(), token.clone()),
            None => Self::new(config.api_url.clone()),
        }
    }

    /// URL of a single product; the id is escaped as one path segment.
    pub fn product_url(&self, id: &ProductId) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("products").push(id.as_str());
        }
        Ok(url)
    }
}

impl ProductClient for HttpProductClient {
    async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, FetchError> {
        let url = self.product_url(id)?;
        tracing::info!("Fetching product {} from {}", id, url);

        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        resp.json::<Option<Product>>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}
