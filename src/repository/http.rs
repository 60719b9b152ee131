use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode, Url};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::repository::{require_id, require_new, Product, ProductRepository};

/// REST-backed repository
///
/// Endpoints, relative to the configured API URL:
/// ```text
/// GET    /products        list
/// GET    /products/{id}   get
/// POST   /products        create
/// PUT    /products/{id}   update
/// DELETE /products/{id}   delete
/// ```
pub struct HttpRepository {
    client: Client,
    products_url: Url,
}

impl HttpRepository {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, api_url)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.timeout())
    }

    /// Use a preconfigured client (proxies, TLS, default headers).
    pub fn with_client(client: Client, api_url: &str) -> Result<Self> {
        let mut products_url =
            Url::parse(api_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", api_url, e)))?;
        products_url
            .path_segments_mut()
            .map_err(|_| Error::InvalidUrl(api_url.to_string()))?
            .pop_if_empty()
            .push("products");
        Ok(Self {
            client,
            products_url,
        })
    }

    pub fn products_url(&self) -> &Url {
        &self.products_url
    }

    fn product_url(&self, id: &str) -> Url {
        let mut url = self.products_url.clone();
        // products_url always has a path, so this cannot be a cannot-be-a-base URL
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Product>,
        id: Option<&str>,
    ) -> Result<Response> {
        let started = Instant::now();
        debug!("[HTTP] Request {} {} started", method, url);

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(product) = body {
            request = request.json(product);
        }
        let result = request.send().await;

        info!(
            "[HTTP] Request {} {} completed in {}ms",
            method,
            url,
            started.elapsed().as_millis()
        );

        let response =
            result.inspect_err(|e| warn!("[HTTP] {} {} failed: {}", method, url, e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id.unwrap_or(url.path()).to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: error_message(status, &text),
        })
    }
}

/// Pull a readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl ProductRepository for HttpRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        let response = self
            .execute(Method::GET, self.products_url.clone(), None, None)
            .await?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: &str) -> Result<Product> {
        let id = require_id(id)?;
        let response = self
            .execute(Method::GET, self.product_url(id), None, Some(id))
            .await?;
        Ok(response.json().await?)
    }

    async fn create(&self, product: &Product) -> Result<Product> {
        require_new(product)?;
        let response = self
            .execute(Method::POST, self.products_url.clone(), Some(product), None)
            .await?;
        let created: Product = response.json().await?;
        debug!("Created product {}", created.id_str());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let id = require_id(product.id_str())?;
        let response = self
            .execute(Method::PUT, self.product_url(id), Some(product), Some(id))
            .await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = require_id(id)?;
        self.execute(Method::DELETE, self.product_url(id), None, Some(id))
            .await?;
        Ok(())
    }
}
