use async_trait::async_trait;

pub use catalog_core::Product;

use crate::error::{Error, Result};

pub mod http;
pub mod memory;

/// Product storage backends.
///
/// Every call is a single round trip that yields exactly one outcome; there
/// are no retries and nothing is cached.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List all products
    async fn list(&self) -> Result<Vec<Product>>;

    /// Get one product by id
    async fn get(&self, id: &str) -> Result<Product>;

    /// Create a product; the backend assigns its id
    async fn create(&self, product: &Product) -> Result<Product>;

    /// Replace an existing product
    async fn update(&self, product: &Product) -> Result<Product>;

    /// Delete a product by id
    async fn delete(&self, id: &str) -> Result<()>;
}

pub(crate) fn require_id(id: &str) -> Result<&str> {
    if id.is_empty() {
        Err(Error::MissingId)
    } else {
        Ok(id)
    }
}

pub(crate) fn require_new(product: &Product) -> Result<()> {
    match product.id.as_deref() {
        Some(id) if !id.is_empty() => Err(Error::UnexpectedId(id.to_string())),
        _ => Ok(()),
    }
}
