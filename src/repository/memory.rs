use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::repository::{require_id, require_new, Product, ProductRepository};

/// In-process repository
///
/// Behaves like the REST service: ids are assigned on create, unknown ids
/// are reported as not found, and list order is insertion order. Switching
/// it offline makes every call fail the way an unreachable server would.
#[derive(Default)]
pub struct MemoryRepository {
    products: Mutex<Vec<Product>>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with products, assigning ids to those without one.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut products: Vec<Product> = products.into_iter().collect();
        let highest = products
            .iter()
            .filter_map(|p| p.id_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let repo = Self {
            next_id: AtomicU64::new(highest),
            ..Self::default()
        };
        for product in products.iter_mut().filter(|p| p.id_str().is_empty()) {
            product.id = Some(repo.assign_id());
        }
        Self {
            products: Mutex::new(products),
            ..repo
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.lock().await.clone()
    }

    fn assign_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Transport("product service unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        self.check_online()?;
        Ok(self.products.lock().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Product> {
        let id = require_id(id)?;
        self.check_online()?;
        self.products
            .lock()
            .await
            .iter()
            .find(|p| p.id_str() == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn create(&self, product: &Product) -> Result<Product> {
        require_new(product)?;
        self.check_online()?;
        let mut created = product.clone();
        created.id = Some(self.assign_id());
        self.products.lock().await.push(created.clone());
        debug!("Stored product {}", created.id_str());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let id = require_id(product.id_str())?;
        self.check_online()?;
        let mut products = self.products.lock().await;
        let slot = products
            .iter_mut()
            .find(|p| p.id_str() == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        *slot = product.clone();
        Ok(product.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = require_id(id)?;
        self.check_online()?;
        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|p| p.id_str() != id);
        if products.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }
}
