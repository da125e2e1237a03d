use std::path::Path;
use std::sync::Arc;

use storefront_core::{Product, Resource, UpiConfig};

use crate::store::Collection;

/// Gives generic handlers the collection for one record kind.
pub trait HasCollection<R: Resource>: Clone + Send + Sync + 'static {
    fn collection(&self) -> &Collection<R>;
}

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<Collection<Product>>,
    pub upi: Arc<Collection<UpiConfig>>,
}

impl AppState {
    pub async fn open(data_dir: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            products: Arc::new(Collection::open(data_dir).await?),
            upi: Arc::new(Collection::open(data_dir).await?),
        })
    }

    pub fn in_memory(products: Vec<Product>, upi: Vec<UpiConfig>) -> Self {
        Self {
            products: Arc::new(Collection::in_memory(products)),
            upi: Arc::new(Collection::in_memory(upi)),
        }
    }
}

impl HasCollection<Product> for AppState {
    fn collection(&self) -> &Collection<Product> {
        &self.products
    }
}

impl HasCollection<UpiConfig> for AppState {
    fn collection(&self) -> &Collection<UpiConfig> {
        &self.upi
    }
}
