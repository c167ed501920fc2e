//! Storefront Storage
//!
//! Storage traits for the catalog, placed orders and pricing data, plus the
//! in-memory backend used by the gateway and tests.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use ideia_common::{
    Category, IdeiaError, Order, OrderFilter, OrderStatus, Product, StoredDefaults,
};
use ideia_pricing::{PriceSnapshot, PricingTarget};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Catalog storage
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_categories(&self) -> Vec<Category>;

    /// Insert a category; its slug must be unused
    async fn insert_category(&self, category: Category) -> Result<Uuid, StoreError>;

    /// All products, sorted by name
    async fn list_products(&self) -> Vec<Product>;

    async fn get_product(&self, id: &Uuid) -> Option<Product>;

    async fn get_product_by_slug(&self, slug: &str) -> Option<Product>;

    /// Insert or replace a product by id; its slug must not belong to another product
    async fn upsert_product(&self, product: Product) -> Result<Uuid, StoreError>;

    /// Overwrite the publicly displayed price of a product
    async fn set_base_price(&self, id: &Uuid, price: Decimal) -> Result<(), StoreError>;
}

/// Placed order storage
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<Uuid, StoreError>;

    async fn get_order(&self, id: &Uuid) -> Option<Order>;

    /// Matching orders, newest first, and the total number of matches
    async fn list_orders(
        &self,
        filter: &OrderFilter,
        offset: usize,
        limit: usize,
    ) -> (Vec<Order>, usize);

    /// Set the status of an order, returning the previous one
    async fn update_order_status(
        &self,
        id: &Uuid,
        status: OrderStatus,
    ) -> Result<OrderStatus, StoreError>;
}

/// Pricing configuration storage
#[async_trait]
pub trait PricingStore: Send + Sync {
    async fn get_snapshot(&self, target: &PricingTarget) -> Option<PriceSnapshot>;

    /// Store a snapshot, replacing any previous one for the same target
    async fn put_snapshot(&self, snapshot: PriceSnapshot) -> Result<(), StoreError>;

    /// Store-wide defaults, if ever saved
    async fn get_defaults(&self) -> Option<StoredDefaults>;

    async fn put_defaults(&self, defaults: StoredDefaults) -> Result<(), StoreError>;
}

/// Everything the storefront services need from a backend
pub trait StorefrontStore: CatalogStore + OrderStore + PricingStore {}

impl<T> StorefrontStore for T where T: CatalogStore + OrderStore + PricingStore {}

/// Backend shared across request handlers
pub type SharedStore = Arc<dyn StorefrontStore>;

/// Errors from store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

impl From<StoreError> for IdeiaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => IdeiaError::NotFound(id.to_string()),
            StoreError::DuplicateSlug(_) => IdeiaError::Validation(err.to_string()),
            StoreError::Backend(msg) => IdeiaError::Storage(msg),
        }
    }
}
