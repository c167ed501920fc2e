//! In-memory storage backend
//!
//! DashMap-backed storage with slug indexes for catalog lookups.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ideia_common::{Category, Order, OrderFilter, OrderStatus, Product, StoredDefaults};
use ideia_pricing::{PriceSnapshot, PricingTarget};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{CatalogStore, OrderStore, PricingStore, StoreError};

/// In-memory storage implementation
///
/// Uses DashMap for concurrent access. Slug uniqueness is enforced through
/// the slug indexes' entry API, so concurrent inserts cannot both claim one.
#[derive(Default)]
pub struct InMemoryStore {
    /// Categories by ID
    categories: DashMap<Uuid, Category>,

    /// Category ID by slug
    category_slugs: DashMap<String, Uuid>,

    /// Products by ID
    products: DashMap<Uuid, Product>,

    /// Product ID by slug
    product_slugs: DashMap<String, Uuid>,

    /// Orders by ID
    orders: DashMap<Uuid, Order>,

    /// Latest price snapshot per product or variant
    snapshots: DashMap<PricingTarget, PriceSnapshot>,

    /// Store-wide pricing defaults
    defaults: RwLock<Option<StoredDefaults>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> =
            self.categories.iter().map(|c| c.value().clone()).collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    async fn insert_category(&self, category: Category) -> Result<Uuid, StoreError> {
        let id = category.id;
        match self.category_slugs.entry(category.slug.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateSlug(category.slug)),
            Entry::Vacant(slot) => {
                slot.insert(id);
                self.categories.insert(id, category);
                Ok(id)
            }
        }
    }

    async fn list_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.iter().map(|p| p.value().clone()).collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    async fn get_product(&self, id: &Uuid) -> Option<Product> {
        self.products.get(id).map(|p| p.clone())
    }

    async fn get_product_by_slug(&self, slug: &str) -> Option<Product> {
        let id = *self.product_slugs.get(slug)?;
        self.get_product(&id).await
    }

    async fn upsert_product(&self, product: Product) -> Result<Uuid, StoreError> {
        let id = product.id;

        match self.product_slugs.entry(product.slug.clone()) {
            Entry::Occupied(owner) if *owner.get() != id => {
                return Err(StoreError::DuplicateSlug(product.slug));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        // Release the old slug when the product was renamed
        let slug = product.slug.clone();
        if let Some(previous) = self.products.insert(id, product) {
            if previous.slug != slug {
                self.product_slugs.remove_if(&previous.slug, |_, owner| *owner == id);
            }
        }

        Ok(id)
    }

    async fn set_base_price(&self, id: &Uuid, price: Decimal) -> Result<(), StoreError> {
        let mut product = self.products.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        product.base_price = price;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: Order) -> Result<Uuid, StoreError> {
        let id = order.id;
        self.orders.insert(id, order);
        Ok(id)
    }

    async fn get_order(&self, id: &Uuid) -> Option<Order> {
        self.orders.get(id).map(|o| o.clone())
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        offset: usize,
        limit: usize,
    ) -> (Vec<Order>, usize) {
        let mut matching: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| filter.matches(o.value()))
            .map(|o| o.value().clone())
            .collect();

        // Newest first; equal timestamps fall back to the time-ordered id
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len();
        let page = matching.into_iter().skip(offset).take(limit).collect();
        (page, total)
    }

    async fn update_order_status(
        &self,
        id: &Uuid,
        status: OrderStatus,
    ) -> Result<OrderStatus, StoreError> {
        let mut order = self.orders.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        let previous = order.status;
        order.status = status;
        Ok(previous)
    }
}

#[async_trait]
impl PricingStore for InMemoryStore {
    async fn get_snapshot(&self, target: &PricingTarget) -> Option<PriceSnapshot> {
        self.snapshots.get(target).map(|s| s.clone())
    }

    async fn put_snapshot(&self, snapshot: PriceSnapshot) -> Result<(), StoreError> {
        self.snapshots.insert(snapshot.target, snapshot);
        Ok(())
    }

    async fn get_defaults(&self) -> Option<StoredDefaults> {
        self.defaults.read().clone()
    }

    async fn put_defaults(&self, defaults: StoredDefaults) -> Result<(), StoreError> {
        *self.defaults.write() = Some(defaults);
        Ok(())
    }
}
