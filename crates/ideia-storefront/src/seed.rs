//! Demo catalog
//!
//! Loads two categories, three products, the store pricing defaults and the
//! parametric vase's price configuration. Existing records matched by slug
//! are left as they are, so seeding twice changes nothing.

use ideia_common::{Category, PriceConfigInput, Product, Result, StoredDefaults};
use ideia_pricing::{PriceSnapshot, PricingEngine, PricingTarget};
use rust_decimal_macros::dec;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::{CatalogStore, PricingStore, SharedStore};

/// Slug of the demo product that ships with a price configuration
pub const VASE_SLUG: &str = "vaso-parametrico";

/// Manufacturing inputs of the parametric vase
pub fn vase_price_config() -> PriceConfigInput {
    PriceConfigInput {
        grams_consumed: dec!(120),
        cost_per_kg: dec!(80),
        print_hours: dec!(3),
        machine_hourly_cost: dec!(6),
        kwh_per_hour: dec!(0.25),
        tariff_per_kwh: dec!(0.9),
        post_process_hours: dec!(0.5),
        post_process_hourly_cost: dec!(8),
        post_process_supplies: dec!(2),
        failure_percent: dec!(10),
        packaging: dec!(4),
        tax_percent: dec!(8),
        margin_percent: dec!(40),
        discount_percent: Some(dec!(0)),
    }
}

/// Seed demo data on startup
pub async fn seed_demo_data(store: &SharedStore) -> Result<()> {
    let decor = category(
        store,
        Category::new("Decoração & Design", "decoracao")
            .with_description("Peças decorativas e elementos de design em impressão 3D."),
    )
    .await?;
    let organizacao = category(
        store,
        Category::new("Organização & Mesa", "organizacao")
            .with_description("Suportes e organizadores funcionais para o dia a dia."),
    )
    .await?;

    let vase = product(
        store,
        Product::new("Vaso Paramétrico iDeia & Art", VASE_SLUG, dec!(49.90))
            .with_description("Vaso com design paramétrico, ideal para decorar mesas e prateleiras.")
            .with_category(decor)
            .with_lead_time(3),
    )
    .await?;
    product(
        store,
        Product::new("Suporte Minimalista para Headset", "suporte-headset-minimal", dec!(39.90))
            .with_description("Suporte clean para fone de ouvido, perfeito para setups organizados.")
            .with_category(organizacao)
            .with_lead_time(2),
    )
    .await?;
    product(
        store,
        Product::new(
            "Organizador de Cabos Clips 3D (Kit com 5)",
            "organizador-cabos-clips",
            dec!(19.90),
        )
        .with_description("Clips impressos em 3D para manter cabos alinhados na mesa ou bancada.")
        .with_category(organizacao)
        .with_lead_time(1),
    )
    .await?;

    if store.get_defaults().await.is_none() {
        store
            .put_defaults(StoredDefaults {
                margin_percent: dec!(30),
                tax_percent: dec!(8),
                failure_percent: dec!(5),
                packaging: dec!(3),
            })
            .await?;
    }

    // The vase's configuration is always refreshed; its public price is not touched
    let snapshot = PriceSnapshot::capture(
        &PricingEngine::new(),
        PricingTarget::product(vase),
        vase_price_config(),
    );
    store.put_snapshot(snapshot).await?;

    info!(
        products = store.list_products().await.len(),
        "Demo catalog ready"
    );
    Ok(())
}

async fn category(store: &SharedStore, category: Category) -> Result<Uuid> {
    if let Some(existing) = store
        .list_categories()
        .await
        .into_iter()
        .find(|c| c.slug == category.slug)
    {
        debug!(slug = %existing.slug, "Category already present");
        return Ok(existing.id);
    }
    Ok(store.insert_category(category).await?)
}

async fn product(store: &SharedStore, product: Product) -> Result<Uuid> {
    if let Some(existing) = store.get_product_by_slug(&product.slug).await {
        debug!(slug = %existing.slug, "Product already present");
        return Ok(existing.id);
    }
    Ok(store.upsert_product(product).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_catalog() {
        let store: SharedStore = Arc::new(InMemoryStore::new());
        seed_demo_data(&store).await.unwrap();

        assert_eq!(store.list_categories().await.len(), 2);
        let products = store.list_products().await;
        assert_eq!(products.len(), 3);

        let vase = store.get_product_by_slug(VASE_SLUG).await.unwrap();
        assert_eq!(vase.base_price, dec!(49.90));
        assert_eq!(vase.production_lead_time_days, 3);

        let snapshot = store
            .get_snapshot(&PricingTarget::product(vase.id))
            .await
            .unwrap();
        assert_eq!(snapshot.breakdown.final_price, dec!(63.05));

        let defaults = store.get_defaults().await.unwrap();
        assert_eq!(defaults.margin_percent, dec!(30));
        assert_eq!(defaults.packaging, dec!(3));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store: SharedStore = Arc::new(InMemoryStore::new());
        seed_demo_data(&store).await.unwrap();
        let vase_id = store.get_product_by_slug(VASE_SLUG).await.unwrap().id;

        store
            .put_defaults(StoredDefaults::fallback())
            .await
            .unwrap();
        seed_demo_data(&store).await.unwrap();

        assert_eq!(store.list_categories().await.len(), 2);
        assert_eq!(store.list_products().await.len(), 3);
        assert_eq!(store.get_product_by_slug(VASE_SLUG).await.unwrap().id, vase_id);
        // Defaults edited after the first run are kept
        assert_eq!(store.get_defaults().await, Some(StoredDefaults::fallback()));
    }
}
