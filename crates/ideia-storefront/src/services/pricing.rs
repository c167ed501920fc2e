//! Back-office pricing
//!
//! Loads, previews and saves a product's manufacturing-cost configuration.
//! Every price shown or stored comes from the one [`PricingEngine`].

use ideia_common::{
    IdeiaError, PriceBreakdown, PriceConfigDraft, PriceConfigInput, PriceField, Product, Result,
    StoredDefaults,
};
use ideia_pricing::{
    effective_defaults, resolve, DefaultsUpdate, PriceSnapshot, PricingEngine, PricingTarget,
    Preview,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::store::{CatalogStore, PricingStore, SharedStore};

/// Everything the price editor needs for one product
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingView {
    pub product: Product,
    pub target: PricingTarget,
    /// Last saved configuration, if any
    pub config: Option<PriceConfigInput>,
    pub snapshot: Option<PriceSnapshot>,
    /// Whether the saved breakdown still matches the current engine
    pub snapshot_current: bool,
    pub defaults: StoredDefaults,
    /// Saved configuration layered over the defaults
    pub draft: PriceConfigDraft,
    pub preview: Option<PriceBreakdown>,
    pub missing_fields: Vec<PriceField>,
}

/// Body of a save request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub config: PriceConfigDraft,
    /// Overwrite the product's public price with the computed final price
    #[serde(default)]
    pub apply_to_product: bool,
}

/// Result of a save
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub snapshot: PriceSnapshot,
    /// New public price, when it was applied
    pub applied_price: Option<Decimal>,
}

/// Pricing administration service
#[derive(Clone)]
pub struct PricingAdmin {
    store: SharedStore,
    engine: PricingEngine,
}

impl PricingAdmin {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            engine: PricingEngine::new(),
        }
    }

    /// Load the editor state for a product or variant
    #[instrument(skip(self), fields(product_id = %target.product_id))]
    pub async fn load(&self, target: PricingTarget) -> Result<PricingView> {
        let product = self.ensure_product(&target).await?;
        let snapshot = self.store.get_snapshot(&target).await;
        let defaults = effective_defaults(self.store.get_defaults().await.as_ref());

        let config = snapshot.as_ref().map(|s| s.config.clone());
        let draft = resolve(Some(&defaults), config.as_ref());
        let (preview, missing_fields) = match self.engine.preview(&draft) {
            Preview::Ready(breakdown) => (Some(breakdown), Vec::new()),
            Preview::Incomplete(missing) => (None, missing),
        };

        let snapshot_current = snapshot
            .as_ref()
            .map(|s| s.is_current(&self.engine))
            .unwrap_or(false);
        if snapshot.is_some() && !snapshot_current {
            warn!("Saved price breakdown differs from the current computation");
        }

        Ok(PricingView {
            product,
            target,
            config,
            snapshot,
            snapshot_current,
            defaults,
            draft,
            preview,
            missing_fields,
        })
    }

    /// Price an in-progress draft without storing anything
    pub fn preview(&self, draft: &PriceConfigDraft) -> Preview {
        self.engine.preview(draft)
    }

    /// Validate, price and store a configuration
    ///
    /// The product's public price only changes when `apply_to_product` is set,
    /// and then it becomes exactly the snapshot's final price.
    #[instrument(skip(self, request), fields(product_id = %target.product_id))]
    pub async fn save(&self, target: PricingTarget, request: SaveRequest) -> Result<SaveOutcome> {
        let product = self.ensure_product(&target).await?;

        if request.apply_to_product && target.variant_id.is_some() {
            return Err(IdeiaError::Validation(
                "applyToProduct requires a product-level configuration".to_string(),
            ));
        }

        let config = PriceConfigInput::try_from(request.config)?;
        let snapshot = PriceSnapshot::capture(&self.engine, target, config);
        self.store.put_snapshot(snapshot.clone()).await?;

        let applied_price = if request.apply_to_product {
            let price = snapshot.breakdown.final_price;
            self.store.set_base_price(&product.id, price).await?;
            info!(
                previous = %product.base_price,
                current = %price,
                "Applied computed price to product"
            );
            Some(price)
        } else {
            None
        };

        info!(final_price = %snapshot.breakdown.final_price, "Saved price configuration");
        Ok(SaveOutcome {
            snapshot,
            applied_price,
        })
    }

    /// Store-wide defaults, falling back to the built-in ones
    pub async fn defaults(&self) -> StoredDefaults {
        effective_defaults(self.store.get_defaults().await.as_ref())
    }

    #[instrument(skip(self))]
    pub async fn update_defaults(&self, update: DefaultsUpdate) -> Result<StoredDefaults> {
        let defaults = update.into_defaults();
        self.store.put_defaults(defaults.clone()).await?;
        info!("Updated pricing defaults");
        Ok(defaults)
    }

    /// Whether a product-level configuration was ever saved
    pub async fn has_saved_config(&self, product_id: &Uuid) -> bool {
        self.store
            .get_snapshot(&PricingTarget::product(*product_id))
            .await
            .is_some()
    }

    /// The product a target belongs to, or not found
    pub async fn ensure_product(&self, target: &PricingTarget) -> Result<Product> {
        self.store
            .get_product(&target.product_id)
            .await
            .ok_or_else(|| IdeiaError::NotFound(format!("product {}", target.product_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use ideia_common::PricingError;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn vase_draft() -> PriceConfigDraft {
        serde_json::from_value(serde_json::json!({
            "consumoGramas": 120,
            "custoPorKg": 80,
            "tempoImpressaoHoras": 3,
            "custoHoraMaquina": 6,
            "consumoKwhHora": 0.25,
            "tarifaKwh": 0.9,
            "tempoPosProcessoHoras": 0.5,
            "custoHoraPos": 8,
            "insumosPos": 2,
            "taxaFalhaPercent": 10,
            "embalagem": 4,
            "impostosPercent": 8,
            "margemLucroPercent": 40,
            "descontoPercent": 0
        }))
        .unwrap()
    }

    async fn setup() -> (PricingAdmin, Arc<InMemoryStore>, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let id = store
            .upsert_product(Product::new("Vaso", "vaso", dec!(49.90)))
            .await
            .unwrap();
        (PricingAdmin::new(store.clone()), store, id)
    }

    #[tokio::test]
    async fn test_load_without_saved_config() {
        let (admin, _, id) = setup().await;
        let view = admin.load(PricingTarget::product(id)).await.unwrap();

        assert!(view.config.is_none());
        assert!(!view.snapshot_current);
        assert_eq!(view.defaults, StoredDefaults::fallback());
        // The built-in form fallback is complete, so a preview is shown
        assert!(view.preview.is_some());
        assert!(view.missing_fields.is_empty());
    }

    #[tokio::test]
    async fn test_load_unknown_product() {
        let (admin, _, _) = setup().await;
        let result = admin.load(PricingTarget::product(Uuid::now_v7())).await;
        assert!(matches!(result, Err(IdeiaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_without_apply_keeps_price() {
        let (admin, store, id) = setup().await;
        let outcome = admin
            .save(
                PricingTarget::product(id),
                SaveRequest {
                    config: vase_draft(),
                    apply_to_product: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.snapshot.breakdown.final_price, dec!(63.05));
        assert_eq!(outcome.applied_price, None);
        assert_eq!(store.get_product(&id).await.unwrap().base_price, dec!(49.90));

        let view = admin.load(PricingTarget::product(id)).await.unwrap();
        assert!(view.snapshot_current);
        assert_eq!(view.preview.unwrap().final_price, dec!(63.05));
    }

    #[tokio::test]
    async fn test_save_with_apply_sets_final_price() {
        let (admin, store, id) = setup().await;
        let outcome = admin
            .save(
                PricingTarget::product(id),
                SaveRequest {
                    config: vase_draft(),
                    apply_to_product: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.applied_price, Some(dec!(63.05)));
        assert_eq!(store.get_product(&id).await.unwrap().base_price, dec!(63.05));
    }

    #[tokio::test]
    async fn test_save_incomplete_draft_rejected() {
        let (admin, store, id) = setup().await;
        let mut draft = vase_draft();
        draft.margin_percent = None;

        let result = admin
            .save(
                PricingTarget::product(id),
                SaveRequest {
                    config: draft,
                    apply_to_product: true,
                },
            )
            .await;
        match result {
            Err(IdeiaError::Pricing(PricingError::MissingFields(fields))) => {
                assert_eq!(fields, vec![PriceField::MarginPercent]);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
        assert!(store.get_snapshot(&PricingTarget::product(id)).await.is_none());
        assert_eq!(store.get_product(&id).await.unwrap().base_price, dec!(49.90));
    }

    #[tokio::test]
    async fn test_variant_cannot_apply_to_product() {
        let (admin, _, id) = setup().await;
        let result = admin
            .save(
                PricingTarget::variant(id, Uuid::now_v7()),
                SaveRequest {
                    config: vase_draft(),
                    apply_to_product: true,
                },
            )
            .await;
        assert!(matches!(result, Err(IdeiaError::Validation(_))));
    }

    #[tokio::test]
    async fn test_variant_config_is_separate() {
        let (admin, _, id) = setup().await;
        let variant = PricingTarget::variant(id, Uuid::now_v7());
        admin
            .save(
                variant,
                SaveRequest {
                    config: vase_draft(),
                    apply_to_product: false,
                },
            )
            .await
            .unwrap();

        assert!(admin.load(variant).await.unwrap().config.is_some());
        assert!(admin.load(PricingTarget::product(id)).await.unwrap().config.is_none());
    }

    #[tokio::test]
    async fn test_defaults_roundtrip() {
        let (admin, _, id) = setup().await;
        assert_eq!(admin.defaults().await, StoredDefaults::fallback());

        let update = DefaultsUpdate {
            margin_percent: Some(dec!(30)),
            packaging: Some(dec!(3)),
            ..DefaultsUpdate::default()
        };
        let saved = admin.update_defaults(update).await.unwrap();
        assert_eq!(saved.margin_percent, dec!(30));
        assert_eq!(saved.tax_percent, dec!(8));
        assert_eq!(admin.defaults().await, saved);

        let view = admin.load(PricingTarget::product(id)).await.unwrap();
        assert_eq!(view.draft.margin_percent, Some(dec!(30)));
        assert_eq!(view.draft.packaging, Some(dec!(3)));
    }

    #[test]
    fn test_save_request_from_json() {
        let request: SaveRequest = serde_json::from_value(serde_json::json!({
            "config": { "consumoGramas": "120", "descontoPercent": "" },
            "applyToProduct": true,
            "newBasePrice": 99.0
        }))
        .unwrap();
        assert!(request.apply_to_product);
        assert_eq!(request.config.grams_consumed, Some(dec!(120)));
        assert_eq!(request.config.discount_percent, None);
    }
}
