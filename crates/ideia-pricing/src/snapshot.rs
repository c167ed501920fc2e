//! Price snapshots
//!
//! A snapshot is the configuration saved for a product (or one of its
//! variants) together with the breakdown it produced at save time.

use chrono::{DateTime, Utc};
use ideia_common::{PriceBreakdown, PriceConfigInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::PricingEngine;

/// What a price configuration belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTarget {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
}

impl PricingTarget {
    pub fn product(product_id: Uuid) -> Self {
        Self {
            product_id,
            variant_id: None,
        }
    }

    pub fn variant(product_id: Uuid, variant_id: Uuid) -> Self {
        Self {
            product_id,
            variant_id: Some(variant_id),
        }
    }
}

/// Saved configuration plus the breakdown it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub target: PricingTarget,
    pub config: PriceConfigInput,
    pub breakdown: PriceBreakdown,
    pub computed_at: DateTime<Utc>,
}

impl PriceSnapshot {
    /// Price `config` now and record the result
    pub fn capture(engine: &PricingEngine, target: PricingTarget, config: PriceConfigInput) -> Self {
        let breakdown = engine.compute(&config);
        Self {
            target,
            config,
            breakdown,
            computed_at: Utc::now(),
        }
    }

    /// Whether the stored breakdown matches what `engine` computes today
    pub fn is_current(&self, engine: &PricingEngine) -> bool {
        engine.compute(&self.config) == self.breakdown
    }
}
