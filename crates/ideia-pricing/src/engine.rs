//! Cost-based pricing engine
//!
//! Turns raw manufacturing inputs into an itemized sale price. The pipeline
//! runs on full-precision decimals and rounds each returned field once, at the
//! end, to [`PRICE_SCALE`] places (half away from zero).

use ideia_common::{
    PriceBreakdown, PriceConfigDraft, PriceConfigInput, PriceField, PricingError, Result,
    PRICE_SCALE,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

/// Pure pricing engine: `PriceConfigInput -> PriceBreakdown`
///
/// Stateless and `Copy`; share one instance or build one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    /// Decimal places of every returned field
    scale: u32,
}

/// Outcome of a guarded preview
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Every required field was present
    Ready(PriceBreakdown),
    /// Required fields still unset; nothing was computed
    Incomplete(Vec<PriceField>),
}

impl PricingEngine {
    pub fn new() -> Self {
        Self { scale: PRICE_SCALE }
    }

    /// Compute the price breakdown for a complete configuration
    ///
    /// Total over its domain: arithmetic saturates at the decimal limits
    /// instead of panicking, and negative inputs are priced as given.
    #[instrument(level = "debug", skip_all)]
    pub fn compute(&self, cfg: &PriceConfigInput) -> PriceBreakdown {
        let hundred = dec!(100);

        // 1. Percentages to fractional rates
        let failure_rate = cfg.failure_percent / hundred;
        let margin_rate = cfg.margin_percent / hundred;
        let tax_rate = cfg.tax_percent / hundred;
        let discount_rate = cfg.discount_or_zero() / hundred;

        // 2-5. Cost terms
        let material_cost = (cfg.grams_consumed / dec!(1000)).saturating_mul(cfg.cost_per_kg);
        let machine_cost = cfg.print_hours.saturating_mul(cfg.machine_hourly_cost);
        let energy_cost = cfg
            .print_hours
            .saturating_mul(cfg.kwh_per_hour)
            .saturating_mul(cfg.tariff_per_kwh);
        let post_process_cost = cfg
            .post_process_hours
            .saturating_mul(cfg.post_process_hourly_cost)
            .saturating_add(cfg.post_process_supplies);

        // 6. Subtotal before failure loading and packaging
        let base_cost = material_cost
            .saturating_add(machine_cost)
            .saturating_add(energy_cost)
            .saturating_add(post_process_cost);

        // 7-8. Failure loading applies to the base only; packaging is added after
        let failure_cost = base_cost.saturating_mul(failure_rate);
        let unit_cost = base_cost
            .saturating_add(failure_cost)
            .saturating_add(cfg.packaging);

        // 9-12. Margin, then tax on the margin-inclusive price, then discount
        let gross_price = unit_cost.saturating_mul(Decimal::ONE.saturating_add(margin_rate));
        let price_with_tax = gross_price.saturating_mul(Decimal::ONE.saturating_add(tax_rate));
        let discount_amount = price_with_tax.saturating_mul(discount_rate);
        let final_price = price_with_tax.saturating_sub(discount_amount);

        let breakdown = PriceBreakdown {
            material_cost: self.round(material_cost),
            machine_cost: self.round(machine_cost),
            energy_cost: self.round(energy_cost),
            post_process_cost: self.round(post_process_cost),
            base_cost: self.round(base_cost),
            failure_cost: self.round(failure_cost),
            unit_cost: self.round(unit_cost),
            gross_price: self.round(gross_price),
            price_with_tax: self.round(price_with_tax),
            discount_amount: self.round(discount_amount),
            final_price: self.round(final_price),
        };

        debug!(
            unit_cost = %breakdown.unit_cost,
            final_price = %breakdown.final_price,
            "Computed price breakdown"
        );
        breakdown
    }

    /// Compute from partial input, refusing when required fields are unset
    pub fn compute_draft(&self, draft: &PriceConfigDraft) -> Result<PriceBreakdown> {
        let cfg = PriceConfigInput::try_from(draft.clone())?;
        Ok(self.compute(&cfg))
    }

    /// Guarded preview for interactive editing
    #[instrument(level = "debug", skip_all)]
    pub fn preview(&self, draft: &PriceConfigDraft) -> Preview {
        match PriceConfigInput::try_from(draft.clone()) {
            Ok(cfg) => Preview::Ready(self.compute(&cfg)),
            Err(PricingError::MissingFields(missing)) => {
                debug!(missing = missing.len(), "Preview needs more input");
                Preview::Incomplete(missing)
            }
        }
    }

    fn round(&self, value: Decimal) -> Decimal {
        let mut rounded =
            value.round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.scale);
        rounded
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideia_common::IdeiaError;

    /// Configuration of the parametric vase from the demo catalog
    fn vase_config() -> PriceConfigInput {
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

    #[test]
    fn test_vase_breakdown() {
        let b = PricingEngine::new().compute(&vase_config());

        assert_eq!(b.material_cost, dec!(9.60));
        assert_eq!(b.machine_cost, dec!(18.00));
        // 0.675 rounds half away from zero
        assert_eq!(b.energy_cost, dec!(0.68));
        assert_eq!(b.post_process_cost, dec!(6.00));
        // 34.275
        assert_eq!(b.base_cost, dec!(34.28));
        // 3.4275
        assert_eq!(b.failure_cost, dec!(3.43));
        // 41.7025, from unrounded terms
        assert_eq!(b.unit_cost, dec!(41.70));
        // 58.3835
        assert_eq!(b.gross_price, dec!(58.38));
        // 63.05418
        assert_eq!(b.price_with_tax, dec!(63.05));
        assert_eq!(b.discount_amount, dec!(0.00));
        assert_eq!(b.final_price, dec!(63.05));
    }

    #[test]
    fn test_every_field_has_two_decimals() {
        let b = PricingEngine::new().compute(&vase_config());
        for (name, value) in b.fields() {
            assert_eq!(value.scale(), 2, "{name} = {value}");
            assert_eq!(value, value.round_dp(2), "{name} = {value}");
        }
    }

    #[test]
    fn test_zero_costs_price_to_zero() {
        let cfg = PriceConfigInput {
            grams_consumed: dec!(0),
            print_hours: dec!(0),
            post_process_hours: dec!(0),
            post_process_supplies: dec!(0),
            packaging: dec!(0),
            failure_percent: dec!(35),
            margin_percent: dec!(300),
            tax_percent: dec!(18),
            ..vase_config()
        };
        let b = PricingEngine::new().compute(&cfg);
        assert_eq!(b.final_price, Decimal::ZERO);
        assert_eq!(b.unit_cost, Decimal::ZERO);
    }

    #[test]
    fn test_omitted_discount_equals_zero_discount() {
        let engine = PricingEngine::new();
        let explicit = engine.compute(&vase_config());
        let omitted = engine.compute(&PriceConfigInput {
            discount_percent: None,
            ..vase_config()
        });
        assert_eq!(explicit, omitted);
    }

    #[test]
    fn test_discount_applies_last() {
        let b = PricingEngine::new().compute(&PriceConfigInput {
            discount_percent: Some(dec!(10)),
            ..vase_config()
        });
        // 63.05418 * 0.10
        assert_eq!(b.discount_amount, dec!(6.31));
        // 63.05418 - 6.305418 = 56.748762
        assert_eq!(b.final_price, dec!(56.75));
        assert_eq!(b.price_with_tax, dec!(63.05));
    }

    #[test]
    fn test_packaging_not_loaded_by_failure_rate() {
        let engine = PricingEngine::new();
        let without = engine.compute(&PriceConfigInput {
            packaging: dec!(0),
            ..vase_config()
        });
        let with = engine.compute(&vase_config());
        assert_eq!(without.failure_cost, with.failure_cost);
        assert_eq!(with.unit_cost - without.unit_cost, dec!(4.00));
    }

    #[test]
    fn test_ordering_and_tax_on_margin() {
        let b = PricingEngine::new().compute(&vase_config());
        let packaging = vase_config().packaging;

        let summed = b.material_cost
            + b.machine_cost
            + b.energy_cost
            + b.post_process_cost
            + b.failure_cost
            + packaging;
        assert!((summed - b.unit_cost).abs() <= dec!(0.01));

        let expected = b.unit_cost * dec!(1.40) * dec!(1.08);
        assert!((expected - b.price_with_tax).abs() <= dec!(0.01));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 0.125 would become 0.12 under banker's rounding
        let b = PricingEngine::new().compute(&PriceConfigInput {
            grams_consumed: dec!(1),
            cost_per_kg: dec!(125),
            ..vase_config()
        });
        assert_eq!(b.material_cost, dec!(0.13));
    }

    #[test]
    fn test_idempotent() {
        let engine = PricingEngine::new();
        let cfg = vase_config();
        assert_eq!(engine.compute(&cfg), engine.compute(&cfg));
    }

    #[test]
    fn test_negative_inputs_are_priced_as_given() {
        let b = PricingEngine::new().compute(&PriceConfigInput {
            grams_consumed: dec!(-1000),
            ..vase_config()
        });
        assert_eq!(b.material_cost, dec!(-80.00));
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        let huge = Decimal::MAX;
        let cfg = PriceConfigInput {
            grams_consumed: huge,
            cost_per_kg: huge,
            print_hours: huge,
            machine_hourly_cost: huge,
            kwh_per_hour: huge,
            tariff_per_kwh: huge,
            failure_percent: huge,
            margin_percent: huge,
            tax_percent: huge,
            ..vase_config()
        };
        let b = PricingEngine::new().compute(&cfg);
        assert!(b.final_price > Decimal::ZERO);
    }

    #[test]
    fn test_compute_draft_requires_fields() {
        let engine = PricingEngine::new();
        let mut draft = PriceConfigDraft::from(&vase_config());
        assert_eq!(engine.compute_draft(&draft).unwrap().final_price, dec!(63.05));

        draft.tariff_per_kwh = None;
        match engine.compute_draft(&draft) {
            Err(IdeiaError::Pricing(PricingError::MissingFields(fields))) => {
                assert_eq!(fields, vec![PriceField::TariffPerKwh]);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_guard() {
        let engine = PricingEngine::new();
        assert_eq!(
            engine.preview(&PriceConfigDraft::default()),
            Preview::Incomplete(PriceField::REQUIRED.to_vec())
        );

        let ready = engine.preview(&PriceConfigDraft::from(&vase_config()));
        assert!(matches!(ready, Preview::Ready(b) if b.final_price == dec!(63.05)));
    }
}
