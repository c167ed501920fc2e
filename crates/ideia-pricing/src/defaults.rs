//! Pricing input layering
//!
//! A product's editable configuration is resolved from three layers, lowest
//! priority first:
//!
//! ```text
//! built-in fallback -> stored defaults -> saved product config
//! ```
//!
//! Store defaults are passed in explicitly; nothing here reads shared state.

use ideia_common::{PriceConfigDraft, PriceConfigInput, StoredDefaults};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Built-in starting values of a fresh configuration form
pub fn form_fallback() -> PriceConfigDraft {
    PriceConfigDraft {
        grams_consumed: Some(dec!(0)),
        cost_per_kg: Some(dec!(80)),
        print_hours: Some(dec!(0)),
        machine_hourly_cost: Some(dec!(6)),
        kwh_per_hour: Some(dec!(0.25)),
        tariff_per_kwh: Some(dec!(0.9)),
        post_process_hours: Some(dec!(0.5)),
        post_process_hourly_cost: Some(dec!(1)),
        post_process_supplies: Some(dec!(1)),
        failure_percent: Some(dec!(10)),
        packaging: Some(dec!(1)),
        tax_percent: Some(dec!(8)),
        margin_percent: Some(dec!(50)),
        discount_percent: None,
    }
}

/// Store defaults, or the built-in ones when the store never saved any
pub fn effective_defaults(stored: Option<&StoredDefaults>) -> StoredDefaults {
    stored.cloned().unwrap_or_else(StoredDefaults::fallback)
}

/// Merge the three layers into the draft shown to the editor
pub fn resolve(
    stored: Option<&StoredDefaults>,
    saved: Option<&PriceConfigInput>,
) -> PriceConfigDraft {
    let defaults = PriceConfigDraft::from(&effective_defaults(stored));
    let draft = form_fallback().overlay(&defaults);
    match saved {
        Some(cfg) => draft.overlay(&PriceConfigDraft::from(cfg)),
        None => draft,
    }
}

/// Partial update of the store defaults
///
/// Unset fields take the built-in fallback, not the previously stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DefaultsUpdate {
    #[serde(rename = "margemLucroPercent", default)]
    pub margin_percent: Option<Decimal>,
    #[serde(rename = "impostosPercent", default)]
    pub tax_percent: Option<Decimal>,
    #[serde(rename = "taxaFalhaPercent", default)]
    pub failure_percent: Option<Decimal>,
    #[serde(rename = "embalagem", default)]
    pub packaging: Option<Decimal>,
}

impl DefaultsUpdate {
    pub fn into_defaults(self) -> StoredDefaults {
        let fallback = StoredDefaults::fallback();
        StoredDefaults {
            margin_percent: self.margin_percent.unwrap_or(fallback.margin_percent),
            tax_percent: self.tax_percent.unwrap_or(fallback.tax_percent),
            failure_percent: self.failure_percent.unwrap_or(fallback.failure_percent),
            packaging: self.packaging.unwrap_or(fallback.packaging),
        }
    }
}
