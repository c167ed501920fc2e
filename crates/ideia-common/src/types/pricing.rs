//! Pricing Types - manufacturing cost inputs and the derived price breakdown
//!
//! Wire names follow the keys stored with each product's price configuration
//! (`consumoGramas`, `custoPorKg`, ...). Money, quantities and percentages are
//! all [`Decimal`]; percentages use the 0-100 scale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::PricingError;

/// One field of the pricing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    GramsConsumed,
    CostPerKg,
    PrintHours,
    MachineHourlyCost,
    KwhPerHour,
    TariffPerKwh,
    PostProcessHours,
    PostProcessHourlyCost,
    PostProcessSupplies,
    FailurePercent,
    Packaging,
    TaxPercent,
    MarginPercent,
    DiscountPercent,
}

impl PriceField {
    /// Fields that must be set before a price may be computed or shown
    pub const REQUIRED: [PriceField; 13] = [
        PriceField::GramsConsumed,
        PriceField::CostPerKg,
        PriceField::PrintHours,
        PriceField::MachineHourlyCost,
        PriceField::KwhPerHour,
        PriceField::TariffPerKwh,
        PriceField::PostProcessHours,
        PriceField::PostProcessHourlyCost,
        PriceField::PostProcessSupplies,
        PriceField::FailurePercent,
        PriceField::Packaging,
        PriceField::TaxPercent,
        PriceField::MarginPercent,
    ];

    /// Stored/wire key of the field
    pub fn key(&self) -> &'static str {
        match self {
            PriceField::GramsConsumed => "consumoGramas",
            PriceField::CostPerKg => "custoPorKg",
            PriceField::PrintHours => "tempoImpressaoHoras",
            PriceField::MachineHourlyCost => "custoHoraMaquina",
            PriceField::KwhPerHour => "consumoKwhHora",
            PriceField::TariffPerKwh => "tarifaKwh",
            PriceField::PostProcessHours => "tempoPosProcessoHoras",
            PriceField::PostProcessHourlyCost => "custoHoraPos",
            PriceField::PostProcessSupplies => "insumosPos",
            PriceField::FailurePercent => "taxaFalhaPercent",
            PriceField::Packaging => "embalagem",
            PriceField::TaxPercent => "impostosPercent",
            PriceField::MarginPercent => "margemLucroPercent",
            PriceField::DiscountPercent => "descontoPercent",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for PriceField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Complete manufacturing/cost parameters for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConfigInput {
    /// Material mass consumed by the print (g)
    #[serde(rename = "consumoGramas")]
    pub grams_consumed: Decimal,
    /// Material cost per kilogram
    #[serde(rename = "custoPorKg")]
    pub cost_per_kg: Decimal,
    /// Print duration (h)
    #[serde(rename = "tempoImpressaoHoras")]
    pub print_hours: Decimal,
    /// Machine amortization rate per hour
    #[serde(rename = "custoHoraMaquina")]
    pub machine_hourly_cost: Decimal,
    /// Machine power draw (kWh/h)
    #[serde(rename = "consumoKwhHora")]
    pub kwh_per_hour: Decimal,
    /// Electricity tariff per kWh
    #[serde(rename = "tarifaKwh")]
    pub tariff_per_kwh: Decimal,
    /// Post-processing labor time (h)
    #[serde(rename = "tempoPosProcessoHoras")]
    pub post_process_hours: Decimal,
    /// Post-processing labor rate per hour
    #[serde(rename = "custoHoraPos")]
    pub post_process_hourly_cost: Decimal,
    /// Flat post-processing consumables cost
    #[serde(rename = "insumosPos")]
    pub post_process_supplies: Decimal,
    /// Expected print-failure loading (%)
    #[serde(rename = "taxaFalhaPercent")]
    pub failure_percent: Decimal,
    /// Flat packaging cost
    #[serde(rename = "embalagem")]
    pub packaging: Decimal,
    /// Tax loading (%)
    #[serde(rename = "impostosPercent")]
    pub tax_percent: Decimal,
    /// Profit margin loading (%)
    #[serde(rename = "margemLucroPercent")]
    pub margin_percent: Decimal,
    /// Final discount (%); absent means no discount
    #[serde(
        rename = "descontoPercent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percent: Option<Decimal>,
}

impl PriceConfigInput {
    /// Discount with the unset case substituted by zero
    pub fn discount_or_zero(&self) -> Decimal {
        self.discount_percent.unwrap_or(Decimal::ZERO)
    }
}

/// Partially filled pricing configuration
///
/// Every field is optional so that "unset" and "zero" stay distinguishable
/// while form input or stored layers are merged. `null`, a missing key and a
/// blank string all deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceConfigDraft {
    #[serde(rename = "consumoGramas", default, deserialize_with = "blank_as_none")]
    pub grams_consumed: Option<Decimal>,
    #[serde(rename = "custoPorKg", default, deserialize_with = "blank_as_none")]
    pub cost_per_kg: Option<Decimal>,
    #[serde(rename = "tempoImpressaoHoras", default, deserialize_with = "blank_as_none")]
    pub print_hours: Option<Decimal>,
    #[serde(rename = "custoHoraMaquina", default, deserialize_with = "blank_as_none")]
    pub machine_hourly_cost: Option<Decimal>,
    #[serde(rename = "consumoKwhHora", default, deserialize_with = "blank_as_none")]
    pub kwh_per_hour: Option<Decimal>,
    #[serde(rename = "tarifaKwh", default, deserialize_with = "blank_as_none")]
    pub tariff_per_kwh: Option<Decimal>,
    #[serde(rename = "tempoPosProcessoHoras", default, deserialize_with = "blank_as_none")]
    pub post_process_hours: Option<Decimal>,
    #[serde(rename = "custoHoraPos", default, deserialize_with = "blank_as_none")]
    pub post_process_hourly_cost: Option<Decimal>,
    #[serde(rename = "insumosPos", default, deserialize_with = "blank_as_none")]
    pub post_process_supplies: Option<Decimal>,
    #[serde(rename = "taxaFalhaPercent", default, deserialize_with = "blank_as_none")]
    pub failure_percent: Option<Decimal>,
    #[serde(rename = "embalagem", default, deserialize_with = "blank_as_none")]
    pub packaging: Option<Decimal>,
    #[serde(rename = "impostosPercent", default, deserialize_with = "blank_as_none")]
    pub tax_percent: Option<Decimal>,
    #[serde(rename = "margemLucroPercent", default, deserialize_with = "blank_as_none")]
    pub margin_percent: Option<Decimal>,
    #[serde(rename = "descontoPercent", default, deserialize_with = "blank_as_none")]
    pub discount_percent: Option<Decimal>,
}

impl PriceConfigDraft {
    /// Value of a single field
    pub fn get(&self, field: PriceField) -> Option<Decimal> {
        match field {
            PriceField::GramsConsumed => self.grams_consumed,
            PriceField::CostPerKg => self.cost_per_kg,
            PriceField::PrintHours => self.print_hours,
            PriceField::MachineHourlyCost => self.machine_hourly_cost,
            PriceField::KwhPerHour => self.kwh_per_hour,
            PriceField::TariffPerKwh => self.tariff_per_kwh,
            PriceField::PostProcessHours => self.post_process_hours,
            PriceField::PostProcessHourlyCost => self.post_process_hourly_cost,
            PriceField::PostProcessSupplies => self.post_process_supplies,
            PriceField::FailurePercent => self.failure_percent,
            PriceField::Packaging => self.packaging,
            PriceField::TaxPercent => self.tax_percent,
            PriceField::MarginPercent => self.margin_percent,
            PriceField::DiscountPercent => self.discount_percent,
        }
    }

    /// Layer `upper` on top of `self`; fields set in `upper` win
    pub fn overlay(self, upper: &PriceConfigDraft) -> PriceConfigDraft {
        PriceConfigDraft {
            grams_consumed: upper.grams_consumed.or(self.grams_consumed),
            cost_per_kg: upper.cost_per_kg.or(self.cost_per_kg),
            print_hours: upper.print_hours.or(self.print_hours),
            machine_hourly_cost: upper.machine_hourly_cost.or(self.machine_hourly_cost),
            kwh_per_hour: upper.kwh_per_hour.or(self.kwh_per_hour),
            tariff_per_kwh: upper.tariff_per_kwh.or(self.tariff_per_kwh),
            post_process_hours: upper.post_process_hours.or(self.post_process_hours),
            post_process_hourly_cost: upper
                .post_process_hourly_cost
                .or(self.post_process_hourly_cost),
            post_process_supplies: upper.post_process_supplies.or(self.post_process_supplies),
            failure_percent: upper.failure_percent.or(self.failure_percent),
            packaging: upper.packaging.or(self.packaging),
            tax_percent: upper.tax_percent.or(self.tax_percent),
            margin_percent: upper.margin_percent.or(self.margin_percent),
            discount_percent: upper.discount_percent.or(self.discount_percent),
        }
    }

    /// Required fields that are still unset, in declaration order
    pub fn missing_fields(&self) -> Vec<PriceField> {
        PriceField::REQUIRED
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl TryFrom<PriceConfigDraft> for PriceConfigInput {
    type Error = PricingError;

    fn try_from(draft: PriceConfigDraft) -> Result<Self, Self::Error> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(PricingError::MissingFields(missing));
        }

        // All required fields were checked above
        Ok(Self {
            grams_consumed: draft.grams_consumed.unwrap_or_default(),
            cost_per_kg: draft.cost_per_kg.unwrap_or_default(),
            print_hours: draft.print_hours.unwrap_or_default(),
            machine_hourly_cost: draft.machine_hourly_cost.unwrap_or_default(),
            kwh_per_hour: draft.kwh_per_hour.unwrap_or_default(),
            tariff_per_kwh: draft.tariff_per_kwh.unwrap_or_default(),
            post_process_hours: draft.post_process_hours.unwrap_or_default(),
            post_process_hourly_cost: draft.post_process_hourly_cost.unwrap_or_default(),
            post_process_supplies: draft.post_process_supplies.unwrap_or_default(),
            failure_percent: draft.failure_percent.unwrap_or_default(),
            packaging: draft.packaging.unwrap_or_default(),
            tax_percent: draft.tax_percent.unwrap_or_default(),
            margin_percent: draft.margin_percent.unwrap_or_default(),
            discount_percent: draft.discount_percent,
        })
    }
}

impl From<&PriceConfigInput> for PriceConfigDraft {
    fn from(cfg: &PriceConfigInput) -> Self {
        Self {
            grams_consumed: Some(cfg.grams_consumed),
            cost_per_kg: Some(cfg.cost_per_kg),
            print_hours: Some(cfg.print_hours),
            machine_hourly_cost: Some(cfg.machine_hourly_cost),
            kwh_per_hour: Some(cfg.kwh_per_hour),
            tariff_per_kwh: Some(cfg.tariff_per_kwh),
            post_process_hours: Some(cfg.post_process_hours),
            post_process_hourly_cost: Some(cfg.post_process_hourly_cost),
            post_process_supplies: Some(cfg.post_process_supplies),
            failure_percent: Some(cfg.failure_percent),
            packaging: Some(cfg.packaging),
            tax_percent: Some(cfg.tax_percent),
            margin_percent: Some(cfg.margin_percent),
            discount_percent: cfg.discount_percent,
        }
    }
}

/// Store-wide fallback values for new product configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDefaults {
    #[serde(rename = "margemLucroPercent")]
    pub margin_percent: Decimal,
    #[serde(rename = "impostosPercent")]
    pub tax_percent: Decimal,
    #[serde(rename = "taxaFalhaPercent")]
    pub failure_percent: Decimal,
    #[serde(rename = "embalagem")]
    pub packaging: Decimal,
}

impl StoredDefaults {
    /// Built-in values used when the store never saved its own defaults
    pub fn fallback() -> Self {
        Self {
            margin_percent: dec!(50),
            tax_percent: dec!(8),
            failure_percent: dec!(10),
            packaging: dec!(1),
        }
    }
}

impl From<&StoredDefaults> for PriceConfigDraft {
    fn from(defaults: &StoredDefaults) -> Self {
        Self {
            margin_percent: Some(defaults.margin_percent),
            tax_percent: Some(defaults.tax_percent),
            failure_percent: Some(defaults.failure_percent),
            packaging: Some(defaults.packaging),
            ..Self::default()
        }
    }
}

/// Itemized result of one pricing computation
///
/// Every field is rounded independently to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub material_cost: Decimal,
    pub machine_cost: Decimal,
    pub energy_cost: Decimal,
    pub post_process_cost: Decimal,
    /// Material + machine + energy + post-processing
    pub base_cost: Decimal,
    pub failure_cost: Decimal,
    pub unit_cost: Decimal,
    pub gross_price: Decimal,
    pub price_with_tax: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

impl PriceBreakdown {
    /// All monetary fields, in pipeline order
    pub fn fields(&self) -> [(&'static str, Decimal); 11] {
        [
            ("materialCost", self.material_cost),
            ("machineCost", self.machine_cost),
            ("energyCost", self.energy_cost),
            ("postProcessCost", self.post_process_cost),
            ("baseCost", self.base_cost),
            ("failureCost", self.failure_cost),
            ("unitCost", self.unit_cost),
            ("grossPrice", self.gross_price),
            ("priceWithTax", self.price_with_tax),
            ("discountAmount", self.discount_amount),
            ("finalPrice", self.final_price),
        ]
    }
}

/// Accepts a number, a numeric string, a blank string or null
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(Decimal),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(Raw::Number(n)) => Ok(Some(n)),
    }
}
