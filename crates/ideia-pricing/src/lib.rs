//! # iDeia & Art Pricing
//!
//! Manufacturing-cost pricing for 3D-printed goods.
//!
//! ## Pricing Formula
//!
//! ```text
//! base      = material + machine + energy + post-processing
//! unit      = base × (1 + failure) + packaging
//! final     = unit × (1 + margin) × (1 + tax) × (1 − discount)
//! ```
//!
//! Where:
//! - material: grams / 1000 × cost per kg
//! - machine: print hours × machine hourly rate
//! - energy: print hours × kWh per hour × tariff
//! - post-processing: hours × labor rate + consumables
//!
//! Percentages are on the 0-100 scale. Every field of the returned
//! [`PriceBreakdown`](ideia_common::PriceBreakdown) is rounded once to two places.

pub mod defaults;
pub mod engine;
pub mod snapshot;

pub use defaults::{effective_defaults, form_fallback, resolve, DefaultsUpdate};
pub use engine::{Preview, PricingEngine};
pub use snapshot::{PriceSnapshot, PricingTarget};
