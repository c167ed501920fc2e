//! Storefront services
//!
//! Each service owns a handle to the shared store and carries the business
//! rules for one area of the shop.

pub mod checkout;
pub mod orders;
pub mod pricing;

pub use checkout::{Checkout, CheckoutReceipt};
pub use orders::{OrderAdmin, OrderPage, OrderQuery, Pagination};
pub use pricing::{PricingAdmin, PricingView, SaveOutcome, SaveRequest};
