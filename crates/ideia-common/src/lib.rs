//! # iDeia & Art Common
//!
//! Shared types and errors for the iDeia & Art storefront and back-office.
//!
//! ## Core Types
//!
//! - [`PriceConfigInput`]/[`PriceBreakdown`]: manufacturing cost inputs and the itemized price
//! - [`PriceConfigDraft`]: partially filled pricing input, merged layer by layer
//! - [`StoredDefaults`]: store-wide pricing defaults
//! - [`Product`]/[`Category`]: catalog
//! - [`Cart`]: shopping cart state
//! - [`Order`]/[`OrderStatus`]: placed orders and their lifecycle

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{CheckoutError, IdeiaError, OrderError, PricingError, Result};
pub use types::{
    cart::{Cart, CartItem, CART_STORAGE_KEY},
    catalog::{Category, Product},
    order::{
        CheckoutRequest, Order, OrderFilter, OrderItem, OrderStatus, OrderSummary,
        ShippingAddress,
    },
    pricing::{PriceBreakdown, PriceConfigDraft, PriceConfigInput, PriceField, StoredDefaults},
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimal places of every monetary value shown or stored
pub const PRICE_SCALE: u32 = 2;

/// Header carrying the shared admin secret
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Default page size of back-office listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size of back-office listings
pub const MAX_PAGE_SIZE: u32 = 100;
