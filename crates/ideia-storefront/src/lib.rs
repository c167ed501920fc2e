//! # iDeia & Art Storefront
//!
//! Catalog, checkout and back-office services for a small 3D-printing shop,
//! exposed as an axum router.
//!
//! ## Modules
//!
//! - [`store`]: storage traits and the in-memory backend
//! - [`services`]: pricing administration, checkout and order administration
//! - [`http`]: JSON API, admin key guard and error mapping
//! - [`seed`]: demo catalog
//! - [`config`]: environment configuration

pub mod config;
pub mod http;
pub mod seed;
pub mod services;
pub mod store;

pub use config::StorefrontConfig;
pub use http::{router, AppState};
pub use seed::seed_demo_data;
pub use store::{InMemoryStore, SharedStore, StoreError, StorefrontStore};

/// Default tracing directive of the storefront crate
pub const LOG_DIRECTIVE: &str = "ideia_storefront=info";
