//! iDeia & Art API Gateway
//!
//! Serves the storefront and back-office API:
//! - Catalog: public product listing and detail
//! - Checkout: cart to `PENDING` order
//! - Pricing: cost-based price editor and store defaults
//! - Orders: listing, CSV export and status changes

use axum::http::{header::HeaderName, Method};
use ideia_common::{ADMIN_KEY_HEADER, VERSION};
use ideia_storefront::{
    router, seed_demo_data, AppState, InMemoryStore, SharedStore, StorefrontConfig,
    LOG_DIRECTIVE,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

// ============ MAIN ============

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_gateway=info".parse()?)
                .add_directive(LOG_DIRECTIVE.parse()?),
        )
        .json()
        .init();

    let config = StorefrontConfig::load()?;
    if config.admin_key.is_none() {
        warn!("No admin key configured; back-office routes will reject every request");
    }

    let store: SharedStore = Arc::new(InMemoryStore::new());

    // Seed demo data on startup
    if config.seed_demo {
        seed_demo_data(&store).await?;
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(ADMIN_KEY_HEADER),
        ]);

    let state = AppState::new(store, config.admin_key.clone());
    let app = router(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr = config.bind_addr();
    info!(version = VERSION, "iDeia & Art API Gateway starting on {}", addr);
    info!("Endpoints: /health, /api/produtos, /api/checkout, /api/admin/*");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
