//! HTTP surface
//!
//! JSON API for the storefront and its back-office. Successful replies carry
//! `"ok": true`, errors `{ "ok": false, "message": ... }`. Everything under
//! `/api/admin` requires the admin key header.

mod auth;
mod catalog;
mod checkout;
mod error;
mod orders;
mod pricing;

pub use error::{ApiError, ApiResult};

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post, put};
use axum::{middleware, Json, Router};
use ideia_common::{IdeiaError, VERSION};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::services::{Checkout, OrderAdmin, PricingAdmin};
use crate::store::SharedStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub pricing: PricingAdmin,
    pub checkout: Checkout,
    pub orders: OrderAdmin,
    admin_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: SharedStore, admin_key: Option<String>) -> Self {
        Self {
            pricing: PricingAdmin::new(store.clone()),
            checkout: Checkout::new(store.clone()),
            orders: OrderAdmin::new(store.clone()),
            store,
            admin_key: admin_key.map(Arc::from),
        }
    }

    pub(crate) fn admin_key(&self) -> Option<&str> {
        self.admin_key.as_deref()
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/produtos", get(catalog::admin_list_products))
        .route("/produtos/:id/preco", get(pricing::load).put(pricing::save))
        .route("/produtos/:id/preco/preview", post(pricing::preview))
        .route(
            "/precos/defaults",
            get(pricing::get_defaults).put(pricing::update_defaults),
        )
        .route("/pedidos", get(orders::list))
        .route("/pedidos/:id", get(orders::get))
        .route("/pedidos/:id/status", put(orders::update_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_key,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/produtos", get(catalog::list_products))
        .route("/api/produtos/:slug", get(catalog::get_product))
        .route("/api/checkout", post(checkout::place_order))
        .nest("/api/admin", admin)
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": VERSION,
    }))
}

/// Serialize `payload` and mark it successful
fn envelope<T: Serialize>(payload: &T) -> ApiResult<Json<Value>> {
    match serde_json::to_value(payload)? {
        Value::Object(mut map) => {
            map.insert("ok".to_string(), Value::Bool(true));
            Ok(Json(Value::Object(map)))
        }
        other => Ok(Json(json!({ "ok": true, "data": other }))),
    }
}

/// Unwrap a JSON body, reporting malformed input in the error envelope
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError(IdeiaError::Validation(rejection.body_text())))
}

/// Parse a path id; ids that cannot exist are reported as not found
fn parse_id(raw: &str, kind: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError(IdeiaError::NotFound(format!("{} {}", kind, raw))))
}
