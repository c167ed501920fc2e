//! Catalog handlers

use axum::extract::{Path, State};
use axum::Json;
use ideia_common::IdeiaError;
use serde_json::{json, Value};

use super::{AppState, ApiResult};
use crate::store::CatalogStore;

/// Public product listing
pub(super) async fn list_products(State(state): State<AppState>) -> Json<Value> {
    let products = state.store.list_products().await;
    let categories = state.store.list_categories().await;
    Json(json!({ "ok": true, "products": products, "categories": categories }))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    let product = state
        .store
        .get_product_by_slug(&slug)
        .await
        .ok_or_else(|| IdeiaError::NotFound(format!("product {}", slug)))?;
    Ok(Json(json!({ "ok": true, "product": product })))
}

/// Back-office product listing, with each product's current pricing status
pub(super) async fn admin_list_products(State(state): State<AppState>) -> Json<Value> {
    let mut rows = Vec::new();
    for product in state.store.list_products().await {
        let priced = state
            .pricing
            .has_saved_config(&product.id)
            .await;
        rows.push(json!({ "product": product, "priced": priced }));
    }
    Json(json!({ "ok": true, "products": rows }))
}
