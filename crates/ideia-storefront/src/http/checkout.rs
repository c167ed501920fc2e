//! Checkout handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use ideia_common::CheckoutRequest;
use serde_json::Value;

use super::{envelope, json_body, AppState, ApiResult};

pub(super) async fn place_order(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = json_body(body)?;
    let receipt = state.checkout.place_order(request).await?;
    envelope(&receipt)
}
