//! Pricing administration handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use ideia_common::{IdeiaError, PriceConfigDraft};
use ideia_pricing::{DefaultsUpdate, PricingTarget, Preview};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{envelope, json_body, parse_id, AppState, ApiError, ApiResult};
use crate::services::SaveRequest;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TargetParams {
    variant_id: Option<String>,
}

impl TargetParams {
    fn target(&self, product_id: &str) -> ApiResult<PricingTarget> {
        let product_id = parse_id(product_id, "product")?;
        match self.variant_id.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(PricingTarget::product(product_id)),
            Some(raw) => {
                let variant_id = uuid::Uuid::parse_str(raw).map_err(|_| {
                    ApiError(IdeiaError::Validation(format!("invalid variantId '{}'", raw)))
                })?;
                Ok(PricingTarget::variant(product_id, variant_id))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PreviewRequest {
    #[serde(default)]
    config: PriceConfigDraft,
}

pub(super) async fn load(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<TargetParams>,
) -> ApiResult<Json<Value>> {
    let view = state.pricing.load(params.target(&id)?).await?;
    envelope(&view)
}

pub(super) async fn save(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<TargetParams>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let target = params.target(&id)?;
    let request = json_body(body)?;
    let outcome = state.pricing.save(target, request).await?;
    envelope(&outcome)
}

/// Guarded preview: a breakdown only once every required field is set
pub(super) async fn preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PreviewRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let target = PricingTarget::product(parse_id(&id, "product")?);
    state.pricing.ensure_product(&target).await?;
    let request = json_body(body)?;

    let reply = match state.pricing.preview(&request.config) {
        Preview::Ready(breakdown) => json!({ "ok": true, "ready": true, "breakdown": breakdown }),
        Preview::Incomplete(missing) => {
            json!({ "ok": true, "ready": false, "missingFields": missing })
        }
    };
    Ok(Json(reply))
}

pub(super) async fn get_defaults(State(state): State<AppState>) -> Json<Value> {
    let defaults = state.pricing.defaults().await;
    Json(json!({ "ok": true, "defaults": defaults }))
}

pub(super) async fn update_defaults(
    State(state): State<AppState>,
    body: Result<Json<DefaultsUpdate>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let update = json_body(body)?;
    let defaults = state.pricing.update_defaults(update).await?;
    Ok(Json(json!({ "ok": true, "defaults": defaults })))
}
