//! Order administration handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use super::{envelope, json_body, parse_id, AppState, ApiResult};
use crate::services::OrderQuery;

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let query = OrderQuery::from_params(&params)?;
    let page = state.orders.list(&query).await;

    if params.get("format").map(|f| f.trim()) == Some("csv") {
        let headers = [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"pedidos.csv\""),
        ];
        return Ok((headers, page.to_csv()).into_response());
    }

    Ok(envelope(&page)?.into_response())
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, "order")?;
    let order = state.orders.get(&id).await?;
    Ok(Json(json!({ "ok": true, "order": order })))
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusUpdate {
    #[serde(default)]
    status: String,
}

pub(super) async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, "order")?;
    let update = json_body(body)?;
    let order = state.orders.update_status(&id, &update.status).await?;
    Ok(Json(json!({ "ok": true, "order": order })))
}
