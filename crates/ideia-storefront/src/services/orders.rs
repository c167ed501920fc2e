//! Back-office order administration
//!
//! Listing with filters and pagination, CSV export of a listed page, order
//! detail and status changes.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use ideia_common::{
    IdeiaError, Order, OrderError, OrderFilter, OrderStatus, OrderSummary, Result,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::store::{OrderStore, SharedStore};

/// CSV header of an exported page
pub const CSV_HEADER: &str = "orderNumber;customerName;customerEmail;status;total;createdAt";

/// Parsed listing parameters
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    pub page: u32,
    pub per_page: u32,
    pub filter: OrderFilter,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            filter: OrderFilter::default(),
        }
    }
}

impl OrderQuery {
    /// Parse raw query-string parameters
    ///
    /// Unparseable paging values fall back to their defaults; an unknown
    /// status or malformed date is an error.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let value = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let page = value("page")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        let per_page = value("perPage")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let status = value("status")
            .map(|v| v.parse::<OrderStatus>())
            .transpose()?;
        let created_from = value("from")
            .map(|v| day_bound(v, NaiveTime::MIN))
            .transpose()?;
        let created_to = value("to")
            .map(|v| day_bound(v, end_of_day()))
            .transpose()?;

        Ok(Self {
            page,
            per_page,
            filter: OrderFilter {
                status,
                search: value("q").map(str::to_string),
                created_from,
                created_to,
            },
        })
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.per_page as usize)
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// `YYYY-MM-DD` at the given time of day, UTC
fn day_bound(raw: &str, time: NaiveTime) -> std::result::Result<DateTime<Utc>, OrderError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| OrderError::InvalidDate(raw.to_string()))?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Pagination block of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub pages: usize,
}

impl Pagination {
    fn new(query: &OrderQuery, total: usize) -> Self {
        let per_page = query.per_page.max(1) as usize;
        Self {
            page: query.page,
            per_page: query.per_page,
            total,
            pages: total.div_ceil(per_page),
        }
    }
}

/// One page of orders
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub rows: Vec<OrderSummary>,
    pub pagination: Pagination,
}

impl OrderPage {
    /// `;`-separated export of the rows on this page
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        let lines: Vec<String> = self
            .rows
            .iter()
            .map(|r| {
                [
                    csv_field(&r.order_number),
                    csv_field(&r.customer_name),
                    csv_field(&r.customer_email),
                    r.status.as_str().to_string(),
                    r.total.to_string(),
                    r.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                ]
                .join(";")
            })
            .collect();
        out.push_str(&lines.join("\n"));
        out
    }
}

/// Keep separators and line breaks in free text from splitting a record
fn csv_field(value: &str) -> String {
    value.replace([';', '\n', '\r'], " ")
}

/// Order administration service
#[derive(Clone)]
pub struct OrderAdmin {
    store: SharedStore,
}

impl OrderAdmin {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    #[instrument(skip(self), fields(page = query.page, per_page = query.per_page))]
    pub async fn list(&self, query: &OrderQuery) -> OrderPage {
        let (orders, total) = self
            .store
            .list_orders(&query.filter, query.offset(), query.per_page as usize)
            .await;
        debug!(total, returned = orders.len(), "Listed orders");

        OrderPage {
            rows: orders.iter().map(Order::summary).collect(),
            pagination: Pagination::new(query, total),
        }
    }

    pub async fn get(&self, id: &Uuid) -> Result<Order> {
        self.store
            .get_order(id)
            .await
            .ok_or_else(|| IdeiaError::NotFound(format!("order {}", id)))
    }

    /// Move an order to the status named by `raw`
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &Uuid, raw: &str) -> Result<Order> {
        let status: OrderStatus = raw.parse()?;
        let previous = self.store.update_order_status(id, status).await?;
        info!(%id, from = %previous, to = %status, "Order status changed");
        self.get(id).await
    }
}
