//! Order Types - checkout input, placed orders and their lifecycle status

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CheckoutError, OrderError};
use crate::types::cart::CartItem;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    PendingPayment,
    Paid,
    InProduction,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::PendingPayment,
        OrderStatus::Paid,
        OrderStatus::InProduction,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::InProduction => "IN_PRODUCTION",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Label shown in the back-office
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::PendingPayment => "Aguard. pagamento",
            OrderStatus::Paid => "Pago",
            OrderStatus::InProduction => "Em produção",
            OrderStatus::Shipped => "Enviado",
            OrderStatus::Completed => "Entregue",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    pub fn joined_names() -> String {
        Self::ALL
            .iter()
            .map(OrderStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| OrderError::InvalidStatus {
                value: trimmed.to_string(),
            })
    }
}

/// Customer checkout submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    /// Postal code (CEP)
    pub cep: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Subtotal as computed by the shopper's cart
    pub subtotal: Option<Decimal>,
}

/// Shipping destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub zip: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// One order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl TryFrom<&CartItem> for OrderItem {
    type Error = CheckoutError;

    fn try_from(item: &CartItem) -> Result<Self, Self::Error> {
        let total = item
            .line_total()
            .ok_or_else(|| CheckoutError::AmountOutOfRange {
                product_id: item.id.to_string(),
            })?;
        Ok(Self {
            product_id: item.id,
            name: Some(item.name.clone()),
            quantity: item.qty,
            unit_price: item.price,
            total,
        })
    }
}

/// Placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping: ShippingAddress,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Human-friendly order code: creation date plus the id tail
    pub fn number_for(id: &Uuid, created_at: &DateTime<Utc>) -> String {
        let simple = id.simple().to_string().to_uppercase();
        let tail = &simple[simple.len() - 6..];
        format!("{}-{}", created_at.format("%Y%m%d"), tail)
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            order_number: self.order_number.clone(),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            total: self.total,
            status: self.status,
            status_label: self.status.label().to_string(),
            created_at: self.created_at,
        }
    }
}

/// Order list projection used by the back-office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub status_label: String,
    pub created_at: DateTime<Utc>,
}

/// Filter applied when listing orders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Case-insensitive search over order number, customer name and e-mail
    pub search: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(from) = self.created_from {
            if order.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_to {
            if order.created_at > to {
                return false;
            }
        }
        if let Some(ref q) = self.search {
            let needle = q.to_lowercase();
            let hit = [
                &order.order_number,
                &order.customer_name,
                &order.customer_email,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}
