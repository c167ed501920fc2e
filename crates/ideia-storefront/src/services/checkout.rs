//! Checkout
//!
//! Turns a submitted cart into a `PENDING` order. Shipping is not computed
//! yet, so every order carries a zero shipping cost.

use chrono::Utc;
use ideia_common::{
    CheckoutError, CheckoutRequest, Order, OrderItem, OrderStatus, Result, ShippingAddress,
    PRICE_SCALE,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::store::{OrderStore, SharedStore};

/// Customer-facing confirmation message
pub const ORDER_CREATED_MESSAGE: &str = "Pedido criado com sucesso. Vamos processar o pagamento.";

/// Reply to a successful checkout
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub order_number: String,
    pub message: String,
}

/// Checkout service
#[derive(Clone)]
pub struct Checkout {
    store: SharedStore,
}

impl Checkout {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Validate the cart and create the order
    #[instrument(skip_all, fields(items = request.items.len()))]
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<CheckoutReceipt> {
        validate(&request)?;

        let items = request
            .items
            .iter()
            .map(OrderItem::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let subtotal = items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total))
            .map(round_money)
            .ok_or_else(|| out_of_range(&items))?;

        if let Some(claimed) = request.subtotal {
            if round_money(claimed) != subtotal {
                warn!(%claimed, computed = %subtotal, "Client subtotal differs from cart contents");
            }
        }

        let shipping_cost = Decimal::ZERO;
        let total = subtotal
            .checked_add(shipping_cost)
            .ok_or_else(|| out_of_range(&items))?;
        let id = Uuid::now_v7();
        let created_at = Utc::now();
        let order = Order {
            id,
            order_number: Order::number_for(&id, &created_at),
            customer_name: request.name.trim().to_string(),
            customer_email: request.email.trim().to_string(),
            customer_phone: non_blank(request.phone),
            shipping: ShippingAddress {
                zip: non_blank(request.cep),
                street: non_blank(request.street),
                number: non_blank(request.number),
                city: non_blank(request.city),
                state: non_blank(request.state),
            },
            subtotal,
            shipping_cost,
            total,
            status: OrderStatus::Pending,
            items,
            created_at,
        };

        let order_number = order.order_number.clone();
        self.store.insert_order(order).await?;
        info!(%id, %order_number, total = %subtotal, "Order placed");

        Ok(CheckoutReceipt {
            order_id: id,
            order_number,
            message: ORDER_CREATED_MESSAGE.to_string(),
        })
    }
}

fn validate(request: &CheckoutRequest) -> std::result::Result<(), CheckoutError> {
    if request.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(CheckoutError::MissingCustomer);
    }
    if let Some(item) = request.items.iter().find(|i| i.qty == 0) {
        return Err(CheckoutError::InvalidQuantity {
            product_id: item.id.to_string(),
            qty: item.qty,
        });
    }
    Ok(())
}

fn out_of_range(items: &[OrderItem]) -> CheckoutError {
    CheckoutError::AmountOutOfRange {
        product_id: items
            .last()
            .map(|i| i.product_id.to_string())
            .unwrap_or_default(),
    }
}

fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
