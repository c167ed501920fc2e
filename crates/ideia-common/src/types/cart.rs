//! Shopping cart
//!
//! The cart lives in the shopper's browser under [`CART_STORAGE_KEY`]; this
//! module holds its state transitions and the JSON shape it is stored in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Browser storage key of the persisted cart
pub const CART_STORAGE_KEY: &str = "ideiaart_cart_v1";

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Unit price captured when the item was added
    pub price: Decimal,
    pub qty: u32,
}

impl CartItem {
    /// Price of the whole line, `None` when it exceeds the decimal range
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.qty))
    }
}

/// Cart state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a cart from its stored JSON; malformed data yields an empty cart
    pub fn from_storage_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn to_storage_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"items":[]}"#.to_string())
    }

    /// Add `qty` units, merging with an existing line for the same product
    pub fn add_item(&mut self, mut item: CartItem, qty: u32) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.qty = existing.qty.saturating_add(qty);
            return;
        }
        item.qty = qty;
        self.items.push(item);
    }

    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.id != product_id);
    }

    /// Set the quantity of a line; zero removes it
    pub fn update_qty(&mut self, product_id: Uuid, qty: u32) {
        if qty == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.id == product_id) {
            item.qty = qty;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of the line totals, `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
    }

    /// Total number of units
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.qty))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(price: Decimal) -> CartItem {
        CartItem {
            id: Uuid::now_v7(),
            name: "Vase".to_string(),
            slug: "vaso-parametrico".to_string(),
            image: None,
            price,
            qty: 0,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        let vase = item(dec!(49.90));

        cart.add_item(vase.clone(), 1);
        cart.add_item(vase.clone(), 2);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].qty, 3);
        assert_eq!(cart.subtotal(), Some(dec!(149.70)));
    }

    #[test]
    fn test_update_qty_zero_removes() {
        let mut cart = Cart::new();
        let vase = item(dec!(49.90));
        let clips = item(dec!(19.90));
        cart.add_item(vase.clone(), 1);
        cart.add_item(clips.clone(), 4);

        cart.update_qty(clips.id, 2);
        assert_eq!(cart.item_count(), 3);

        cart.update_qty(vase.id, 0);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal(), Some(dec!(39.80)));

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_storage_round_trip() {
        let mut cart = Cart::new();
        cart.add_item(item(dec!(39.90)), 2);

        let restored = Cart::from_storage_json(&cart.to_storage_json());
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_quantities_saturate() {
        let mut cart = Cart::new();
        let vase = item(dec!(49.90));
        cart.add_item(vase.clone(), u32::MAX - 1);
        cart.add_item(vase, 5);
        cart.add_item(item(dec!(19.90)), 3);

        assert_eq!(cart.items[0].qty, u32::MAX);
        assert_eq!(cart.item_count(), u32::MAX);
    }

    #[test]
    fn test_subtotal_out_of_range() {
        let mut cart = Cart::new();
        cart.add_item(item(Decimal::MAX), 2);
        assert_eq!(cart.items[0].line_total(), None);
        assert_eq!(cart.subtotal(), None);

        let mut cart = Cart::new();
        cart.add_item(item(Decimal::MAX), 1);
        cart.add_item(item(dec!(1)), 1);
        assert_eq!(cart.subtotal(), None);
    }

    #[test]
    fn test_malformed_storage_is_empty_cart() {
        assert!(Cart::from_storage_json("not json").is_empty());
        assert!(Cart::from_storage_json(r#"{"items": 3}"#).is_empty());
    }
}
