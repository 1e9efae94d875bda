//! Order Model
//!
//! Transient, caller-owned order data used only to render a receipt. Money
//! fields stay `f64` on the wire; the renderer does its arithmetic in
//! `Decimal`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::util::finite_or_zero;

/// One ordered line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    /// Unit price; absent means 0
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    /// Absent or zero means 1
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<u32>,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            quantity: Some(quantity),
        }
    }

    pub fn unit_price(&self) -> f64 {
        finite_or_zero(self.price)
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }
}

/// Order as submitted by the website or till
///
/// Accepts both snake_case and the website's camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    #[serde(default, alias = "orderId", deserialize_with = "string_or_number")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub table: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub subtotal: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tax: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: Option<f64>,
    #[serde(alias = "paymentMethod")]
    pub payment_method: Option<String>,
}

impl OrderData {
    pub fn subtotal(&self) -> f64 {
        finite_or_zero(self.subtotal)
    }

    pub fn tax(&self) -> f64 {
        finite_or_zero(self.tax)
    }

    pub fn total(&self) -> f64 {
        finite_or_zero(self.total)
    }
}

/// Order and table ids arrive as either JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Str(s)) if s.is_empty() => None,
        Some(Raw::Str(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(n)) => Some(n.to_string()),
    })
}

/// Money fields sometimes arrive as strings such as `"12.50"`
///
/// Unparseable strings count as absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Str(s)) => s.trim().parse().ok(),
    })
}

/// Quantities arrive as integers, whole floats like `2.0`, or strings
///
/// Zero, fractions and unparseable values count as absent.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Str(String),
    }

    fn whole(n: f64) -> Option<u32> {
        (n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Int(n)) => u32::try_from(n).ok().filter(|q| *q > 0),
        Some(Raw::Float(n)) => whole(n),
        Some(Raw::Str(s)) => s.trim().parse().ok().and_then(whole),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_defaults() {
        let item: OrderItem = serde_json::from_value(json!({"name": "Tea"})).unwrap();
        assert_eq!(item.unit_price(), 0.0);
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_order_accepts_camel_case() {
        let order: OrderData = serde_json::from_value(json!({
            "orderId": 42,
            "table": "5",
            "items": [{"name": "Milk Tea", "price": 18.5, "quantity": 2}],
            "subtotal": 37,
            "paymentMethod": "Octopus"
        }))
        .unwrap();
        assert_eq!(order.order_id.as_deref(), Some("42"));
        assert_eq!(order.table.as_deref(), Some("5"));
        assert_eq!(order.items[0].quantity(), 2);
        assert_eq!(order.subtotal(), 37.0);
        assert_eq!(order.tax(), 0.0);
        assert_eq!(order.payment_method.as_deref(), Some("Octopus"));
    }

    #[test]
    fn test_money_as_strings() {
        let order: OrderData = serde_json::from_value(json!({
            "items": [{"name": "Egg Tart", "price": "9.50"}],
            "total": " 9.5 ",
            "tax": "n/a"
        }))
        .unwrap();
        assert_eq!(order.items[0].unit_price(), 9.5);
        assert_eq!(order.total(), 9.5);
        assert_eq!(order.tax, None);
    }

    #[test]
    fn test_order_empty_ids_are_absent() {
        let order: OrderData = serde_json::from_value(json!({"order_id": "", "table": null})).unwrap();
        assert_eq!(order.order_id, None);
        assert_eq!(order.table, None);
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_quantity_lenient_forms() {
        let quantity = |raw: serde_json::Value| {
            serde_json::from_value::<OrderItem>(json!({"name": "Tea", "price": 10, "quantity": raw}))
                .unwrap()
                .quantity()
        };
        assert_eq!(quantity(json!("2")), 2);
        assert_eq!(quantity(json!(" 3 ")), 3);
        assert_eq!(quantity(json!(2.0)), 2);
        assert_eq!(quantity(json!("4.0")), 4);
        assert_eq!(quantity(json!(1.5)), 1);
        assert_eq!(quantity(json!(0)), 1);
        assert_eq!(quantity(json!(-2)), 1);
        assert_eq!(quantity(json!(null)), 1);
        assert_eq!(quantity(json!("two")), 1);
    }

    #[test]
    fn test_zero_quantity_counts_as_one() {
        assert_eq!(OrderItem::new("Tea", 10.0, 0).quantity(), 1);
    }

    #[test]
    fn test_null_items_is_empty() {
        let order: OrderData =
            serde_json::from_value(json!({"orderId": "7", "items": null, "total": 0})).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.order_id.as_deref(), Some("7"));
    }
}
