//! Purchase order document.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "orders";

/// A single line item within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ObjectId,
    pub quantity: u32,
    /// Unit price at order time
    pub price: f64,
}

/// Purchase order document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    /// placed / shipped / delivered / cancelled
    pub status: String,
    pub created_at: DateTime,
}

impl Order {
    /// Place an order; the total is derived from the priced line items.
    pub fn create(user_id: ObjectId, items: Vec<OrderItem>) -> Self {
        let total_amount = items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum();
        Self {
            id: ObjectId::new(),
            user_id,
            items,
            total_amount,
            status: "placed".to_string(),
            created_at: DateTime::now(),
        }
    }
}

/// Order line-item response.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub price: f64,
}

/// Order response.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: f64,
    pub status: String,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_hex(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_hex(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at.to_chrono().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_total_sums_priced_items() {
        let order = Order::create(
            ObjectId::new(),
            vec![
                OrderItem {
                    product_id: ObjectId::new(),
                    quantity: 2,
                    price: 499.0,
                },
                OrderItem {
                    product_id: ObjectId::new(),
                    quantity: 1,
                    price: 1250.0,
                },
            ],
        );
        assert_eq!(order.total_amount, 2248.0);
        assert_eq!(order.status, "placed");
    }
}
