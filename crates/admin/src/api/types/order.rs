//! Order records and the order list filter.

use orderdesk_core::{CustomerId, OrderId, OrderItemId, OrderStatus, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::string_or_number;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub created_by: Option<UserId>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Order {
    /// Customer name when the backend supplied one, otherwise `Customer #id`.
    #[must_use]
    pub fn customer_label(&self) -> String {
        self.customer_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| format!("Customer #{}", self.customer_id), str::to_owned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl OrderItem {
    /// Product name when the backend supplied one, otherwise `Product #id`.
    #[must_use]
    pub fn product_label(&self) -> String {
        self.product_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| format!("Product #{}", self.product_id), str::to_owned)
    }
}

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOrderRequest {
    pub payment_method: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Result of `POST /orders/{id}/pay`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    #[serde(default, deserialize_with = "string_or_number")]
    pub payment_id: String,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub completed_orders: u64,
    #[serde(default)]
    pub cancelled_orders: u64,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
}

/// Filters for `GET /orders`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<CustomerId>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderFilter {
    /// Query pairs in backend order; absent and zero values are left out.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(customer_id) = self.customer_id.filter(|id| id.as_i64() != 0) {
            pairs.push(("customerId", customer_id.to_string()));
        }
        if let Some(offset) = self.offset.filter(|offset| *offset != 0) {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit.filter(|limit| *limit != 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_query() {
        assert!(OrderFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn test_filter_omits_zero_values() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Paid),
            customer_id: Some(CustomerId::new(0)),
            offset: Some(0),
            limit: Some(20),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("status", "paid".to_string()), ("limit", "20".to_string())]
        );
    }

    #[test]
    fn test_filter_full() {
        let filter = OrderFilter {
            status: None,
            customer_id: Some(CustomerId::new(9)),
            offset: Some(40),
            limit: Some(20),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("customerId", "9".to_string()),
                ("offset", "40".to_string()),
                ("limit", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_decodes_and_labels_customer() {
        let order: Order = serde_json::from_str(
            r#"{"id": 1, "customerId": 4, "createdBy": 2, "status": "created", "totalAmount": 30,
                "items": [{"id": 1, "productId": 5, "quantity": 3, "unitPrice": 10, "subtotal": 30}],
                "createdAt": "2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.customer_label(), "Customer #4");
    }

    #[test]
    fn test_payment_info_accepts_numeric_id() {
        let info: PaymentInfo = serde_json::from_str(
            r#"{"paymentId": 12, "orderId": 1, "status": "success", "message": "ok"}"#,
        )
        .unwrap();
        assert_eq!(info.payment_id, "12");
    }
}
