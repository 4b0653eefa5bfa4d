//! View models for order pages.

use orderdesk_core::{CurrencyCode, OrderAction, OrderStatus};
use serde::Deserialize;

use crate::api::{Order, OrderItem, Payment};

use super::super::layout::money;

/// Payment methods offered when paying an order.
pub const PAYMENT_METHODS: [(&str, &str); 5] = [
    ("credit_card", "Credit Card"),
    ("debit_card", "Debit Card"),
    ("bank_transfer", "Bank Transfer"),
    ("paypal", "PayPal"),
    ("cash", "Cash"),
];

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

/// `<option>` in a status filter or status picker.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl StatusOption {
    #[must_use]
    pub fn all(selected: Option<OrderStatus>) -> Vec<Self> {
        OrderStatus::ALL
            .into_iter()
            .map(|status| Self {
                value: status.as_str(),
                label: status.label(),
                selected: selected == Some(status),
            })
            .collect()
    }
}

/// Order row in lists.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub customer: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub total: String,
    pub item_count: usize,
    pub created_at: String,
}

impl OrderRowView {
    #[must_use]
    pub fn new(order: &Order, currency: CurrencyCode) -> Self {
        Self {
            id: order.id.to_string(),
            customer: order.customer_label(),
            status_label: order.status.label(),
            status_class: order.status.badge_class(),
            total: money(order.total_amount, currency),
            item_count: order.items.len(),
            created_at: order.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product: String,
    pub quantity: i64,
    pub unit_price: String,
    pub subtotal: String,
}

impl OrderItemView {
    fn new(item: &OrderItem, currency: CurrencyCode) -> Self {
        Self {
            product: item.product_label(),
            quantity: item.quantity,
            unit_price: money(item.unit_price, currency),
            subtotal: money(item.subtotal, currency),
        }
    }
}

/// Button leading to an action's confirmation page.
#[derive(Debug, Clone)]
pub struct ActionView {
    pub href: String,
    pub label: &'static str,
    pub class: &'static str,
}

impl ActionView {
    #[must_use]
    pub fn new(order_id: &str, action: OrderAction) -> Self {
        Self {
            href: format!("/orders/{order_id}/{}", action.path_segment()),
            label: action.button_label(),
            class: if action.is_destructive() {
                "btn btn-danger"
            } else {
                "btn btn-primary"
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub customer: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub total: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub items: Vec<OrderItemView>,
    /// Suggested next steps for the current status.
    pub actions: Vec<ActionView>,
}

impl OrderDetailView {
    #[must_use]
    pub fn new(order: &Order, currency: CurrencyCode) -> Self {
        let id = order.id.to_string();
        let actions = order
            .status
            .available_actions()
            .iter()
            .map(|action| ActionView::new(&id, *action))
            .collect();

        Self {
            customer: order.customer_label(),
            customer_id: order.customer_id.to_string(),
            status: order.status,
            status_label: order.status.label(),
            status_class: order.status.badge_class(),
            total: money(order.total_amount, currency),
            created_at: order.created_at.clone(),
            updated_at: order.updated_at.clone(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView::new(item, currency))
                .collect(),
            actions,
            id,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Payment row, shared with the payment list.
#[derive(Debug, Clone)]
pub struct PaymentRowView {
    pub id: String,
    pub order_id: String,
    pub amount: String,
    pub method: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub created_at: String,
}

impl PaymentRowView {
    #[must_use]
    pub fn new(payment: &Payment, currency: CurrencyCode) -> Self {
        Self {
            id: payment.id.to_string(),
            order_id: payment.order_id.to_string(),
            amount: money(payment.amount, currency),
            method: payment_method_label(&payment.payment_method),
            status_label: payment.status.label(),
            status_class: payment.status.badge_class(),
            created_at: payment.created_at.clone(),
        }
    }
}

/// Human label for a payment method code.
#[must_use]
pub fn payment_method_label(code: &str) -> String {
    PAYMENT_METHODS
        .iter()
        .find(|(value, _)| *value == code)
        .map_or_else(|| code.replace('_', " "), |(_, label)| (*label).to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use orderdesk_core::{CustomerId, OrderId};
    use rust_decimal::Decimal;

    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(12),
            customer_id: CustomerId::new(4),
            customer_name: Some("Ana Diaz".to_string()),
            created_by: None,
            status,
            total_amount: Decimal::new(4500, 2),
            items: Vec::new(),
            created_at: String::new(),
            updated_at: None,
        }
    }

    #[test]
    fn test_detail_actions_follow_status() {
        let view = OrderDetailView::new(&order(OrderStatus::Paid), CurrencyCode::USD);
        let hrefs: Vec<&str> = view.actions.iter().map(|a| a.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/orders/12/ship", "/orders/12/cancel"]);
        assert_eq!(view.actions[1].class, "btn btn-danger");
        assert_eq!(view.total, "$45.00");

        let done = OrderDetailView::new(&order(OrderStatus::Completed), CurrencyCode::USD);
        assert!(done.actions.is_empty());
        assert!(done.is_terminal());
    }

    #[test]
    fn test_payment_method_label() {
        assert_eq!(payment_method_label("credit_card"), "Credit Card");
        assert_eq!(payment_method_label("gift_card"), "gift card");
    }

    #[test]
    fn test_status_options() {
        let options = StatusOption::all(Some(OrderStatus::Shipping));
        assert_eq!(options.len(), 6);
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }
}
