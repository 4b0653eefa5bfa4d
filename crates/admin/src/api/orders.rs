//! Order endpoints, including lifecycle transitions.
//!
//! The backend enforces the order state machine. These methods send whatever
//! transition they are asked for and report the backend's verdict.

use orderdesk_core::{OrderAction, OrderId, OrderStatus};
use tracing::instrument;

use super::endpoints::orders;
use super::{
    ApiClient, ApiError, CreateOrderRequest, MessageResponse, Order, OrderFilter, OrderStats,
    PayOrderRequest, PaymentInfo, UpdateOrderStatusRequest,
};

/// Payment method sent when none is chosen.
pub const DEFAULT_PAYMENT_METHOD: &str = "credit_card";

/// Outcome of a lifecycle transition.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// Confirm, ship, complete, or cancel.
    Message(MessageResponse),
    /// Pay returns payment details.
    Payment(PaymentInfo),
}

impl TransitionOutcome {
    /// Backend message, if any.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Message(response) => &response.message,
            Self::Payment(info) => &info.message,
        }
    }
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError> {
        let query = filter.query_pairs();
        if query.is_empty() {
            self.get(orders::BASE).await
        } else {
            self.get_with_query(orders::BASE, &query).await
        }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&orders::by_id(id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, lines = request.items.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.post(orders::BASE, request).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn order_stats(&self) -> Result<OrderStats, ApiError> {
        self.get(orders::STATS).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the transition.
    #[instrument(skip(self))]
    pub async fn confirm_order(&self, id: OrderId) -> Result<MessageResponse, ApiError> {
        self.simple_transition(id, OrderAction::Confirm).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the payment.
    #[instrument(skip(self))]
    pub async fn pay_order(
        &self,
        id: OrderId,
        payment_method: &str,
    ) -> Result<PaymentInfo, ApiError> {
        let body = PayOrderRequest {
            payment_method: payment_method.to_string(),
        };
        self.post(&orders::action(id, OrderAction::Pay), &body)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the transition.
    #[instrument(skip(self))]
    pub async fn ship_order(&self, id: OrderId) -> Result<MessageResponse, ApiError> {
        self.simple_transition(id, OrderAction::Ship).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the transition.
    #[instrument(skip(self))]
    pub async fn complete_order(&self, id: OrderId) -> Result<MessageResponse, ApiError> {
        self.simple_transition(id, OrderAction::Complete).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend refuses the transition.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<MessageResponse, ApiError> {
        self.simple_transition(id, OrderAction::Cancel).await
    }

    /// Dispatch any lifecycle action. `payment_method` is only used by pay.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the transition.
    pub async fn transition_order(
        &self,
        id: OrderId,
        action: OrderAction,
        payment_method: Option<&str>,
    ) -> Result<TransitionOutcome, ApiError> {
        match action {
            OrderAction::Pay => self
                .pay_order(id, payment_method.unwrap_or(DEFAULT_PAYMENT_METHOD))
                .await
                .map(TransitionOutcome::Payment),
            OrderAction::Confirm => self.confirm_order(id).await.map(TransitionOutcome::Message),
            OrderAction::Ship => self.ship_order(id).await.map(TransitionOutcome::Message),
            OrderAction::Complete => self.complete_order(id).await.map(TransitionOutcome::Message),
            OrderAction::Cancel => self.cancel_order(id).await.map(TransitionOutcome::Message),
        }
    }

    /// Set an order's status directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the change.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&orders::by_id(id), &UpdateOrderStatusRequest { status })
            .await
    }

    async fn simple_transition(
        &self,
        id: OrderId,
        action: OrderAction,
    ) -> Result<MessageResponse, ApiError> {
        self.post(&orders::action(id, action), &serde_json::json!({}))
            .await
    }
}
