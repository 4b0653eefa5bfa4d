//! Payment endpoints. Payments are created by paying an order.

use orderdesk_core::{OrderId, PaymentId, PaymentStatus};
use tracing::instrument;

use super::endpoints::payments;
use super::{ApiClient, ApiError, Page, Payment, PaymentStats};

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_payments(
        &self,
        page: Page,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>, ApiError> {
        let mut query = vec![
            ("offset", page.offset.to_string()),
            ("limit", page.limit.to_string()),
        ];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        self.get_with_query(payments::BASE, &query).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, ApiError> {
        self.get(&payments::by_id(id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn payments_for_order(&self, order_id: OrderId) -> Result<Vec<Payment>, ApiError> {
        self.get(&payments::by_order(order_id)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn payment_stats(&self) -> Result<PaymentStats, ApiError> {
        self.get(payments::STATS).await
    }
}
