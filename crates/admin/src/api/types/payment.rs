//! Payment records.

use orderdesk_core::{OrderId, PaymentId, PaymentStatus, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    #[serde(default)]
    pub created_by: Option<UserId>,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    #[serde(default)]
    pub total_payments: u64,
    #[serde(default)]
    pub successful_payments: u64,
    #[serde(default)]
    pub failed_payments: u64,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub success_amount: Decimal,
}
