//! Status and role enums for orders, payments, and users.
//!
//! The backend owns the order lifecycle. [`OrderStatus::available_actions`]
//! only tells the console which buttons to draw; it never blocks a request.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a status or role string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct StatusParseError {
    /// What was being parsed ("order status", "user role", ...).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl StatusParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Order lifecycle status.
///
/// ```text
/// draft → created → paid → shipping → completed
///   └───────┴────────┴──→ cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Draft,
    Created,
    Paid,
    Shipping,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order (used for filter dropdowns).
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::Created,
        Self::Paid,
        Self::Shipping,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Created => "created",
            Self::Paid => "paid",
            Self::Shipping => "shipping",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Created => "Created",
            Self::Paid => "Paid",
            Self::Shipping => "Shipping",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS class for the status badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Draft => "badge badge-gray",
            Self::Created => "badge badge-blue",
            Self::Paid => "badge badge-green",
            Self::Shipping => "badge badge-yellow",
            Self::Completed => "badge badge-purple",
            Self::Cancelled => "badge badge-red",
        }
    }

    /// Completed and cancelled orders accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Actions the console offers for an order in this status.
    #[must_use]
    pub const fn available_actions(self) -> &'static [OrderAction] {
        match self {
            Self::Draft => &[OrderAction::Confirm, OrderAction::Cancel],
            Self::Created => &[OrderAction::Pay, OrderAction::Cancel],
            Self::Paid => &[OrderAction::Ship, OrderAction::Cancel],
            Self::Shipping => &[OrderAction::Complete],
            Self::Completed | Self::Cancelled => &[],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatusParseError::new("order status", s))
    }
}

/// A transition request sent to `POST /orders/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Confirm,
    Pay,
    Ship,
    Complete,
    Cancel,
}

impl OrderAction {
    pub const ALL: [Self; 5] = [
        Self::Confirm,
        Self::Pay,
        Self::Ship,
        Self::Complete,
        Self::Cancel,
    ];

    /// Path segment of the transition endpoint.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Pay => "pay",
            Self::Ship => "ship",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }

    #[must_use]
    pub const fn button_label(self) -> &'static str {
        match self {
            Self::Confirm => "Confirm Order",
            Self::Pay => "Process Payment",
            Self::Ship => "Start Shipping",
            Self::Complete => "Mark Completed",
            Self::Cancel => "Cancel Order",
        }
    }

    /// Question asked before the form is submitted.
    #[must_use]
    pub const fn confirmation_prompt(self) -> &'static str {
        match self {
            Self::Confirm => "Confirm this order?",
            Self::Pay => "Process payment for this order?",
            Self::Ship => "Start shipping this order?",
            Self::Complete => "Mark this order as completed?",
            Self::Cancel => "Are you sure you want to cancel this order?",
        }
    }

    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Confirm => "Order confirmed successfully!",
            Self::Pay => "Payment processed successfully!",
            Self::Ship => "Order shipping started!",
            Self::Complete => "Order completed successfully!",
            Self::Cancel => "Order cancelled successfully!",
        }
    }

    /// Destructive actions get a red button.
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(self, Self::Cancel)
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl std::str::FromStr for OrderAction {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.path_segment().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatusParseError::new("order action", s))
    }
}

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Success,
    Failed,
}

impl PaymentStatus {
    pub const ALL: [Self; 2] = [Self::Success, Self::Failed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }

    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Success => "badge badge-green",
            Self::Failed => "badge badge-red",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatusParseError::new("payment status", s))
    }
}

/// Console user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including user management.
    Admin,
    /// Day-to-day order handling.
    #[default]
    User,
}

impl UserRole {
    pub const ALL: [Self; 2] = [Self::Admin, Self::User];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatusParseError::new("user role", s))
    }
}

/// Account status of a console user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Locked,
}

impl UserStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Locked];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Locked => "locked",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Locked => "Locked",
        }
    }

    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Active => "badge badge-green",
            Self::Locked => "badge badge-red",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatusParseError::new("user status", s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trips_wire_value() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_order_status_parse_rejects_unknown() {
        let err = "refunded".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: refunded");
    }

    #[test]
    fn test_available_actions_follow_lifecycle() {
        assert_eq!(
            OrderStatus::Draft.available_actions(),
            &[OrderAction::Confirm, OrderAction::Cancel]
        );
        assert_eq!(
            OrderStatus::Created.available_actions(),
            &[OrderAction::Pay, OrderAction::Cancel]
        );
        assert_eq!(
            OrderStatus::Paid.available_actions(),
            &[OrderAction::Ship, OrderAction::Cancel]
        );
        assert_eq!(
            OrderStatus::Shipping.available_actions(),
            &[OrderAction::Complete]
        );
    }

    #[test]
    fn test_terminal_statuses_offer_nothing() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(status.is_terminal());
            assert!(status.available_actions().is_empty());
        }
        assert!(!OrderStatus::Shipping.is_terminal());
    }

    #[test]
    fn test_order_action_segments() {
        assert_eq!(OrderAction::Confirm.path_segment(), "confirm");
        assert_eq!("PAY".parse::<OrderAction>().unwrap(), OrderAction::Pay);
        assert!("refund".parse::<OrderAction>().is_err());
        assert!(OrderAction::Cancel.is_destructive());
        assert!(!OrderAction::Ship.is_destructive());
    }

    #[test]
    fn test_roles_and_statuses() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("locked".parse::<UserStatus>().unwrap(), UserStatus::Locked);
        assert_eq!(
            "failed".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::Failed
        );
        assert!("root".parse::<UserRole>().is_err());
        assert_eq!(UserRole::default(), UserRole::User);
    }
}
