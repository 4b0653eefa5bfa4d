//! `od-cli orders ...`
//!
//! Transitions are sent as requested. The backend decides whether they are
//! allowed and the CLI reports its answer.

use orderdesk_admin::api::{OrderFilter, TransitionOutcome};
use orderdesk_core::{OrderAction, OrderId, OrderStatus};

use super::{CliError, Context};

/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn list(context: &Context, status: Option<OrderStatus>) -> Result<(), CliError> {
    let filter = OrderFilter {
        status,
        ..OrderFilter::default()
    };
    let orders = context.api.list_orders(&filter).await?;
    if orders.is_empty() {
        tracing::info!("No orders found");
        return Ok(());
    }

    for order in &orders {
        tracing::info!(
            "#{:<6} {:<10} {:>12}  {}  {}",
            order.id,
            order.status.label(),
            context.money(order.total_amount),
            order.customer_label(),
            order.created_at
        );
    }
    tracing::info!("{} order(s)", orders.len());
    Ok(())
}

/// # Errors
///
/// Returns an error if the order does not exist or the call fails.
pub async fn show(context: &Context, id: OrderId) -> Result<(), CliError> {
    let order = context.api.get_order(id).await?;
    tracing::info!("Order #{} ({})", order.id, order.status.label());
    tracing::info!("  Customer: {}", order.customer_label());
    tracing::info!("  Created:  {}", order.created_at);
    for item in &order.items {
        tracing::info!(
            "  {:>3} x {:<30} {:>12}",
            item.quantity,
            item.product_label(),
            context.money(item.subtotal)
        );
    }
    tracing::info!("  Total:    {}", context.money(order.total_amount));

    let actions = order.status.available_actions();
    if !actions.is_empty() {
        let names: Vec<&str> = actions.iter().map(|a| a.path_segment()).collect();
        tracing::info!("  Next:     {}", names.join(", "));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the backend refuses the transition.
pub async fn transition(
    context: &Context,
    id: OrderId,
    action: OrderAction,
    payment_method: Option<&str>,
) -> Result<(), CliError> {
    let outcome = context
        .api
        .transition_order(id, action, payment_method)
        .await?;

    match &outcome {
        TransitionOutcome::Payment(info) => tracing::info!(
            order_id = %id,
            payment_id = %info.payment_id,
            "{}",
            success_text(action, outcome.message())
        ),
        TransitionOutcome::Message(_) => {
            tracing::info!(order_id = %id, "{}", success_text(action, outcome.message()));
        }
    }
    Ok(())
}

/// Backend message when it sent one, otherwise the action's own wording.
fn success_text(action: OrderAction, backend: &str) -> String {
    let backend = backend.trim();
    if backend.is_empty() {
        action.success_message().to_string()
    } else {
        backend.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_text_prefers_backend_message() {
        assert_eq!(success_text(OrderAction::Ship, "Order 4 shipped"), "Order 4 shipped");
        assert_eq!(
            success_text(OrderAction::Ship, "  "),
            OrderAction::Ship.success_message()
        );
    }
}
