//! Lifecycle transitions: confirm, pay, ship, complete, cancel.
//!
//! Each action has a GET confirmation page and a POST that performs it. The
//! backend owns the state machine, so any action can be requested from any
//! status and a refusal comes back as a toast.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{OrderAction, OrderId};

use crate::{
    api::DEFAULT_PAYMENT_METHOD, filters, middleware::RequireAuth, notify, state::AppState,
};

use super::super::layout::{Page, render};
use super::super::not_found::not_found_response;
use super::super::outcome::{PageResult, require};
use super::types::{OrderDetailView, PAYMENT_METHODS};

#[derive(Debug, Clone)]
pub struct PaymentMethodOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "orders/confirm.html")]
pub struct OrderActionTemplate {
    pub page: Page,
    pub order: OrderDetailView,
    pub prompt: &'static str,
    pub button_label: &'static str,
    pub button_class: &'static str,
    pub form_action: String,
    /// Only offered for pay.
    pub payment_methods: Vec<PaymentMethodOption>,
}

#[derive(Debug, Deserialize)]
pub struct ActionFormInput {
    pub payment_method: Option<String>,
}

fn payment_method_options() -> Vec<PaymentMethodOption> {
    PAYMENT_METHODS
        .iter()
        .map(|(value, label)| PaymentMethodOption {
            value,
            label,
            selected: *value == DEFAULT_PAYMENT_METHOD,
        })
        .collect()
}

/// Confirmation page for an action.
#[instrument(skip(ctx, state))]
pub async fn confirm_page(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Path((id, action)): Path<(OrderId, String)>,
) -> PageResult {
    let Ok(action) = action.parse::<OrderAction>() else {
        return Err(not_found_response(&ctx).await);
    };
    let order = require(&ctx, ctx.api.get_order(id).await, "/orders").await?;
    let view = OrderDetailView::new(&order, state.config().currency);

    let template = OrderActionTemplate {
        page: Page::new(
            &ctx,
            &format!("/orders/{id}"),
            &format!("{} \u{2014} Order #{id}", action.button_label()),
        )
        .await,
        order: view,
        prompt: action.confirmation_prompt(),
        button_label: action.button_label(),
        button_class: if action.is_destructive() {
            "btn btn-danger"
        } else {
            "btn btn-primary"
        },
        form_action: format!("/orders/{id}/{}", action.path_segment()),
        payment_methods: if action == OrderAction::Pay {
            payment_method_options()
        } else {
            Vec::new()
        },
    };
    Ok(render(&template).into_response())
}

/// Perform an action and return to the order.
#[instrument(skip(ctx, input))]
pub async fn perform(
    RequireAuth(ctx): RequireAuth,
    Path((id, action)): Path<(OrderId, String)>,
    Form(input): Form<ActionFormInput>,
) -> PageResult {
    let Ok(action) = action.parse::<OrderAction>() else {
        return Err(not_found_response(&ctx).await);
    };
    let back = format!("/orders/{id}");
    let payment_method = input
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    match ctx.api.transition_order(id, action, payment_method).await {
        Ok(outcome) => {
            tracing::info!(
                order_id = %id,
                action = %action,
                backend_message = outcome.message(),
                "Order transition applied"
            );
            notify::success(&ctx.session, "Order updated", action.success_message()).await;
            Ok(Redirect::to(&back).into_response())
        }
        Err(err) => {
            tracing::warn!(order_id = %id, action = %action, error = %err, "Order transition refused");
            Ok(notify::surface_api_error(&ctx.session, &err)
                .await
                .unwrap_or_else(|| Redirect::to(&back).into_response()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_options_default_to_card() {
        let options = payment_method_options();
        assert_eq!(options.len(), PAYMENT_METHODS.len());
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec![DEFAULT_PAYMENT_METHOD]);
    }
}
