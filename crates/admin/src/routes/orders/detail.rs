//! Order detail page and direct status changes.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{OrderId, OrderStatus};

use crate::{filters, middleware::RequireAuth, notify, state::AppState};

use super::super::layout::{Page, render};
use super::super::outcome::{PageResult, after_mutation, load, require};
use super::types::{OrderDetailView, PaymentRowView, StatusOption};

#[derive(Template)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub page: Page,
    pub order: OrderDetailView,
    pub payments: Vec<PaymentRowView>,
    pub status_options: Vec<StatusOption>,
}

#[derive(Debug, Deserialize)]
pub struct StatusFormInput {
    #[serde(default)]
    pub status: String,
}

/// Order detail with its payments and the suggested lifecycle actions.
#[instrument(skip(ctx, state))]
pub async fn show(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> PageResult {
    let currency = state.config().currency;
    let order = require(&ctx, ctx.api.get_order(id).await, "/orders").await?;
    let payments = load(&ctx, ctx.api.payments_for_order(id).await)
        .await?
        .unwrap_or_default();

    let template = OrderShowTemplate {
        page: Page::new(&ctx, &format!("/orders/{id}"), &format!("Order #{id}")).await,
        status_options: StatusOption::all(Some(order.status)),
        order: OrderDetailView::new(&order, currency),
        payments: payments
            .iter()
            .map(|payment| PaymentRowView::new(payment, currency))
            .collect(),
    };
    Ok(render(&template).into_response())
}

/// Set the status directly. The backend decides whether the change is allowed.
#[instrument(skip(ctx, input))]
pub async fn update_status(
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<OrderId>,
    Form(input): Form<StatusFormInput>,
) -> PageResult {
    let back = format!("/orders/{id}");
    let Ok(status) = input.status.parse::<OrderStatus>() else {
        notify::error(&ctx.session, "Invalid status", "Choose a status from the list.").await;
        return Ok(Redirect::to(&back).into_response());
    };

    let result = ctx.api.update_order_status(id, status).await;
    if result.is_ok() {
        tracing::info!(order_id = %id, status = %status, "Order status updated");
    }
    Ok(after_mutation(
        &ctx,
        result,
        ("Status updated", &format!("Order marked as {}.", status.label())),
        &back,
        &back,
    )
    .await)
}
