//! Orders list page handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use orderdesk_core::{CustomerId, OrderStatus};

use crate::{
    api::OrderFilter,
    filters,
    middleware::RequireAuth,
    state::AppState,
};

use super::super::layout::{Page, Pager, page_from_query, render};
use super::super::outcome::{PageResult, load};
use super::types::{OrderRowView, OrdersQuery, StatusOption};

#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub page: Page,
    pub orders: Vec<OrderRowView>,
    pub status_options: Vec<StatusOption>,
    pub customer_id: String,
    pub pager: Pager,
}

/// Orders list, filterable by status and customer.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> PageResult {
    let config = state.config();
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<OrderStatus>().ok());
    let customer_id = query
        .customer_id
        .as_deref()
        .and_then(|s| s.trim().parse::<CustomerId>().ok());
    let page = page_from_query(query.offset, query.limit, config.page_size);

    let filter = OrderFilter {
        status,
        customer_id,
        offset: Some(page.offset),
        limit: Some(page.limit),
    };
    let orders = load(&ctx, ctx.api.list_orders(&filter).await)
        .await?
        .unwrap_or_default();

    let pager = Pager::new(
        page,
        orders.len(),
        "/orders",
        &[
            ("status", status.map(|s| s.as_str().to_string()).unwrap_or_default()),
            (
                "customerId",
                customer_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
        ],
    );

    let template = OrdersIndexTemplate {
        page: Page::new(&ctx, "/orders", "Orders").await,
        orders: orders
            .iter()
            .map(|order| OrderRowView::new(order, config.currency))
            .collect(),
        status_options: StatusOption::all(status),
        customer_id: customer_id.map(|id| id.to_string()).unwrap_or_default(),
        pager,
    };

    Ok(render(&template).into_response())
}
