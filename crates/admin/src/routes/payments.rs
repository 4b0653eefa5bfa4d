//! Payment list and detail. Payments are read-only here; they are created by
//! paying an order.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{PaymentId, PaymentStatus};

use crate::{filters, middleware::RequireAuth, state::AppState};

use super::layout::{Page, Pager, money, page_from_query, render};
use super::orders::PaymentRowView;
use super::outcome::{PageResult, load, require};

#[derive(Debug, Default, Deserialize)]
pub struct PaymentsQuery {
    pub status: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct PaymentStatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Payment totals, pre-formatted.
#[derive(Debug, Clone)]
pub struct PaymentStatsView {
    pub total_payments: u64,
    pub successful_payments: u64,
    pub failed_payments: u64,
    pub total_amount: String,
    pub success_amount: String,
}

#[derive(Template)]
#[template(path = "payments/index.html")]
pub struct PaymentsIndexTemplate {
    pub page: Page,
    pub payments: Vec<PaymentRowView>,
    pub stats: Option<PaymentStatsView>,
    pub status_options: Vec<PaymentStatusOption>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "payments/show.html")]
pub struct PaymentShowTemplate {
    pub page: Page,
    pub payment: PaymentRowView,
    pub created_by: String,
}

/// Payments, filterable by outcome, with totals.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<PaymentsQuery>,
) -> PageResult {
    let config = state.config();
    let currency = config.currency;
    let page = page_from_query(query.offset, query.limit, config.page_size);
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<PaymentStatus>().ok());

    let payments = load(&ctx, ctx.api.list_payments(page, status).await)
        .await?
        .unwrap_or_default();
    let stats = load(&ctx, ctx.api.payment_stats().await).await?;

    let template = PaymentsIndexTemplate {
        pager: Pager::new(
            page,
            payments.len(),
            "/payments",
            &[(
                "status",
                status.map(|s| s.as_str().to_string()).unwrap_or_default(),
            )],
        ),
        payments: payments
            .iter()
            .map(|p| PaymentRowView::new(p, currency))
            .collect(),
        stats: stats.map(|s| PaymentStatsView {
            total_payments: s.total_payments,
            successful_payments: s.successful_payments,
            failed_payments: s.failed_payments,
            total_amount: money(s.total_amount, currency),
            success_amount: money(s.success_amount, currency),
        }),
        status_options: PaymentStatus::ALL
            .into_iter()
            .map(|s| PaymentStatusOption {
                value: s.as_str(),
                label: s.label(),
                selected: status == Some(s),
            })
            .collect(),
        page: Page::new(&ctx, "/payments", "Payments").await,
    };
    Ok(render(&template).into_response())
}

#[instrument(skip(ctx, state))]
pub async fn show(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> PageResult {
    let payment = require(&ctx, ctx.api.get_payment(id).await, "/payments").await?;
    let template = PaymentShowTemplate {
        page: Page::new(&ctx, "/payments", &format!("Payment #{id}")).await,
        created_by: payment
            .created_by
            .map(|user| format!("User #{user}"))
            .unwrap_or_default(),
        payment: PaymentRowView::new(&payment, state.config().currency),
    };
    Ok(render(&template).into_response())
}
