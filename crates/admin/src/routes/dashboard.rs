//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use orderdesk_core::CurrencyCode;

use crate::{
    api::{DailyStats, DashboardSummary, OrderFilter, OrderStats},
    filters,
    middleware::RequireAuth,
    state::AppState,
};

use super::layout::{Page, money, render};
use super::orders::OrderRowView;
use super::outcome::{PageResult, load};

/// Orders shown under "Recent orders".
const RECENT_ORDER_LIMIT: u32 = 5;

/// Headline number.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl StatCard {
    fn for_orders(stats: &OrderStats, currency: CurrencyCode) -> Vec<Self> {
        vec![
            Self {
                label: "Total orders",
                value: stats.total_orders.to_string(),
            },
            Self {
                label: "Pending",
                value: stats.pending_orders.to_string(),
            },
            Self {
                label: "Completed",
                value: stats.completed_orders.to_string(),
            },
            Self {
                label: "Cancelled",
                value: stats.cancelled_orders.to_string(),
            },
            Self {
                label: "Revenue",
                value: money(stats.total_revenue, currency),
            },
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TopProductView {
    pub name: String,
    pub quantity_sold: u64,
    pub revenue: String,
}

#[derive(Debug, Clone)]
pub struct TopCustomerView {
    pub name: String,
    pub orders: u64,
    pub spent: String,
}

#[derive(Debug, Clone)]
pub struct DailyStatView {
    pub date: String,
    pub order_count: u64,
    pub revenue: String,
}

impl DailyStatView {
    #[must_use]
    pub fn new(stats: &DailyStats, currency: CurrencyCode) -> Self {
        Self {
            date: stats.date.clone(),
            order_count: stats.order_count,
            revenue: money(stats.revenue, currency),
        }
    }
}

/// Dashboard summary, shared with the reports page.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub total_orders: u64,
    pub total_revenue: String,
    pub top_products: Vec<TopProductView>,
    pub top_customers: Vec<TopCustomerView>,
    pub recent_stats: Vec<DailyStatView>,
}

impl SummaryView {
    #[must_use]
    pub fn new(summary: &DashboardSummary, currency: CurrencyCode) -> Self {
        Self {
            total_orders: summary.total_orders,
            total_revenue: money(summary.total_revenue, currency),
            top_products: summary
                .top_products
                .iter()
                .map(|p| TopProductView {
                    name: p.display_name(),
                    quantity_sold: p.total_quantity_sold,
                    revenue: money(p.total_revenue, currency),
                })
                .collect(),
            top_customers: summary
                .top_customers
                .iter()
                .map(|c| TopCustomerView {
                    name: c.display_name(),
                    orders: c.total_orders,
                    spent: money(c.total_spent, currency),
                })
                .collect(),
            recent_stats: summary
                .recent_stats
                .iter()
                .map(|s| DailyStatView::new(s, currency))
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: Page,
    pub cards: Vec<StatCard>,
    pub summary: Option<SummaryView>,
    pub recent_orders: Vec<OrderRowView>,
}

/// Welcome page with order stats, the backend summary, and recent orders.
#[instrument(skip(ctx, state))]
pub async fn dashboard(RequireAuth(ctx): RequireAuth, State(state): State<AppState>) -> PageResult {
    let currency = state.config().currency;

    let stats = load(&ctx, ctx.api.order_stats().await).await?;
    let summary = load(&ctx, ctx.api.dashboard_summary().await).await?;
    let recent = load(
        &ctx,
        ctx.api
            .list_orders(&OrderFilter {
                limit: Some(RECENT_ORDER_LIMIT),
                ..OrderFilter::default()
            })
            .await,
    )
    .await?
    .unwrap_or_default();

    let template = DashboardTemplate {
        page: Page::new(&ctx, "/dashboard", "Dashboard").await,
        cards: stats
            .map(|s| StatCard::for_orders(&s, currency))
            .unwrap_or_default(),
        summary: summary.map(|s| SummaryView::new(&s, currency)),
        recent_orders: recent
            .iter()
            .map(|order| OrderRowView::new(order, currency))
            .collect(),
    };
    Ok(render(&template).into_response())
}

#[cfg(test)]
mod tests {
    use orderdesk_core::{CustomerId, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::{CustomerReport, ProductReport};

    #[test]
    fn test_summary_view_names_fall_back_to_ids() {
        let summary = DashboardSummary {
            total_orders: 3,
            total_revenue: Decimal::new(9900, 2),
            top_products: vec![ProductReport {
                product_id: ProductId::new(8),
                product_name: String::new(),
                total_quantity_sold: 4,
                total_revenue: Decimal::new(4000, 2),
            }],
            top_customers: vec![CustomerReport {
                customer_id: CustomerId::new(2),
                customer_name: "Ana Diaz".to_string(),
                total_orders: 2,
                total_spent: Decimal::new(5900, 2),
            }],
            recent_stats: Vec::new(),
        };
        let view = SummaryView::new(&summary, CurrencyCode::USD);
        assert_eq!(view.total_revenue, "$99.00");
        assert_eq!(view.top_products[0].name, "Product #8");
        assert_eq!(view.top_customers[0].name, "Ana Diaz");
    }

    #[test]
    fn test_order_stat_cards() {
        let stats = OrderStats {
            total_orders: 10,
            completed_orders: 6,
            cancelled_orders: 1,
            pending_orders: 3,
            total_revenue: Decimal::new(123_450, 2),
        };
        let cards = StatCard::for_orders(&stats, CurrencyCode::USD);
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[4].value, "$1,234.50");
    }
}
