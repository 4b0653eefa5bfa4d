//! Reports: backend summary, daily stats, and scheduled reports.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use orderdesk_core::{CurrencyCode, OrderStatus, ReportId};

use crate::{
    api::{DEFAULT_DAILY_STATS_DAYS, ReportQuery, ScheduledReport},
    filters,
    middleware::RequireAuth,
    notify,
    state::AppState,
};

use super::dashboard::{DailyStatView, SummaryView};
use super::layout::{Page, money, render};
use super::outcome::{PageResult, load, require};

/// Windows offered for the daily stats table.
const DAY_WINDOWS: [u32; 4] = [7, 14, 30, 90];

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DayWindow {
    pub days: u32,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct StatusCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct ReportView {
    pub id: Option<String>,
    pub report_type: String,
    pub report_date: String,
    pub total_orders: u64,
    pub total_revenue: String,
    pub average_order_value: String,
    pub orders_by_status: Vec<StatusCount>,
    pub metadata: Vec<(String, String)>,
    pub generated_at: String,
}

impl ReportView {
    #[must_use]
    pub fn new(report: &ScheduledReport, currency: CurrencyCode) -> Self {
        Self {
            id: report.id.map(|id| id.to_string()),
            report_type: report.report_type.clone(),
            report_date: report.report_date.clone(),
            total_orders: report.total_orders,
            total_revenue: money(report.total_revenue, currency),
            average_order_value: money(report.average_order_value, currency),
            orders_by_status: report
                .orders_by_status
                .iter()
                .map(|(status, count)| StatusCount {
                    label: status
                        .parse::<OrderStatus>()
                        .map_or_else(|_| status.clone(), |s| s.label().to_string()),
                    count: *count,
                })
                .collect(),
            metadata: report
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            generated_at: report.generated_at.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "reports/index.html")]
pub struct ReportsIndexTemplate {
    pub page: Page,
    pub summary: Option<SummaryView>,
    pub latest: Option<ReportView>,
    pub daily: Vec<DailyStatView>,
    pub windows: Vec<DayWindow>,
}

#[derive(Template)]
#[template(path = "reports/list.html")]
pub struct ReportListTemplate {
    pub page: Page,
    pub reports: Vec<ReportView>,
    pub start_date: String,
    pub end_date: String,
    pub page_number: u32,
    pub total_pages: u64,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Template)]
#[template(path = "reports/show.html")]
pub struct ReportShowTemplate {
    pub page: Page,
    pub report: ReportView,
}

/// Summary, latest scheduled report, and daily stats.
#[instrument(skip(ctx, state))]
pub async fn index(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> PageResult {
    let currency = state.config().currency;
    let days = query
        .days
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_DAILY_STATS_DAYS);

    let summary = load(&ctx, ctx.api.dashboard_summary().await).await?;
    // No report generated yet is not an error worth a toast.
    let latest = match ctx.api.latest_report().await {
        Err(err) if err.is_not_found() => None,
        result => load(&ctx, result).await?,
    };
    let daily = load(&ctx, ctx.api.daily_stats(days).await)
        .await?
        .unwrap_or_default();

    let template = ReportsIndexTemplate {
        page: Page::new(&ctx, "/reports", "Reports").await,
        summary: summary.map(|s| SummaryView::new(&s, currency)),
        latest: latest.map(|r| ReportView::new(&r, currency)),
        daily: daily
            .iter()
            .map(|d| DailyStatView::new(d, currency))
            .collect(),
        windows: DAY_WINDOWS
            .into_iter()
            .map(|d| DayWindow {
                days: d,
                selected: d == days,
            })
            .collect(),
    };
    Ok(render(&template).into_response())
}

fn list_href(query: &ReportQuery, page: u32) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("page", &page.to_string());
    serializer.append_pair("pageSize", &query.page_size.to_string());
    if let Some(start) = query.start_date.as_deref().filter(|s| !s.is_empty()) {
        serializer.append_pair("startDate", start);
    }
    if let Some(end) = query.end_date.as_deref().filter(|s| !s.is_empty()) {
        serializer.append_pair("endDate", end);
    }
    format!("/reports/list?{}", serializer.finish())
}

/// Scheduled reports, page-numbered, with an optional date range.
#[instrument(skip(ctx, state))]
pub async fn list(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
) -> PageResult {
    let config = state.config();
    let report_query = ReportQuery {
        page: query.page.unwrap_or(1).max(1),
        page_size: query
            .page_size
            .unwrap_or(config.page_size)
            .clamp(1, 100),
        start_date: query.start_date.map(|s| s.trim().to_string()),
        end_date: query.end_date.map(|s| s.trim().to_string()),
    };

    let response = load(&ctx, ctx.api.scheduled_reports(&report_query).await).await?;
    let (reports, total_pages) = response.map_or((Vec::new(), 0), |r| {
        let pages = r.total_pages();
        (r.reports, pages)
    });

    let page_number = report_query.page;
    let template = ReportListTemplate {
        page: Page::new(&ctx, "/reports", "Scheduled reports").await,
        reports: reports
            .iter()
            .map(|r| ReportView::new(r, config.currency))
            .collect(),
        previous_href: (page_number > 1).then(|| list_href(&report_query, page_number - 1)),
        next_href: (u64::from(page_number) < total_pages)
            .then(|| list_href(&report_query, page_number + 1)),
        start_date: report_query.start_date.clone().unwrap_or_default(),
        end_date: report_query.end_date.clone().unwrap_or_default(),
        page_number,
        total_pages,
    };
    Ok(render(&template).into_response())
}

#[instrument(skip(ctx, state))]
pub async fn show(
    RequireAuth(ctx): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ReportId>,
) -> PageResult {
    let report = require(&ctx, ctx.api.scheduled_report(id).await, "/reports/list").await?;
    let template = ReportShowTemplate {
        page: Page::new(&ctx, "/reports", &format!("Report #{id}")).await,
        report: ReportView::new(&report, state.config().currency),
    };
    Ok(render(&template).into_response())
}

/// Generate a report now and open it.
#[instrument(skip(ctx))]
pub async fn generate(RequireAuth(ctx): RequireAuth) -> PageResult {
    match ctx.api.generate_report().await {
        Ok(report) => {
            tracing::info!(report_id = ?report.id, "Report generated");
            notify::success(&ctx.session, "Report generated", "Report generated successfully!")
                .await;
            let target = report
                .id
                .map_or_else(|| "/reports".to_string(), |id| format!("/reports/{id}"));
            Ok(Redirect::to(&target).into_response())
        }
        Err(err) => Ok(notify::surface_api_error(&ctx.session, &err)
            .await
            .unwrap_or_else(|| Redirect::to("/reports").into_response())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_report_view_labels_statuses() {
        let report = ScheduledReport {
            id: Some(ReportId::new(3)),
            report_type: "daily".to_string(),
            report_date: "2024-05-01".to_string(),
            total_orders: 4,
            total_revenue: Decimal::new(10_000, 2),
            average_order_value: Decimal::new(2500, 2),
            orders_by_status: BTreeMap::from([
                ("paid".to_string(), 3),
                ("mystery".to_string(), 1),
            ]),
            metadata: BTreeMap::new(),
            generated_at: String::new(),
        };
        let view = ReportView::new(&report, CurrencyCode::USD);
        assert_eq!(view.average_order_value, "$25.00");
        let labels: Vec<&str> = view.orders_by_status.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["mystery", "Paid"]);
    }

    #[test]
    fn test_list_href_keeps_range() {
        let query = ReportQuery {
            page: 1,
            page_size: 10,
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        };
        assert_eq!(
            list_href(&query, 2),
            "/reports/list?page=2&pageSize=10&startDate=2024-01-01"
        );
    }
}
