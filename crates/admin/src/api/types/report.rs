//! Reporting records.

use std::collections::BTreeMap;

use orderdesk_core::{CustomerId, ProductId, ReportId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReport {
    #[serde(default)]
    pub id: Option<ReportId>,
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub report_date: String,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub average_order_value: Decimal,
    #[serde(default)]
    pub orders_by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub generated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    #[serde(default)]
    pub reports: Vec<ScheduledReport>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

impl ReportListResponse {
    /// Number of pages, at least one.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.page_size)).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: String,
    #[serde(default)]
    pub order_count: u64,
    #[serde(default)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub total_quantity_sold: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
}

impl ProductReport {
    /// Product name, or `Product #id` when the backend sent none.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.product_name.trim().is_empty() {
            format!("Product #{}", self.product_id)
        } else {
            self.product_name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReport {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_spent: Decimal,
}

impl CustomerReport {
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.customer_name.trim().is_empty() {
            format!("Customer #{}", self.customer_id)
        } else {
            self.customer_name.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub top_products: Vec<ProductReport>,
    #[serde(default)]
    pub top_customers: Vec<CustomerReport>,
    #[serde(default)]
    pub recent_stats: Vec<DailyStats>,
}

/// Query for `GET /reports/scheduled`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub page: u32,
    pub page_size: u32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportQuery {
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.max(1).to_string()),
            ("pageSize", self.page_size.max(1).to_string()),
        ];
        if let Some(start) = self.start_date.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("startDate", start.to_string()));
        }
        if let Some(end) = self.end_date.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("endDate", end.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_report_query_skips_empty_dates() {
        let query = ReportQuery {
            page: 2,
            page_size: 10,
            start_date: Some(String::new()),
            end_date: Some("2024-06-30".to_string()),
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("pageSize", "10".to_string()),
                ("endDate", "2024-06-30".to_string()),
            ]
        );
    }

    #[test]
    fn test_total_pages() {
        let list = ReportListResponse {
            reports: vec![],
            total: 21,
            page: 1,
            page_size: 10,
        };
        assert_eq!(list.total_pages(), 3);
        let empty = ReportListResponse {
            reports: vec![],
            total: 0,
            page: 1,
            page_size: 10,
        };
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn test_scheduled_report_decodes() {
        let report: ScheduledReport = serde_json::from_str(
            r#"{"id": 3, "reportType": "daily", "reportDate": "2024-06-01", "totalOrders": 12,
                "totalRevenue": 1500.25, "averageOrderValue": 125.02,
                "ordersByStatus": {"paid": 4, "completed": 8}, "metadata": {},
                "generatedAt": "2024-06-02T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(report.orders_by_status.get("completed"), Some(&8));
        assert_eq!(report.total_revenue, Decimal::new(150_025, 2));
    }
}
