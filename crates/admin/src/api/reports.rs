//! Reporting endpoints.

use orderdesk_core::ReportId;
use tracing::instrument;

use super::endpoints::reports;
use super::{
    ApiClient, ApiError, DailyStats, DashboardSummary, ReportListResponse, ReportQuery,
    ScheduledReport,
};

/// Window used by the daily stats chart when none is given.
pub const DEFAULT_DAILY_STATS_DAYS: u32 = 30;

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn scheduled_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<ReportListResponse, ApiError> {
        self.get_with_query(reports::SCHEDULED, &query.query_pairs())
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn scheduled_report(&self, id: ReportId) -> Result<ScheduledReport, ApiError> {
        self.get(&reports::scheduled_by_id(id)).await
    }

    /// Most recently generated report.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no report exists yet.
    #[instrument(skip(self))]
    pub async fn latest_report(&self) -> Result<ScheduledReport, ApiError> {
        self.get(reports::LATEST).await
    }

    /// Ask the backend to build a report now.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn generate_report(&self) -> Result<ScheduledReport, ApiError> {
        self.post(reports::GENERATE, &serde_json::json!({})).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get(reports::DASHBOARD).await
    }

    /// Per-day order counts and revenue for the last `days` days.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn daily_stats(&self, days: u32) -> Result<Vec<DailyStats>, ApiError> {
        let days = if days == 0 { DEFAULT_DAILY_STATS_DAYS } else { days };
        self.get_with_query(reports::DAILY_STATS, &[("days", days)])
            .await
    }
}
