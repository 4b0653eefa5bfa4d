//! `od-cli reports ...`

use super::{CliError, Context};

/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn generate(context: &Context) -> Result<(), CliError> {
    let report = context.api.generate_report().await?;
    tracing::info!(
        report_id = ?report.id,
        "Generated {} report for {}",
        report.report_type,
        report.report_date
    );
    tracing::info!(
        "  {} order(s), revenue {}, average {}",
        report.total_orders,
        context.money(report.total_revenue),
        context.money(report.average_order_value)
    );
    for (status, count) in &report.orders_by_status {
        tracing::info!("  {status:<10} {count}");
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn summary(context: &Context) -> Result<(), CliError> {
    let summary = context.api.dashboard_summary().await?;
    tracing::info!(
        "{} order(s), revenue {}",
        summary.total_orders,
        context.money(summary.total_revenue)
    );

    if !summary.top_products.is_empty() {
        tracing::info!("Top products:");
        for product in &summary.top_products {
            tracing::info!(
                "  {:<30} {:>5} sold {:>12}",
                product.display_name(),
                product.total_quantity_sold,
                context.money(product.total_revenue)
            );
        }
    }
    if !summary.top_customers.is_empty() {
        tracing::info!("Top customers:");
        for customer in &summary.top_customers {
            tracing::info!(
                "  {:<30} {:>5} orders {:>12}",
                customer.display_name(),
                customer.total_orders,
                context.money(customer.total_spent)
            );
        }
    }
    Ok(())
}
