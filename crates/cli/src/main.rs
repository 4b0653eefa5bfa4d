//! OrderDesk CLI - command-line access to the OrderDesk backend.
//!
//! # Usage
//!
//! ```bash
//! # Check that ORDERDESK_API_TOKEN is still accepted
//! od-cli verify
//!
//! # List paid orders, then ship one
//! od-cli orders list --status paid
//! od-cli orders transition 42 ship
//!
//! # Pay with a specific method
//! od-cli orders transition 42 pay --payment-method paypal
//!
//! # Reports
//! od-cli reports summary
//! od-cli reports generate
//! ```
//!
//! # Environment Variables
//!
//! - `ORDERDESK_API_URL` - backend base URL, e.g. `http://localhost:8080/api`
//! - `ORDERDESK_API_TOKEN` - bearer token from a console login
//! - `ORDERDESK_CURRENCY` - currency for amounts (default `USD`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use orderdesk_core::{OrderAction, OrderId, OrderStatus};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "od-cli")]
#[command(author, version, about = "OrderDesk command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the configured token is valid
    Verify,
    /// Inspect and move orders through their lifecycle
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Backend reports
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// Only orders in this status (draft, created, paid, shipping, completed, cancelled)
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Show one order with its items
    Show { id: OrderId },
    /// Apply a lifecycle action (confirm, pay, ship, complete, cancel)
    Transition {
        id: OrderId,
        action: OrderAction,

        /// Payment method for `pay`
        #[arg(short, long)]
        payment_method: Option<String>,
    },
}

#[derive(Subcommand)]
enum ReportsAction {
    /// Generate a report now
    Generate,
    /// Totals, top products, and top customers
    Summary,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let context = commands::Context::from_env()?;
    match cli.command {
        Commands::Verify => commands::verify::run(&context).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List { status } => commands::orders::list(&context, status).await?,
            OrdersAction::Show { id } => commands::orders::show(&context, id).await?,
            OrdersAction::Transition {
                id,
                action,
                payment_method,
            } => {
                commands::orders::transition(&context, id, action, payment_method.as_deref())
                    .await?;
            }
        },
        Commands::Reports { action } => match action {
            ReportsAction::Generate => commands::reports::generate(&context).await?,
            ReportsAction::Summary => commands::reports::summary(&context).await?,
        },
    }
    Ok(())
}
