//! Command implementations and their shared backend context.

pub mod orders;
pub mod reports;
pub mod verify;

use std::time::Duration;

use orderdesk_admin::api::{ApiClient, ApiError};
use orderdesk_core::{CurrencyCode, Money};
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// `ORDERDESK_API_URL` is not a URL.
    #[error("Invalid ORDERDESK_API_URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `ORDERDESK_CURRENCY` is not a supported code.
    #[error("Invalid ORDERDESK_CURRENCY: {0}")]
    InvalidCurrency(String),

    /// The backend rejected the configured token.
    #[error("Token is not valid; log in again and update ORDERDESK_API_TOKEN")]
    InvalidToken,

    /// The backend call failed.
    #[error("{}", .0.toast_message())]
    Api(#[from] ApiError),
}

/// Authorized client plus display settings.
pub struct Context {
    pub api: ApiClient,
    pub currency: CurrencyCode,
}

impl Context {
    /// Build the context from `ORDERDESK_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or token is missing or malformed.
    pub fn from_env() -> Result<Self, CliError> {
        let api_url = std::env::var("ORDERDESK_API_URL")
            .map_err(|_| CliError::MissingEnvVar("ORDERDESK_API_URL"))?;
        let token = std::env::var("ORDERDESK_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(CliError::MissingEnvVar("ORDERDESK_API_TOKEN"))?;
        let currency = match std::env::var("ORDERDESK_CURRENCY") {
            Ok(code) => code.parse().map_err(CliError::InvalidCurrency)?,
            Err(_) => CurrencyCode::USD,
        };

        let base = ApiClient::new(&Url::parse(&api_url)?, API_TIMEOUT)?;
        Ok(Self {
            api: base.authorized(&token),
            currency,
        })
    }

    #[must_use]
    pub fn money(&self, amount: Decimal) -> String {
        Money::new(amount, self.currency).display()
    }
}
