//! `od-cli verify`

use super::{CliError, Context};

/// Ask the backend whether the configured token is still valid.
///
/// # Errors
///
/// Returns [`CliError::InvalidToken`] when the backend says no.
pub async fn run(context: &Context) -> Result<(), CliError> {
    let response = match context.api.verify_token().await {
        Ok(response) => response,
        Err(err) if err.requires_logout() => return Err(CliError::InvalidToken),
        Err(err) => return Err(err.into()),
    };

    if !response.valid {
        return Err(CliError::InvalidToken);
    }
    tracing::info!(backend = %context.api.base_url(), "Token is valid");
    Ok(())
}
