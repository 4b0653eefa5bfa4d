//! Turning backend results into page responses.
//!
//! Handlers return [`PageResult`] so a failed backend call can short-circuit
//! with `?`: an expired session becomes the login redirect, a missing record
//! the 404 page, and anything else a toast plus a redirect.

use axum::response::{IntoResponse, Redirect, Response};

use crate::api::ApiError;
use crate::middleware::AuthContext;
use crate::notify;

use super::not_found::not_found_response;

pub type PageResult = Result<Response, Response>;

/// Optional data for a page. Errors are reported as toasts and the page
/// renders without it; only an expired session aborts.
///
/// # Errors
///
/// Returns the login redirect when the session has expired.
pub async fn load<T>(ctx: &AuthContext, result: Result<T, ApiError>) -> Result<Option<T>, Response> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match notify::surface_api_error(&ctx.session, &err).await {
            Some(redirect) => Err(redirect),
            None => Ok(None),
        },
    }
}

/// Data a page cannot render without.
///
/// # Errors
///
/// Returns the login redirect on an expired session, the 404 page when the
/// record does not exist, or a redirect to `fallback` after queueing a toast.
pub async fn require<T>(
    ctx: &AuthContext,
    result: Result<T, ApiError>,
    fallback: &str,
) -> Result<T, Response> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_not_found() => {
            tracing::info!(error = %err, "Record not found");
            Err(not_found_response(ctx).await)
        }
        Err(err) => Err(notify::surface_api_error(&ctx.session, &err)
            .await
            .unwrap_or_else(|| Redirect::to(fallback).into_response())),
    }
}

/// Post/redirect/get for a mutation: success toast and redirect on success,
/// error toast and redirect to `failure_to` otherwise.
pub async fn after_mutation<T>(
    ctx: &AuthContext,
    result: Result<T, ApiError>,
    success: (&str, &str),
    success_to: &str,
    failure_to: &str,
) -> Response {
    match result {
        Ok(_) => {
            let (title, message) = success;
            notify::success(&ctx.session, title, message).await;
            Redirect::to(success_to).into_response()
        }
        Err(err) => notify::surface_api_error(&ctx.session, &err)
            .await
            .unwrap_or_else(|| Redirect::to(failure_to).into_response()),
    }
}
