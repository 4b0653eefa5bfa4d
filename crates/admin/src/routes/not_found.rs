//! Not-found page.

use askama::Template;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::{filters, middleware::AuthContext};

use super::layout::{Page, render};

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub page: Page,
    pub path: String,
}

/// 404 page for a record the backend does not have.
pub async fn not_found_response(ctx: &AuthContext) -> Response {
    let template = NotFoundTemplate {
        page: Page::new(ctx, "", "Page not found").await,
        path: String::new(),
    };
    (StatusCode::NOT_FOUND, render(&template)).into_response()
}

/// Router fallback for unknown paths.
pub async fn fallback(session: Session, uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route");
    let template = NotFoundTemplate {
        page: Page::from_session(&session, uri.path(), "Page not found").await,
        path: uri.path().to_string(),
    };
    (StatusCode::NOT_FOUND, render(&template)).into_response()
}
