//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to /auth/login
//! GET  /health                    - Health check
//!
//! # Auth
//! GET  /auth/login, POST          - Login form (returnUrl aware)
//! GET  /auth/signup, POST         - Registration form
//! POST /auth/logout               - Logout
//!
//! # Orders
//! GET  /orders                    - List, filter by status/customer
//! GET  /orders/create, POST       - Order form with live total
//! GET  /orders/{id}               - Detail, payments, suggested actions
//! POST /orders/{id}/status        - Direct status change
//! GET  /orders/{id}/{action}      - Confirm an action
//! POST /orders/{id}/{action}      - Confirm, pay, ship, complete, cancel
//!
//! # Customers, products, categories
//! GET  /customers ...             - CRUD with addresses
//! GET  /products ...              - CRUD, stock, search
//! GET  /categories ...            - List, create, delete
//!
//! # Users (admin only)
//! GET  /users ...                 - Search, stats, CRUD, lock/unlock, bulk
//!
//! # Payments, reports, profile
//! GET  /payments, /payments/{id}
//! GET  /reports, /reports/list, /reports/{id}, POST /reports/generate
//! GET  /profile, POST /profile, POST /profile/password
//! ```
//!
//! Every route outside `/auth`, `/health`, and `/static` takes a
//! [`RequireAuth`](crate::middleware::RequireAuth) or
//! [`RequireAdmin`](crate::middleware::RequireAdmin) extractor.

pub mod auth;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod layout;
pub mod not_found;
pub mod orders;
pub mod outcome;
pub mod payments;
pub mod products;
pub mod profile;
pub mod reports;
pub mod users;

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::config::ConfigError;
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{create_session_layer, security_headers_middleware};
use crate::state::AppState;

/// Static assets shipped with the crate.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login).post(auth::login_submit))
        .route("/signup", get(auth::signup).post(auth::signup_submit))
        .route("/logout", post(auth::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/create", get(orders::new).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
        .route(
            "/{id}/{action}",
            get(orders::confirm_page).post(orders::perform),
        )
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index))
        .route("/new", get(customers::new).post(customers::create))
        .route("/{id}/edit", get(customers::edit).post(customers::update))
        .route("/{id}/delete", post(customers::delete))
        .route("/{id}/addresses", post(customers::add_address))
        .route(
            "/{id}/addresses/{address_id}/delete",
            post(customers::delete_address),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/new", get(products::new).post(products::create))
        .route("/{id}/edit", get(products::edit).post(products::update))
        .route("/{id}/stock", post(products::update_stock))
        .route("/{id}/delete", post(products::delete))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/new", get(categories::new).post(categories::create))
        .route("/{id}/delete", post(categories::delete))
}

/// Create the user administration routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/new", get(users::new).post(users::create))
        .route("/bulk", post(users::bulk))
        .route("/{id}", get(users::show))
        .route("/{id}/edit", get(users::edit).post(users::update))
        .route("/{id}/status", post(users::update_status))
        .route("/{id}/delete", post(users::delete))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(payments::index))
        .route("/{id}", get(payments::show))
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::index))
        .route("/list", get(reports::list))
        .route("/generate", post(reports::generate))
        .route("/{id}", get(reports::show))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show).post(profile::update))
        .route("/password", post(profile::change_password))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(LOGIN_PATH) }))
        .route("/dashboard", get(dashboard::dashboard))
        .nest("/auth", auth_routes())
        .nest("/orders", order_routes())
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/users", user_routes())
        .nest("/payments", payment_routes())
        .nest("/reports", report_routes())
        .nest("/profile", profile_routes())
}

/// Liveness check. Does not touch the backend.
async fn health() -> &'static str {
    "ok"
}

/// The complete console application: pages, static assets, sessions,
/// security headers, and request tracing.
///
/// # Errors
///
/// Returns an error if the session signing key cannot be derived.
pub fn app(state: AppState) -> Result<Router, ConfigError> {
    let session_layer = create_session_layer(state.config())?;

    Ok(Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found::fallback)
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state))
}
