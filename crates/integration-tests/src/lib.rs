//! Integration test harness for the OrderDesk console.
//!
//! Every test runs in-process against two servers on ephemeral ports:
//!
//! - a [`MockBackend`] speaking the backend's REST dialect, which records the
//!   method, path, and `Authorization` header of every request it receives
//! - the real console router from `orderdesk-admin`, pointed at the mock
//!
//! Tests drive the console with a cookie-enabled `reqwest` client, exactly as
//! a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p orderdesk-integration-tests
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use orderdesk_admin::{AppState, ConsoleConfig, app};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Password the mock accepts for every known username.
pub const PASSWORD: &str = "secret123";
/// Token issued to `admin`; always verifies.
pub const ADMIN_TOKEN: &str = "token-admin";
/// Token issued to `clerk`, a non-admin; always verifies.
pub const CLERK_TOKEN: &str = "token-clerk";
/// Token issued to `stale`; the backend rejects it on verify.
pub const STALE_TOKEN: &str = "token-stale";

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

type Journal = Arc<Mutex<Vec<RecordedRequest>>>;

/// A fake backend on `127.0.0.1`, mounted under `/api`.
pub struct MockBackend {
    /// Base URL including the `/api` prefix.
    pub api_url: Url,
    journal: Journal,
}

impl MockBackend {
    /// Start the mock on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let journal = Journal::default();
        let api = Router::new()
            .route("/users/login", post(mock_login))
            .route("/users/register", post(mock_register))
            .route("/users/logout", post(|| async { Json(json!({})) }))
            .route("/users/verify", get(verify))
            .route("/users/profile", get(profile))
            .route("/orders", get(list_orders))
            .route("/orders/stats", get(order_stats))
            .route("/orders/{id}", get(get_order))
            .route("/orders/{id}/{action}", post(transition))
            .route("/payments/order/{id}", get(|| async { Json(json!([])) }))
            .route("/reports/dashboard", get(dashboard_summary))
            .route("/customers", get(|| async { Json(json!([])) }))
            .route("/products", get(|| async { Json(json!([])) }));

        let router = Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn_with_state(journal.clone(), record));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            api_url: Url::parse(&format!("http://{addr}/api")).expect("mock backend url"),
            journal,
        }
    }

    /// Everything received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests whose path ends with `suffix`, e.g. `/users/verify`.
    #[must_use]
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with(suffix))
            .collect()
    }
}

async fn record(State(journal): State<Journal>, request: Request, next: Next) -> Response {
    let entry = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(entry);
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn user_json(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@orderdesk.test"),
        "role": role,
        "status": "active",
        "createdAt": "2024-01-02T03:04:05Z"
    })
}

fn order_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "customerId": 3,
        "customerName": "Ada Lovelace",
        "status": status,
        "totalAmount": 59.98,
        "items": [{
            "id": 10,
            "productId": 4,
            "productName": "Espresso Beans",
            "quantity": 2,
            "unitPrice": 29.99,
            "subtotal": 59.98
        }],
        "createdAt": "2024-05-01T10:00:00Z"
    })
}

async fn mock_login(Json(body): Json<Value>) -> Response {
    let username = body["usernameOrEmail"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let issued = match username {
        "admin" => Some((1, "admin", ADMIN_TOKEN)),
        "clerk" => Some((2, "user", CLERK_TOKEN)),
        "stale" => Some((3, "user", STALE_TOKEN)),
        _ => None,
    };
    match issued {
        Some((id, role, token)) if password == PASSWORD => {
            Json(json!({ "token": token, "user": user_json(id, username, role) })).into_response()
        }
        _ => error(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    }
}

async fn mock_register(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    match username {
        "taken" => return error(StatusCode::BAD_REQUEST, "Username already exists"),
        "expired" => return error(StatusCode::UNAUTHORIZED, "Invalid token"),
        _ => {}
    }
    (StatusCode::CREATED, Json(user_json(9, username, "user"))).into_response()
}

async fn verify(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(ADMIN_TOKEN | CLERK_TOKEN) => Json(json!({ "valid": true })).into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid token"),
    }
}

async fn profile(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(ADMIN_TOKEN) => Json(user_json(1, "admin", "admin")).into_response(),
        Some(CLERK_TOKEN) => Json(user_json(2, "clerk", "user")).into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid token"),
    }
}

async fn list_orders() -> Json<Value> {
    Json(json!([order_json(1, "created"), order_json(2, "paid")]))
}

async fn order_stats() -> Json<Value> {
    Json(json!({
        "totalOrders": 2,
        "completedOrders": 0,
        "cancelledOrders": 0,
        "pendingOrders": 1,
        "totalRevenue": 119.96
    }))
}

async fn get_order(Path(id): Path<i64>) -> Response {
    match id {
        1 => Json(order_json(1, "created")).into_response(),
        2 => Json(order_json(2, "paid")).into_response(),
        _ => error(StatusCode::NOT_FOUND, "Order not found"),
    }
}

/// Order 1 is `created`: it can be confirmed or cancelled, nothing else.
async fn transition(Path((id, action)): Path<(i64, String)>) -> Response {
    match (id, action.as_str()) {
        (1, "confirm") => Json(json!({ "message": "Order confirmed" })).into_response(),
        (1, "cancel") => Json(json!({ "message": "Order cancelled" })).into_response(),
        (1, "ship") => error(StatusCode::BAD_REQUEST, "Order must be paid before shipping"),
        (1, _) => error(StatusCode::BAD_REQUEST, "Invalid status transition"),
        _ => error(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn dashboard_summary() -> Json<Value> {
    Json(json!({
        "totalOrders": 2,
        "totalRevenue": 119.96,
        "topProducts": [{
            "productId": 4,
            "productName": "Espresso Beans",
            "totalQuantitySold": 4,
            "totalRevenue": 119.96
        }],
        "topCustomers": [],
        "recentStats": []
    }))
}

/// The console under test.
pub struct TestConsole {
    /// `http://127.0.0.1:<port>`
    pub url: String,
}

impl TestConsole {
    /// Serve the console against `backend`.
    ///
    /// # Panics
    ///
    /// Panics if the console cannot be built or bound.
    pub async fn start(backend: &MockBackend) -> Self {
        Self::start_with(backend, |_| {}).await
    }

    /// Serve the console with a config adjusted by `tweak`.
    ///
    /// # Panics
    ///
    /// Panics if the console cannot be built or bound.
    pub async fn start_with(backend: &MockBackend, tweak: impl FnOnce(&mut ConsoleConfig)) -> Self {
        let mut config = ConsoleConfig::for_api(backend.api_url.clone());
        tweak(&mut config);

        let state = AppState::new(config).expect("console state");
        let router = app(state).expect("console router");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind console");
        let addr = listener.local_addr().expect("console address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            url: format!("http://{addr}"),
        }
    }

    #[must_use]
    pub fn at(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

/// A cookie-keeping client that does not follow redirects, so tests can
/// assert on `Location`.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("build test client")
}

/// Submit the login form and return the `Location` it redirected to.
///
/// # Panics
///
/// Panics if the console does not answer with a redirect.
pub async fn login(
    client: &reqwest::Client,
    console: &TestConsole,
    username: &str,
    return_url: Option<&str>,
) -> String {
    let mut form = vec![("username", username), ("password", PASSWORD)];
    if let Some(target) = return_url {
        form.push(("returnUrl", target));
    }
    let response = client
        .post(console.at("/auth/login"))
        .form(&form)
        .send()
        .await
        .expect("submit login");
    assert!(
        response.status().is_redirection(),
        "login should redirect, got {}",
        response.status()
    );
    location(&response)
}

/// The `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// GET `path` and return the body, following nothing.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn page(client: &reqwest::Client, console: &TestConsole, path: &str) -> (u16, String) {
    let response = client
        .get(console.at(path))
        .send()
        .await
        .expect("load page");
    let status = response.status().as_u16();
    (status, response.text().await.expect("page body"))
}
