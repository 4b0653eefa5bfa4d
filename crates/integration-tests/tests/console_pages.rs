//! Rendered pages, order actions, toasts, and form errors.

use orderdesk_integration_tests::{MockBackend, TestConsole, browser, location, login, page};

async fn signed_in() -> (MockBackend, TestConsole, reqwest::Client) {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();
    login(&client, &console, "admin", None).await;
    (backend, console, client)
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_dashboard_shows_stats_and_top_products() {
    let (_backend, console, client) = signed_in().await;

    let (status, body) = page(&client, &console, "/dashboard").await;
    assert_eq!(status, 200);
    assert!(body.contains("$119.96"));
    assert!(body.contains("Espresso Beans"));
    assert!(body.contains(r#"href="/users""#), "admins see user management");
}

#[tokio::test]
async fn test_order_detail_offers_actions_for_status() {
    let (_backend, console, client) = signed_in().await;

    let (status, body) = page(&client, &console, "/orders/1").await;
    assert_eq!(status, 200);
    assert!(body.contains("Espresso Beans"));
    assert!(body.contains("$59.98"));
    assert!(body.contains("/orders/1/pay"));
    assert!(body.contains("/orders/1/cancel"));
    assert!(!body.contains("/orders/1/ship"));
}

#[tokio::test]
async fn test_missing_order_renders_not_found() {
    let (_backend, console, client) = signed_in().await;

    let (status, body) = page(&client, &console, "/orders/404").await;
    assert_eq!(status, 404);
    assert!(body.contains("Page not found") || body.contains("not found"));
}

#[tokio::test]
async fn test_unknown_route_renders_not_found() {
    let (_backend, console, client) = signed_in().await;

    let (status, _) = page(&client, &console, "/nowhere").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let (_backend, console, client) = signed_in().await;

    let response = client
        .get(console.at("/dashboard"))
        .send()
        .await
        .expect("load dashboard");
    let headers = response.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("content-security-policy"));
}

// ============================================================================
// Order actions
// ============================================================================

#[tokio::test]
async fn test_confirm_page_asks_before_acting() {
    let (backend, console, client) = signed_in().await;

    let (status, body) = page(&client, &console, "/orders/1/cancel").await;
    assert_eq!(status, 200);
    assert!(body.contains("Are you sure you want to cancel this order?"));
    assert!(backend.requests_to("/orders/1/cancel").is_empty());
}

#[tokio::test]
async fn test_successful_action_toasts_and_returns_to_order() {
    let (backend, console, client) = signed_in().await;

    let response = client
        .post(console.at("/orders/1/cancel"))
        .form(&[("payment_method", "")])
        .send()
        .await
        .expect("cancel order");
    assert_eq!(location(&response), "/orders/1");
    assert_eq!(backend.requests_to("/orders/1/cancel").len(), 1);

    let (_, body) = page(&client, &console, "/orders/1").await;
    assert!(body.contains("Order cancelled successfully!"));

    // Toasts are shown once.
    let (_, body) = page(&client, &console, "/orders/1").await;
    assert!(!body.contains("Order cancelled successfully!"));
}

#[tokio::test]
async fn test_refused_action_is_sent_anyway_and_reason_shown() {
    let (backend, console, client) = signed_in().await;

    // Ship is not offered for a created order, but the backend decides.
    let response = client
        .post(console.at("/orders/1/ship"))
        .form(&[("payment_method", "")])
        .send()
        .await
        .expect("ship order");
    assert!(response.status().is_redirection());
    assert_eq!(backend.requests_to("/orders/1/ship").len(), 1);

    let (_, body) = page(&client, &console, "/orders/1").await;
    assert!(body.contains("Order must be paid before shipping"));
}

#[tokio::test]
async fn test_unknown_action_is_not_found() {
    let (backend, console, client) = signed_in().await;

    let response = client
        .post(console.at("/orders/1/refund"))
        .form(&[("payment_method", "")])
        .send()
        .await
        .expect("post unknown action");
    assert_eq!(response.status().as_u16(), 404);
    assert!(backend.requests_to("/orders/1/refund").is_empty());
}

// ============================================================================
// Forms
// ============================================================================

#[tokio::test]
async fn test_invalid_customer_form_rerenders_with_errors() {
    let (backend, console, client) = signed_in().await;

    let response = client
        .post(console.at("/customers/new"))
        .form(&[
            ("first_name", ""),
            ("last_name", "Lovelace"),
            ("email", "not-an-email"),
            ("intent", "save"),
        ])
        .send()
        .await
        .expect("submit customer");

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("First name is required"));
    assert!(body.contains("Please enter a valid email address"));
    assert!(body.contains(r#"value="Lovelace""#), "input is preserved");
    assert!(
        backend
            .requests()
            .iter()
            .all(|r| !(r.method == "POST" && r.path.ends_with("/customers")))
    );
}

#[tokio::test]
async fn test_add_address_intent_adds_a_row_without_saving() {
    let (backend, console, client) = signed_in().await;

    let response = client
        .post(console.at("/customers/new"))
        .form(&[
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("email", "ada@orderdesk.test"),
            ("intent", "add_address"),
        ])
        .send()
        .await
        .expect("add address row");

    let body = response.text().await.expect("body");
    assert!(body.contains(r#"name="address-0-street""#));
    assert!(!body.contains("field-error"));
    assert!(
        backend
            .requests()
            .iter()
            .all(|r| r.method != "POST" || !r.path.contains("/customers"))
    );
}

#[tokio::test]
async fn test_order_form_requires_customer_and_items() {
    let (_backend, console, client) = signed_in().await;

    let response = client
        .post(console.at("/orders/create"))
        .form(&[("customer_id", ""), ("intent", "save")])
        .send()
        .await
        .expect("submit order");

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("field-error") || body.contains("form-error"));
}
