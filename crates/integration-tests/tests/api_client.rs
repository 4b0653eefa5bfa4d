//! `ApiClient` against the mock backend: bearer header and error classification.

use std::time::Duration;

use orderdesk_admin::api::{ApiClient, ApiError, LoginRequest, OrderFilter};
use orderdesk_core::{OrderAction, OrderId};
use orderdesk_integration_tests::{ADMIN_TOKEN, MockBackend, PASSWORD};

fn client(backend: &MockBackend) -> ApiClient {
    ApiClient::new(&backend.api_url, Duration::from_secs(5)).expect("build client")
}

// ============================================================================
// Authorization header
// ============================================================================

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let backend = MockBackend::start().await;
    let api = client(&backend).authorized(ADMIN_TOKEN);

    api.list_orders(&OrderFilter::default())
        .await
        .expect("list orders");

    let seen = backend.requests_to("/orders");
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some("Bearer token-admin")
    );
}

#[tokio::test]
async fn test_no_header_without_token() {
    let backend = MockBackend::start().await;

    client(&backend)
        .list_orders(&OrderFilter::default())
        .await
        .expect("list orders");
    client(&backend)
        .authorized("   ")
        .list_orders(&OrderFilter::default())
        .await
        .expect("list orders");

    for request in backend.requests_to("/orders") {
        assert_eq!(request.authorization, None);
    }
}

// ============================================================================
// Error classification
// ============================================================================

#[tokio::test]
async fn test_bad_login_is_invalid_credentials() {
    let backend = MockBackend::start().await;
    let err = client(&backend)
        .login(&LoginRequest {
            username_or_email: "admin".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("login should fail");

    assert!(matches!(err, ApiError::InvalidCredentials { .. }));
    assert!(!err.requires_logout());
    assert_eq!(err.toast_message(), "Invalid username or password");
}

#[tokio::test]
async fn test_good_login_returns_token_and_user() {
    let backend = MockBackend::start().await;
    let response = client(&backend)
        .login(&LoginRequest {
            username_or_email: "admin".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .expect("login");

    assert_eq!(response.token, ADMIN_TOKEN);
    assert!(response.user.is_admin());
}

#[tokio::test]
async fn test_rejected_token_forces_logout() {
    let backend = MockBackend::start().await;
    let err = client(&backend)
        .authorized("revoked")
        .verify_token()
        .await
        .expect_err("verify should fail");

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(err.requires_logout());
}

#[tokio::test]
async fn test_missing_order_is_not_found_with_backend_message() {
    let backend = MockBackend::start().await;
    let err = client(&backend)
        .authorized(ADMIN_TOKEN)
        .get_order(OrderId::new(404))
        .await
        .expect_err("order should be missing");

    assert!(err.is_not_found());
    assert_eq!(err.toast_message(), "Order not found");
}

#[tokio::test]
async fn test_refused_transition_carries_backend_reason() {
    let backend = MockBackend::start().await;
    let err = client(&backend)
        .authorized(ADMIN_TOKEN)
        .transition_order(OrderId::new(1), OrderAction::Ship, None)
        .await
        .expect_err("ship should be refused");

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.toast_message(), "Order must be paid before shipping");
    assert_eq!(backend.requests_to("/orders/1/ship").len(), 1);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let api = ApiClient::new(
        &url::Url::parse("http://127.0.0.1:9/api").expect("url"),
        Duration::from_secs(2),
    )
    .expect("build client");

    let err = api.verify_token().await.expect_err("nothing listens on port 9");
    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(err.status(), None);
}
