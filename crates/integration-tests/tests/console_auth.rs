//! Login, logout, and the auth guards, driven through the console.

use orderdesk_integration_tests::{
    MockBackend, TestConsole, browser, location, login, page,
};

// ============================================================================
// Guard
// ============================================================================

#[tokio::test]
async fn test_guard_redirects_with_return_url_without_calling_backend() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    let response = client
        .get(console.at("/orders?status=paid"))
        .send()
        .await
        .expect("request orders");

    assert!(response.status().is_redirection());
    assert_eq!(
        location(&response),
        "/auth/login?returnUrl=%2Forders%3Fstatus%3Dpaid"
    );
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_guard_keeps_nested_detail_path() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;

    for (path, expected) in [
        ("/orders/5", "/auth/login?returnUrl=%2Forders%2F5"),
        ("/customers/7/edit", "/auth/login?returnUrl=%2Fcustomers%2F7%2Fedit"),
        ("/reports/list?page=2", "/auth/login?returnUrl=%2Freports%2Flist%3Fpage%3D2"),
    ] {
        let response = browser()
            .get(console.at(path))
            .send()
            .await
            .expect("request guarded page");
        assert_eq!(location(&response), expected, "return target for {path}");
    }
}

#[tokio::test]
async fn test_post_without_session_does_not_remember_target() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;

    let response = browser()
        .post(console.at("/orders/1/confirm"))
        .send()
        .await
        .expect("post action");

    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_health_and_login_page_are_public() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    let (status, body) = page(&client, &console, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");

    let (status, body) = page(&client, &console, "/auth/login?returnUrl=%2Forders").await;
    assert_eq!(status, 200);
    assert!(body.contains(r#"name="returnUrl" value="/orders""#));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_returns_to_requested_page() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    let target = login(&client, &console, "admin", Some("/orders")).await;
    assert_eq!(target, "/orders");

    let (status, body) = page(&client, &console, "/orders").await;
    assert_eq!(status, 200);
    assert!(body.contains("Welcome back, admin!"));
    assert!(body.contains("Ada Lovelace"));
}

#[tokio::test]
async fn test_login_ignores_foreign_return_url() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;

    let target = login(&browser(), &console, "admin", Some("//evil.example/steal")).await;
    assert_eq!(target, "/dashboard");
}

#[tokio::test]
async fn test_wrong_password_rerenders_with_backend_message() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;

    let response = browser()
        .post(console.at("/auth/login"))
        .form(&[("username", "admin"), ("password", "nope-nope")])
        .send()
        .await
        .expect("submit login");

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("Invalid username or password"));
    assert!(!body.contains("nope-nope"));
}

#[tokio::test]
async fn test_login_validation_skips_backend() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;

    let response = browser()
        .post(console.at("/auth/login"))
        .form(&[("username", ""), ("password", "")])
        .send()
        .await
        .expect("submit login");

    let body = response.text().await.expect("body");
    assert!(body.contains("field-error"));
    assert!(backend.requests_to("/users/login").is_empty());
}

// ============================================================================
// Token lifecycle
// ============================================================================

#[tokio::test]
async fn test_verified_token_is_cached() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    login(&client, &console, "admin", None).await;
    page(&client, &console, "/orders").await;
    page(&client, &console, "/orders").await;

    // Login primes the cache, so neither page load verifies again.
    assert!(backend.requests_to("/users/verify").is_empty());
}

#[tokio::test]
async fn test_rejected_token_clears_session() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start_with(&backend, |config| {
        config.verify_cache_ttl = std::time::Duration::ZERO;
    })
    .await;
    let client = browser();

    login(&client, &console, "stale", None).await;

    let response = client
        .get(console.at("/orders"))
        .send()
        .await
        .expect("load orders");
    assert_eq!(location(&response), "/auth/login?returnUrl=%2Forders");
    assert_eq!(backend.requests_to("/users/verify").len(), 1);

    // The token is gone: the next request is turned away without a backend call.
    let response = client
        .get(console.at("/dashboard"))
        .send()
        .await
        .expect("load dashboard");
    assert!(response.status().is_redirection());
    assert_eq!(backend.requests_to("/users/verify").len(), 1);
}

#[tokio::test]
async fn test_logout_clears_session_and_tells_backend() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    login(&client, &console, "admin", None).await;
    let response = client
        .post(console.at("/auth/logout"))
        .send()
        .await
        .expect("logout");
    assert_eq!(location(&response), "/auth/login");

    let logout_calls = backend.requests_to("/users/logout");
    assert_eq!(logout_calls.len(), 1);
    assert_eq!(
        logout_calls[0].authorization.as_deref(),
        Some("Bearer token-admin")
    );

    let (_, body) = page(&client, &console, "/auth/login").await;
    assert!(body.contains("You have been logged out."));

    let response = client
        .get(console.at("/orders"))
        .send()
        .await
        .expect("load orders");
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn test_logout_drops_toasts_meant_for_the_signed_out_user() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    login(&client, &console, "admin", None).await;
    let response = client
        .post(console.at("/orders/1/cancel"))
        .form(&[("payment_method", "")])
        .send()
        .await
        .expect("cancel order");
    assert!(response.status().is_redirection());

    client
        .post(console.at("/auth/logout"))
        .send()
        .await
        .expect("logout");

    let (_, body) = page(&client, &console, "/auth/login").await;
    assert!(body.contains("You have been logged out."));
    assert!(!body.contains("Order cancelled successfully!"));
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_non_admin_is_kept_out_of_user_management() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    login(&client, &console, "clerk", None).await;

    let response = client
        .get(console.at("/users"))
        .send()
        .await
        .expect("load users");
    assert_eq!(location(&response), "/dashboard");

    let (_, body) = page(&client, &console, "/dashboard").await;
    assert!(body.contains("Only administrators can manage users."));
    assert!(!body.contains(r#"href="/users""#));
}

#[tokio::test]
async fn test_refused_token_while_creating_user_logs_admin_out() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    login(&client, &console, "admin", None).await;

    let response = client
        .post(console.at("/users/new"))
        .form(&[
            ("username", "expired"),
            ("email", "expired@orderdesk.test"),
            ("password", "secret123"),
            ("confirm_password", "secret123"),
            ("role", "user"),
        ])
        .send()
        .await
        .expect("submit new user");
    assert_eq!(location(&response), "/auth/login");

    let (_, body) = page(&client, &console, "/auth/login").await;
    assert!(body.contains("Session expired. Please login again."));

    let response = client
        .get(console.at("/dashboard"))
        .send()
        .await
        .expect("load dashboard");
    assert_eq!(
        location(&response),
        "/auth/login?returnUrl=%2Fdashboard"
    );
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_rejection_shows_backend_reason() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;

    let response = browser()
        .post(console.at("/auth/signup"))
        .form(&[
            ("username", "taken"),
            ("email", "taken@orderdesk.test"),
            ("password", "secret123"),
            ("confirm_password", "secret123"),
        ])
        .send()
        .await
        .expect("submit signup");

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("Username already exists"));
}

#[tokio::test]
async fn test_signup_success_goes_to_login() {
    let backend = MockBackend::start().await;
    let console = TestConsole::start(&backend).await;
    let client = browser();

    let response = client
        .post(console.at("/auth/signup"))
        .form(&[
            ("username", "newbie"),
            ("email", "newbie@orderdesk.test"),
            ("password", "secret123"),
            ("confirm_password", "secret123"),
        ])
        .send()
        .await
        .expect("submit signup");

    assert_eq!(location(&response), "/auth/login");
    let (_, body) = page(&client, &console, "/auth/login").await;
    assert!(body.contains("Registration successful. Please sign in."));
}
