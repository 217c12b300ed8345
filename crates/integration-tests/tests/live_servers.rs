//! Smoke tests against running servers.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`portell-cli migrate`)
//! - The storefront running (`cargo run -p portell-storefront`)
//! - The admin running (`cargo run -p portell-admin`)
//!
//! Run with: `cargo test -p portell-integration-tests -- --ignored`

use reqwest::{Client, StatusCode, redirect::Policy};

/// Base URL for the storefront (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client that keeps cookies and does not follow redirects.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_health_endpoints() {
    let client = client();
    for base_url in [storefront_base_url(), admin_base_url()] {
        let resp = client
            .get(format!("{base_url}/health/ready"))
            .send()
            .await
            .expect("Failed to reach server");
        assert_eq!(resp.status(), StatusCode::OK, "{base_url}");
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_language_cookie_round_trip() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/language"))
        .form(&[("lang", "en")])
        .send()
        .await
        .expect("Failed to switch language");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to load home page")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains("<html lang=\"en\">"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_admin_redirects_anonymous_visitors() {
    let resp = client()
        .get(format!("{}/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach admin");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login");
}
