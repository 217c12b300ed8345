//! Portell Winery storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` only loads
//! configuration, connects to `PostgreSQL` and serves [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory static assets are served from, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(sessions)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the data store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.gateway().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, header};
    use chrono::{NaiveDate, NaiveTime};
    use portell_core::models::{Event, Product};
    use portell_core::{EventType, ProductCategory};
    use portell_gateway::Gateway;
    use portell_gateway::mailer::{DisabledMailer, Mailer, RecordingMailer};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::middleware::session_layer;

    fn router(gateway: Gateway, mailer: Arc<dyn Mailer>) -> Router {
        let state = AppState::new(StorefrontConfig::local(), gateway, mailer);
        app(state, session_layer(tower_sessions::MemoryStore::default(), false))
    }

    fn regent() -> Product {
        Product {
            name: "Regent 2021".to_owned(),
            name_en: String::new(),
            slug: "regent-2021".to_owned(),
            description: "Czerwone wytrawne".to_owned(),
            description_en: "Dry red".to_owned(),
            price: Decimal::new(60, 0),
            category: ProductCategory::Red,
            wine_type: "wytrawne".to_owned(),
            vintage: Some(2021),
            grape_variety: "Regent".to_owned(),
            image_url: String::new(),
            stock: 12,
            active: true,
            featured: true,
        }
    }

    fn tasting() -> Event {
        Event {
            title: "Degustacja win".to_owned(),
            title_en: "Wine tasting".to_owned(),
            slug: "degustacja".to_owned(),
            description: "Pięć win z naszej winnicy".to_owned(),
            description_en: String::new(),
            date: NaiveDate::from_ymd_opt(2031, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration: "2 hours".to_owned(),
            location: "Winnica Portell".to_owned(),
            address: "ul. Winna 123".to_owned(),
            price: Decimal::new(150, 0),
            capacity: 10,
            booked_count: 0,
            image_url: String::new(),
            event_type: EventType::Tasting,
            active: true,
        }
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (gateway, _) = Gateway::in_memory();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");

        let response = app.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_home_lists_featured_wine_and_event() {
        let (gateway, _) = Gateway::in_memory();
        gateway.products.create(&regent()).await.unwrap();
        gateway.events.create(&tasting()).await.unwrap();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let html = body_text(response).await;
        assert!(html.contains("<html lang=\"pl\">"));
        assert!(html.contains("Regent 2021"));
        assert!(html.contains("Degustacja win"));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let (gateway, _) = Gateway::in_memory();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app.clone().oneshot(get("/events/not-an-id")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let uri = format!("/shop/{}", portell_core::ProductId::new());
        let response = app.oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_inactive_event_is_hidden() {
        let (gateway, _) = Gateway::in_memory();
        let record = gateway
            .events
            .create(&Event {
                active: false,
                ..tasting()
            })
            .await
            .unwrap();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app
            .clone()
            .oneshot(get(&format!("/events/{}", record.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let html = body_text(app.oneshot(get("/events")).await.unwrap()).await;
        assert!(!html.contains("Degustacja win"));
    }

    #[tokio::test]
    async fn test_event_calendar_download() {
        let (gateway, _) = Gateway::in_memory();
        let record = gateway.events.create(&tasting()).await.unwrap();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app
            .oneshot(get(&format!("/events/{}/calendar.ics", record.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/calendar; charset=utf-8"
        );
        let ics = body_text(response).await;
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.contains("DTSTART:20310601T180000"));
    }

    #[tokio::test]
    async fn test_language_switch_triggers_event_and_redirects_back() {
        let (gateway, _) = Gateway::in_memory();
        let app = router(gateway, Arc::new(DisabledMailer));

        let mut request = post_form("/language", "lang=en");
        request
            .headers_mut()
            .insert(header::REFERER, "http://localhost:3000/events".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/events");
        assert_eq!(response.headers()["HX-Trigger"], "language-changed");
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_unknown_language_is_rejected() {
        let (gateway, _) = Gateway::in_memory();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app.oneshot(post_form("/language", "lang=de")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_send_email_preflight_and_method() {
        let (gateway, _) = Gateway::in_memory();
        let app = router(gateway, Arc::new(DisabledMailer));

        let preflight = Request::builder()
            .method("OPTIONS")
            .uri("/api/send-email")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(preflight).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "POST, OPTIONS"
        );

        let response = app.oneshot(get("/api/send-email")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_text(response).await,
            r#"{"error":"Method not allowed"}"#
        );
    }

    #[tokio::test]
    async fn test_send_email_without_provider_is_server_error() {
        let (gateway, _) = Gateway::in_memory();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app
            .oneshot(post_json(
                "/api/send-email",
                r#"{"to":"anna@example.com","subject":"Hi","html":"<p>Hi</p>"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_send_email_delivers_and_validates() {
        let (gateway, _) = Gateway::in_memory();
        let mailer = Arc::new(RecordingMailer::new());
        let app = router(gateway, Arc::clone(&mailer) as Arc<dyn Mailer>);

        let response = app
            .clone()
            .oneshot(post_json("/api/send-email", r#"{"subject":"Hi"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/send-email",
                r#"{"to":["anna@example.com","jan@example.com"],"subject":"Hi","html":"<p>Hi</p>"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], "recorded-1");

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.len(), 2);

        mailer.fail_with("domain not verified").await;
        let response = app
            .oneshot(post_json(
                "/api/send-email",
                r#"{"to":"anna@example.com","subject":"Hi","html":"<p>Hi</p>"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["details"], "domain not verified");
    }

    #[tokio::test]
    async fn test_contact_form_emails_inbox_and_sender() {
        let (gateway, _) = Gateway::in_memory();
        let mailer = Arc::new(RecordingMailer::new());
        let app = router(gateway, Arc::clone(&mailer) as Arc<dyn Mailer>);

        let response = app
            .oneshot(post_form(
                "/contact",
                "name=Anna+Nowak&email=anna%40example.com&subject=Pytanie&message=Czy+macie+Regenta%3F",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Dziękujemy!"));

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["contact@portell.wine".to_owned()]);
        assert_eq!(sent[0].reply_to.as_deref(), Some("anna@example.com"));
        assert_eq!(sent[0].subject, "Kontakt: Pytanie");
        assert_eq!(sent[1].to, vec!["anna@example.com".to_owned()]);
        assert_eq!(sent[1].subject, "Dziękujemy za kontakt");
    }

    #[tokio::test]
    async fn test_newsletter_fragment() {
        let (gateway, _) = Gateway::in_memory();
        let mailer = Arc::new(RecordingMailer::new());
        let app = router(gateway, Arc::clone(&mailer) as Arc<dyn Mailer>);

        let html = body_text(
            app.clone()
                .oneshot(post_form("/newsletter", "email=nope"))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Podaj poprawny adres email"));
        assert!(mailer.sent().await.is_empty());

        let html = body_text(
            app.oneshot(post_form("/newsletter", "email=anna%40example.com"))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Dziękujemy za zapis!"));
        assert_eq!(mailer.sent().await[0].subject, "Witaj w Portell!");
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_redirects_to_cart() {
        let (gateway, _) = Gateway::in_memory();
        let app = router(gateway, Arc::new(DisabledMailer));

        let response = app.oneshot(get("/checkout?type=product")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/cart");
    }
}
