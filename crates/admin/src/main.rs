//! Portell Winery admin - back-office for products and events.
//!
//! This binary serves the admin panel on port 3001.
//!
//! # Security
//!
//! Binds to 127.0.0.1 by default. Put it behind a private network or an
//! authenticating proxy; the login is a single configured account.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - `PostgreSQL` document tables behind the `portell-gateway` repositories
//! - Storage API for product and event images
//!
//! Migrations are NOT run on startup. Run them explicitly via
//! `cargo run -p portell-cli -- migrate`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use portell_admin::config::AdminConfig;
use portell_admin::middleware::create_session_layer;
use portell_admin::services::StaticCredentialAuthenticator;
use portell_admin::state::{AppState, build_storage};
use portell_gateway::{Gateway, create_pool};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start Sentry (when a DSN is configured) and install the tracing
/// subscriber. Keep the returned guard alive for the life of the process.
fn init_telemetry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config.sentry_environment.clone().map(Into::into),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                // Only the back-office user is ever attached.
                send_default_pii: true,
                ..Default::default()
            },
        ))
    });

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portell_admin=info,portell_gateway=info,tower_http=debug".into());

    // JSON lines on Fly.io, plain text elsewhere.
    let on_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = on_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!on_fly).then(tracing_subscriber::fmt::layer);

    let sentry_layer = sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_layer)
        .init();

    if guard.is_some() {
        tracing::info!("Sentry initialized");
    }
    guard
}

#[tokio::main]
async fn main() {
    let config = AdminConfig::from_env().expect("Failed to load configuration");
    let _sentry_guard = init_telemetry(&config);

    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    let storage = build_storage(config.storage.as_ref()).expect("Failed to configure storage");
    tracing::info!(uploads = storage.is_some(), "Database pool ready");

    let authenticator = Arc::new(StaticCredentialAuthenticator::new(&config.credentials));
    let session_layer = create_session_layer(&pool, &config);
    let state = AppState::new(
        config.clone(),
        Gateway::postgres(pool),
        authenticator,
        storage,
    );

    let app = portell_admin::app(state, session_layer)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("admin listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve on Ctrl+C or, on Unix, SIGTERM from the platform.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutting down admin");
}
