//! Event Management Platform Server
//!
//! Serves the platform REST APIs:
//! - Accounts: sign-up, login, token refresh, organizers, profile
//! - Catalog: topics and companies
//! - Events and registrations
//! - Health, readiness and Swagger UI
//!
//! Configuration is read from `EM_*` environment variables, see
//! [`em_platform::config`]. Log level comes from `RUST_LOG` (default `info`).

use std::sync::Arc;
use axum::{
    routing::get,
    response::Json,
    Router,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tokio::{signal, net::TcpListener};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use em_platform::api::{platform_router, PlatformApiDoc, PlatformServices};
use em_platform::config::{PlatformConfig, StorageBackend};
use em_platform::notification::{LogMailer, Mailer, NotificationQueue, NotificationWorker, SmtpMailer};
use em_platform::repository::{mongo::indexes::ensure_indexes, Repositories};
use em_platform::seed::DevDataSeeder;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Starting Event Management Platform Server");

    let config = PlatformConfig::from_env()?;

    // Storage
    let repos = match config.storage {
        StorageBackend::Mongo => {
            info!("Connecting to MongoDB: {}/{}", config.mongo_url, config.mongo_db);
            let mongo_client = mongodb::Client::with_uri_str(&config.mongo_url).await?;
            let db = mongo_client.database(&config.mongo_db);
            ensure_indexes(&db).await?;
            Repositories::mongo(&db)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Repositories::in_memory()
        }
    };

    // Email delivery
    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            info!("Sending email through SMTP relay {}:{}", smtp.host, smtp.port);
            Arc::new(SmtpMailer::new(smtp, &config.email_from)?)
        }
        None => {
            info!("EM_SMTP_HOST not set; emails will be logged");
            Arc::new(LogMailer)
        }
    };
    let (notifications, receiver) = NotificationQueue::channel();
    let worker_task = NotificationWorker::new(receiver, mailer).spawn();

    let services = PlatformServices::new(repos.clone(), &config, notifications);

    DevDataSeeder::new(repos, services.password_service.clone())
        .seed(&config)
        .await?;

    let app = platform_router(&services)
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        // OpenAPI / Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", PlatformApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Dropping the services closes the notification channel once the
    // server stops, which lets the worker drain and exit.
    drop(services);

    let api_addr = format!("0.0.0.0:{}", config.api_port);
    info!("API server listening on http://{}", api_addr);
    let api_listener = TcpListener::bind(&api_addr).await?;

    axum::serve(api_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped, draining notifications...");

    if let Err(e) = worker_task.await {
        tracing::error!("Notification worker failed: {}", e);
    }

    info!("Event Management Platform Server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn ready_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "READY"
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
