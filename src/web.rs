use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit, response::Html, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::TripBotConfig;
use crate::gateway::{GeminiClient, ModelGateway};
use crate::router::SectionRouter;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Head room on top of the model timeout before the server gives up on a request
const REQUEST_GRACE_SECONDS: u64 = 10;

/// Wire the Gemini client, gateway and router from configuration
pub fn build_router(config: &TripBotConfig) -> Result<SectionRouter> {
    let client = GeminiClient::from_config(&config.gemini)?;
    if config.gemini.api_key.is_none() {
        tracing::warn!("No Gemini API key configured, every answer will be an error");
    }
    Ok(SectionRouter::new(ModelGateway::new(Arc::new(client))))
}

/// The full HTTP application: index page plus `/api`
pub fn app(router: SectionRouter, config: &TripBotConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let request_timeout =
        Duration::from_secs(u64::from(config.gemini.timeout_seconds) + REQUEST_GRACE_SECONDS);

    Router::new()
        .route("/", get(index))
        .nest("/api", api::router(AppState { router }))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.server.max_upload_bytes()))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn run(config: TripBotConfig) -> Result<()> {
    let router = build_router(&config)?;
    let app = app(router, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);

    if let (Some(cert), Some(key)) = (&config.server.tls_cert, &config.server.tls_key) {
        return serve_tls(app, &addr, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server stopped unexpectedly")
}

#[cfg(feature = "tls")]
async fn serve_tls(
    app: Router,
    addr: &str,
    cert: &std::path::Path,
    key: &std::path::Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    check_pem_certificates(cert)?;
    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .context("Failed to load TLS certificate or key")?;
    let addr: std::net::SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid listen address {addr}"))?;

    tracing::info!("Web server running at https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await
        .context("Web server stopped unexpectedly")
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(
    _app: Router,
    _addr: &str,
    _cert: &std::path::Path,
    _key: &std::path::Path,
) -> Result<()> {
    Err(crate::TripBotError::config(
        "HTTPS requested but TripBot was built without the `tls` feature",
    )
    .into())
}

/// Fail early with a readable message when the certificate file holds no certificates
#[cfg(feature = "tls")]
fn check_pem_certificates(path: &std::path::Path) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open certificate {}", path.display()))?;
    let mut reader = std::io::BufReader::new(file);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse certificate {}", path.display()))?;
    if certs.is_empty() {
        return Err(crate::TripBotError::config(format!(
            "No certificates found in {}",
            path.display()
        ))
        .into());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
