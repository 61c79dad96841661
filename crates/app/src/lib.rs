//! Parley application composition root
//!
//! Composes the domain routers with shared infrastructure routes and the
//! HTTP middleware stack.

use std::any::Any;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use parley_common::{config::Config, ApiResponse};
use parley_conversations::ConversationsState;
use serde::Serialize;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

/// Hardening headers added to every response that does not set its own
const SECURITY_HEADERS: [(HeaderName, &str); 12] = [
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("cross-origin-resource-policy"),
        "cross-origin",
    ),
    (HeaderName::from_static("origin-agent-cluster"), "?1"),
    (header::REFERRER_POLICY, "no-referrer"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains",
    ),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (HeaderName::from_static("x-download-options"), "noopen"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        "none",
    ),
    (header::X_XSS_PROTECTION, "0"),
];

/// Shared state of the infrastructure routes
#[derive(Clone)]
struct AppInfo {
    environment: String,
}

/// Create the main application router with all routes and middleware
pub fn create_app(config: &Config, pool: SqlitePool) -> Result<Router, anyhow::Error> {
    let conversations_state = ConversationsState::new(pool);
    let cors = build_cors_layer(&config.cors_allowed_origins)?;

    let infra = Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { concat!("Parley API v", env!("CARGO_PKG_VERSION")) }))
        .with_state(AppInfo {
            environment: config.environment.clone(),
        });

    // Build router: compose domain routers with shared infrastructure routes
    let mut app = Router::new()
        .merge(infra)
        .merge(parley_conversations::routes().with_state(conversations_state))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors)
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(config.body_limit_bytes))
                .into_inner(),
        );

    for (name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }

    Ok(app)
}

/// CORS restricted to the configured origins, with credentials
pub fn build_cors_layer(origins: &[String]) -> Result<CorsLayer, anyhow::Error> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
    environment: String,
}

/// Health check endpoint
async fn health_check(State(info): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running",
        timestamp: Utc::now(),
        environment: info.environment,
    })
}

async fn route_not_found(method: Method, uri: Uri) -> Response {
    let message = format!("Route {} {} not found", method, uri);
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(message, Vec::new())),
    )
        .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure("Internal server error", Vec::new())),
    )
        .into_response()
}
