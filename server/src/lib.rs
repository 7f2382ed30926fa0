//! Quill server: the writer front-end's HTTP API.
//!
//! Each request is independent. The only shared state is the dispatcher, which
//! holds read-only configuration and a pooled HTTP client.

pub mod config;
pub mod error;
pub mod models;
mod routes;

use axum::http::{HeaderValue, Request};
use axum::Router;
use quill_core::Dispatcher;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Router with CORS and request tracing applied
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path()
                )
            }),
        )
        .layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(target: "startup", origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // Credentials rule out wildcards, so methods and headers are mirrored
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Bind and serve until the process stops
pub async fn start_server(
    config: ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(target: "startup", origins = ?config.cors_origins, "CORS configured");
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(
        target: "startup",
        url = %format!("http://{}", config.bind_addr),
        "Quill server ready to accept requests"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
