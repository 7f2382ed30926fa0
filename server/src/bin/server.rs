use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use quill_core::{Dispatcher, UpstreamConfig};
use quill_server::{start_server, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // A missing .env is fine; the environment may already be populated
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    tracing::info!(target: "startup", dotenv_loaded, "Quill server starting");

    let upstream = UpstreamConfig::load();
    tracing::info!(
        target: "startup",
        api_key_present = upstream.has_usable_api_key(),
        base_url = %upstream.base_url,
        outline_model = %upstream.models.outline,
        timeout_ms = upstream.request_timeout_ms,
        "Upstream configured"
    );
    if !upstream.has_usable_api_key() {
        tracing::warn!(target: "startup", "OPENAI_API_KEY not set; generation requests will fail");
    }

    let dispatcher = Dispatcher::from_config(upstream)?;
    let config = ServerConfig::from_env();

    start_server(config, AppState::new(dispatcher)).await
}
