//! Rasoi POS API — assistant REST server.
//!
//! Exposes the natural-language assistant endpoints (parse, confirm,
//! cancel) over the POS data store.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use rasoi_assistant::{AssistantConfig, GeminiConfig};
use rasoi_pos_api::config::ApiConfig;
use rasoi_pos_api::state::AppState;
use rasoi_pos_api::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rasoi-pos-api starting");

    let config = ApiConfig::from_env();
    let gemini = GeminiConfig::from_env();
    if gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set — assistant fallback runs degraded");
    }

    // Connect to PostgreSQL if DATABASE_URL is set, otherwise use in-memory
    // state with a sample menu.
    let state = if let Ok(database_url) = std::env::var("DATABASE_URL") {
        tracing::info!("connecting to PostgreSQL");
        let pool = db::connect(&database_url).await?;
        AppState::with_pool(pool, gemini, AssistantConfig::from_env())
    } else {
        tracing::warn!("DATABASE_URL not set — using in-memory state with sample data");
        AppState::with_sample_data()
    };

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
