use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reelmatch_api::{
    api::{create_router, AppState, Limits},
    config::Config,
    services::{RecommendationEngine, TmdbCatalog, WatchlistStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Build the engine once, before serving any request
    let catalog = TmdbCatalog::from_config(&config).context("Failed to build TMDB client")?;
    let engine =
        RecommendationEngine::from_catalog(&catalog, config.max_pages, config.page_delay()).await;
    if engine.corpus_size() == 0 {
        tracing::warn!("Corpus is empty, every recommendation will be empty");
    }

    let state = AppState::new(
        engine,
        WatchlistStore::new(config.max_watchlist_users, config.max_watchlist_entries),
        Limits::from_config(&config),
    );
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid HOST/PORT")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
