mod api_client;
mod chart;
mod config;
mod indicators;
mod models;
mod routes;
mod services;
mod signals;
mod state;

use anyhow::Context;
use api_client::ApiClient;
use config::Config;
use services::analysis_service::{self, AnalysisParams};
use state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.log_summary();

    // 1. Data acquisition: one fetch, no retry
    let api_client = ApiClient::new(&config.provider).context("Failed to build HTTP client")?;
    let prices = api_client
        .fetch_daily_history(&config.ticker, config.lookback)
        .await
        .with_context(|| format!("Price history unavailable for {}", config.ticker))?;

    info!(
        "Fetched {} daily bars for {} ({} to {})",
        prices.len(),
        prices.ticker,
        prices.first_date().map(|d| d.to_string()).unwrap_or_default(),
        prices.last_date().map(|d| d.to_string()).unwrap_or_default()
    );

    // 2-3. Indicators and signals
    let params = AnalysisParams::from(&config);
    let analysis = analysis_service::analyze(prices, &params);
    analysis_service::log_latest(&analysis);

    // 4. Render and serve until interrupted
    let figure = chart::build_figure(&analysis, &config.chart, &params);
    let app = routes::router(AppState::new(analysis, figure), &config.chart.static_dir);

    let listener = tokio::net::TcpListener::bind(config.chart.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.chart.bind_addr))?;
    info!(
        "Chart available at http://{} (Ctrl-C to exit)",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Chart server failed")?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
}
