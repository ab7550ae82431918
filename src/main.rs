use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plan_exporter::{
    app,
    config::Config,
    services::{metrics::PlanMetricsCollector, plan_api::PlanApiClient},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    if config.username.is_empty() {
        tracing::warn!("No username configured; upstream requests will be rejected");
    }

    let api = PlanApiClient::new(&config)?;
    info!("Polling {} on every scrape", api.url());

    let state = AppState {
        collector: PlanMetricsCollector::new(api, config.username.clone()),
    };

    let listener = tokio::net::TcpListener::bind(config.listen_address)
        .await
        .with_context(|| format!("binding {}", config.listen_address))?;
    info!("plan-exporter listening on {}", config.listen_address);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
