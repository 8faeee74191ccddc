use anyhow::Result;
use dashboard_service::{
    config::AppConfig,
    http::{self, AppState},
    metrics_server,
    observability,
    pipeline::Dashboard,
    store::StoreBackend,
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let store = StoreBackend::open(&cfg.store).await?;
    tracing::info!(
        store = ?cfg.store.kind,
        mode = ?cfg.simulation.mode,
        prediction = ?cfg.simulation.prediction,
        tariff_per_kwh = cfg.billing.tariff_per_kwh,
        poll_interval_secs = cfg.billing.poll_interval_secs,
        "dashboard configured"
    );

    let state = AppState::new(Dashboard::new(store, &cfg), &cfg);
    let app = http::router(state);

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dashboard listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
