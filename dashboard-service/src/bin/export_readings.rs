use anyhow::{bail, Result};
use dashboard_service::{
    config::{AppConfig, StoreKind},
    export,
    observability,
    store::{ReadingStore, StoreBackend},
};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: export_readings <output_csv_path>");
    }
    let out_path = &args[1];

    // Load configuration (can point DASHBOARD_CONFIG at the server's file).
    let cfg = AppConfig::load()?;
    if cfg.store.kind == StoreKind::Memory {
        bail!("store.kind is memory; there is nothing persisted to export");
    }

    let store = StoreBackend::open(&cfg.store).await?;
    let readings = store.all().await?;
    let body = export::readings_to_csv(&readings)?;
    std::fs::write(out_path, &body)?;

    tracing::info!(
        rows = readings.len(),
        bytes = body.len(),
        path = %out_path,
        "readings exported"
    );

    Ok(())
}
