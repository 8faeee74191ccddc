use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use power_client::domain::{parse_date, DailyAggregate};
use serde::Deserialize;

use super::AppState;
use crate::{errors::DashboardError, export, pipeline::Snapshot, store::ReadingStore};

pub(super) async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

pub(super) async fn data(State(state): State<AppState>) -> Result<Json<Snapshot>, DashboardError> {
    let snapshot = state.dashboard.tick().await?;
    Ok(Json(snapshot))
}

pub(super) async fn export_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DashboardError> {
    let readings = state.dashboard.store().all().await?;
    let body = export::readings_to_csv(&readings)?;

    metrics::counter!("csv_exports_total").increment(1);
    metrics::counter!("csv_export_rows_total").increment(readings.len() as u64);
    tracing::info!(rows = readings.len(), bytes = body.len(), "csv export served");

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.export_file_name),
        ),
        (header::ETAG, export::etag(&body)),
    ];
    Ok((headers, body))
}

#[derive(Debug, Deserialize)]
pub(super) struct DailyQuery {
    date: Option<String>,
}

pub(super) async fn daily(
    State(state): State<AppState>,
    Query(params): Query<DailyQuery>,
) -> Result<Json<DailyAggregate>, DashboardError> {
    let date = match params.date.as_deref() {
        Some(s) => parse_date(s)
            .map_err(|e| DashboardError::BadRequest(format!("invalid date '{s}': {e}")))?,
        None => state.dashboard.today(),
    };

    let aggregate = state.dashboard.daily_aggregate(date).await?;
    Ok(Json(aggregate))
}

pub(super) async fn health() -> &'static str {
    "OK"
}
