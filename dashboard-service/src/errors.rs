use axum::{http::StatusCode, response::IntoResponse};

use crate::store::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("csv export error: {0}")]
    Csv(#[from] csv::Error),
    #[error("timestamp formatting error: {0}")]
    Format(#[from] time::error::Format),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> axum::response::Response {
        match self {
            DashboardError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            DashboardError::Store(e) => {
                tracing::error!(error = %e, "request failed on store access");
                metrics::counter!("store_errors_total").increment(1);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            DashboardError::Csv(e) => {
                tracing::error!(error = %e, "csv export failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            DashboardError::Format(e) => {
                tracing::error!(error = %e, "timestamp formatting failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
