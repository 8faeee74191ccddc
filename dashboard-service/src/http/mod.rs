mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{config::AppConfig, pipeline::Dashboard, store::StoreBackend};

const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard<StoreBackend>>,
    pub index_html: Arc<str>,
    pub export_file_name: Arc<str>,
}

impl AppState {
    pub fn new(dashboard: Dashboard<StoreBackend>, cfg: &AppConfig) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            index_html: render_index(cfg).into(),
            export_file_name: cfg.export.file_name.as_str().into(),
        }
    }
}

/// Fill the dashboard page's poll interval and currency placeholders.
pub fn render_index(cfg: &AppConfig) -> String {
    let poll_ms = cfg.billing.poll_interval_secs.saturating_mul(1000);
    INDEX_TEMPLATE
        .replace("{{POLL_INTERVAL_MS}}", &poll_ms.to_string())
        .replace("{{CURRENCY}}", &cfg.billing.currency_symbol)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/data", get(routes::data))
        .route("/export", get(routes::export_csv))
        .route("/analytics/daily", get(routes::daily))
        .route("/health", get(routes::health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::StoreKind, store::MemoryStore};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let mut cfg = AppConfig::default();
        cfg.store.kind = StoreKind::Memory;
        let store = StoreBackend::Memory(MemoryStore::new(cfg.store.memory_capacity));
        router(AppState::new(Dashboard::new(store, &cfg), &cfg))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec();
        (status, headers, body)
    }

    #[tokio::test]
    async fn index_page_has_placeholders_filled() {
        let app = app();
        let (status, _, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("2000"));
        assert!(!html.contains("{{POLL_INTERVAL_MS}}"));
        assert!(!html.contains("{{CURRENCY}}"));
    }

    #[tokio::test]
    async fn data_returns_current_history_and_analytics() {
        let app = app();
        get(&app, "/data").await;
        let (status, _, body) = get(&app, "/data").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["current"]["id"], 2);
        assert_eq!(json["history"].as_array().unwrap().len(), 2);
        assert!(json["current"]["total"].as_f64().is_some());
        assert!(json["analytics"]["daily_energy"].as_f64().is_some());
        assert!(json["analytics"]["daily_cost"].as_f64().is_some());
        assert!(json["analytics"]["monthly_cost"].as_f64().is_some());
    }

    #[tokio::test]
    async fn export_has_header_plus_one_row_per_reading() {
        let app = app();
        for _ in 0..3 {
            get(&app, "/data").await;
        }

        let (status, headers, body) = get(&app, "/export").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
        assert!(headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("energy_readings.csv"));
        assert!(headers.contains_key(header::ETAG));

        let text = String::from_utf8(body).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID,Timestamp,Total Power,Energy,Cost,Fan,AC,TV,Fridge");
        assert!(lines[1].starts_with("1,"));
        assert!(lines[3].starts_with("3,"));
    }

    #[tokio::test]
    async fn daily_rejects_malformed_date() {
        let app = app();
        let (status, _, _) = get(&app, "/analytics/daily?date=not-a-date").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn daily_for_empty_day_is_zero() {
        let app = app();
        let (status, _, body) = get(&app, "/analytics/daily?date=2001-01-01").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["date"], "2001-01-01");
        assert_eq!(json["readings"], 0);
        assert_eq!(json["energy_kwh"], 0.0);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, _, body) = get(&app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }
}
