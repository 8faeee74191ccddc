pub mod analytics;
pub mod config;
pub mod errors;
pub mod export;
pub mod http;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod simulation;
pub mod store;

pub use pipeline::{Dashboard, Snapshot};
