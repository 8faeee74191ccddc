use serde::Deserialize;
use std::{fs, path::Path};

use crate::simulation::{PredictionMode, SimulationMode};

const DEFAULT_CONFIG_PATH: &str = "dashboard-config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub tariff_per_kwh: f64,
    pub poll_interval_secs: u64,
    pub currency_symbol: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            tariff_per_kwh: 6.0,
            poll_interval_secs: 2,
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub mode: SimulationMode,
    pub prediction: PredictionMode,
    pub history_len: usize,
    /// Offset of the dashboard's wall clock from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::WholeHouse,
            prediction: PredictionMode::Jitter,
            history_len: 10,
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub path: String,
    pub memory_capacity: usize,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Sqlite,
            path: "energy_data.db".to_string(),
            memory_capacity: 1000,
            max_connections: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "energy_readings.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub billing: BillingConfig,
    pub simulation: SimulationConfig,
    pub store: StoreConfig,
    pub export: ExportConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from `DASHBOARD_CONFIG`, or `dashboard-config.toml` when it exists.
    ///
    /// With neither present the built-in defaults apply.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        match env::var("DASHBOARD_CONFIG") {
            Ok(path) => Self::from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            Err(_) => {
                tracing::info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        Self::from_toml(&contents).map_err(|e| anyhow::anyhow!("invalid config '{path}': {e}"))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would make every tick meaningless.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.billing.poll_interval_secs == 0 {
            anyhow::bail!("billing.poll_interval_secs must be at least 1");
        }
        if !self.billing.tariff_per_kwh.is_finite() || self.billing.tariff_per_kwh < 0.0 {
            anyhow::bail!("billing.tariff_per_kwh must be a non-negative number");
        }
        Ok(())
    }
}
