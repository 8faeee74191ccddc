//! Synthetic household readings.
//!
//! Everything here is a pure function of the random source handed in, so
//! tests drive it with a seeded `StdRng`.

mod predictor;

pub use predictor::{predict, PredictionMode, MOVING_AVERAGE_WINDOW};

use power_client::domain::DeviceLoads;
use rand::Rng;
use serde::Deserialize;

use crate::analytics::round_to;

pub const HOUSE_RANGE_W: (f64, f64) = (500.0, 3000.0);
pub const FAN_RANGE_W: (f64, f64) = (60.0, 100.0);
pub const AC_RANGE_W: (f64, f64) = (800.0, 1500.0);
pub const TV_RANGE_W: (f64, f64) = (80.0, 200.0);
pub const FRIDGE_RANGE_W: (f64, f64) = (150.0, 300.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// One draw for the whole house.
    WholeHouse,
    /// Fan, AC, TV and fridge drawn separately and summed.
    PerDevice,
}

/// Power drawn during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub total_power_w: f64,
    pub devices: Option<DeviceLoads>,
}

fn draw<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    rng.random_range(lo..=hi)
}

pub fn generate<R: Rng>(mode: SimulationMode, rng: &mut R) -> Sample {
    match mode {
        SimulationMode::WholeHouse => Sample {
            total_power_w: round_to(draw(rng, HOUSE_RANGE_W), 2),
            devices: None,
        },
        SimulationMode::PerDevice => {
            let devices = DeviceLoads {
                fan_w: round_to(draw(rng, FAN_RANGE_W), 2),
                ac_w: round_to(draw(rng, AC_RANGE_W), 2),
                tv_w: round_to(draw(rng, TV_RANGE_W), 2),
                fridge_w: round_to(draw(rng, FRIDGE_RANGE_W), 2),
            };
            Sample {
                total_power_w: round_to(devices.sum(), 2),
                devices: Some(devices),
            }
        }
    }
}
