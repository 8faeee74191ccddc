use rand::Rng;
use serde::Deserialize;

use crate::analytics::round_to;

/// Number of stored totals the moving average looks back over.
pub const MOVING_AVERAGE_WINDOW: usize = 5;

const JITTER_W: f64 = 150.0;
const MOVING_AVERAGE_JITTER_W: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Current power plus up to ±150 W of noise.
    Jitter,
    /// Mean of the last five stored totals plus up to ±50 W of noise.
    MovingAverage,
}

impl PredictionMode {
    /// How many stored totals `predict` needs to see.
    pub fn history_needed(self) -> usize {
        match self {
            PredictionMode::Jitter => 0,
            PredictionMode::MovingAverage => MOVING_AVERAGE_WINDOW,
        }
    }
}

/// Estimate next-tick power.
///
/// `history` holds stored totals, oldest first, read before the current tick
/// is appended. Only its last `MOVING_AVERAGE_WINDOW` values are used. An empty
/// history makes the moving average return exactly 0.
pub fn predict<R: Rng>(
    mode: PredictionMode,
    current_power_w: f64,
    history: &[f64],
    rng: &mut R,
) -> f64 {
    match mode {
        PredictionMode::Jitter => {
            round_to(current_power_w + rng.random_range(-JITTER_W..=JITTER_W), 2)
        }
        PredictionMode::MovingAverage => {
            if history.is_empty() {
                return 0.0;
            }
            let window = &history[history.len().saturating_sub(MOVING_AVERAGE_WINDOW)..];
            let mean = window.iter().sum::<f64>() / window.len() as f64;
            round_to(
                mean + rng.random_range(-MOVING_AVERAGE_JITTER_W..=MOVING_AVERAGE_JITTER_W),
                2,
            )
        }
    }
}
