mod daily;
mod energy;

pub use daily::{summarize_day, DailyAnalytics, PROJECTION_DAYS};
pub use energy::{interval_energy, EnergyCost};

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
