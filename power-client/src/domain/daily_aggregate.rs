use time::Date;

use super::Reading;

/// Energy and cost summed over every reading captured on one calendar day.
///
/// Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DailyAggregate {
    pub date: Date,
    pub energy_kwh: f64,
    pub cost: f64,
    pub readings: usize,
}

impl DailyAggregate {
    /// Sums `readings` without filtering; callers pass the rows for `date`.
    pub fn from_readings(date: Date, readings: &[Reading]) -> Self {
        Self {
            date,
            energy_kwh: readings.iter().fold(0.0, |acc, r| acc + r.energy_kwh),
            cost: readings.iter().fold(0.0, |acc, r| acc + r.cost),
            readings: readings.len(),
        }
    }
}
