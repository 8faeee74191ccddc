use power_client::domain::DailyAggregate;
use serde::Serialize;

use super::round_to;

/// Days the monthly projection multiplies the day-to-date cost by.
///
/// This is a flat linear extrapolation, not a calendar-aware month-to-date
/// figure.
pub const PROJECTION_DAYS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyAnalytics {
    pub daily_energy: f64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
}

/// Round a day's totals for display and project the month from them.
///
/// The projection uses the already-rounded daily cost.
pub fn summarize_day(aggregate: &DailyAggregate) -> DailyAnalytics {
    let daily_cost = round_to(aggregate.cost, 2);
    DailyAnalytics {
        daily_energy: round_to(aggregate.energy_kwh, 4),
        daily_cost,
        monthly_cost: round_to(daily_cost * PROJECTION_DAYS, 2),
    }
}
