use super::round_to;

const WATT_SECONDS_PER_KWH: f64 = 1000.0 * 3600.0;

/// Energy and cost attributed to a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyCost {
    /// kWh, rounded to 6 places.
    pub energy_kwh: f64,
    /// Currency units, rounded to 4 places.
    pub cost: f64,
}

/// Convert a steady draw held for `interval_secs` into energy and cost.
///
/// Cost is computed from the unrounded energy and rounded on its own.
pub fn interval_energy(total_power_w: f64, interval_secs: u64, tariff_per_kwh: f64) -> EnergyCost {
    let energy_kwh = total_power_w * interval_secs as f64 / WATT_SECONDS_PER_KWH;
    EnergyCost {
        energy_kwh: round_to(energy_kwh, 6),
        cost: round_to(energy_kwh * tariff_per_kwh, 4),
    }
}
