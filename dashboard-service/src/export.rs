use power_client::domain::{format_timestamp, Reading};

use crate::errors::DashboardError;

pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Timestamp",
    "Total Power",
    "Energy",
    "Cost",
    "Fan",
    "AC",
    "TV",
    "Fridge",
];

fn opt_cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Serialize `readings` as CSV, one header row then one row per reading in
/// the order given. Device columns are empty for whole-house readings.
pub fn readings_to_csv(readings: &[Reading]) -> Result<Vec<u8>, DashboardError> {
    let mut wtr = csv::Writer::from_writer(Vec::with_capacity(readings.len().saturating_mul(64)));
    wtr.write_record(CSV_HEADER)?;

    for r in readings {
        let d = r.devices;
        wtr.write_record([
            r.id.to_string(),
            format_timestamp(r.ts)?,
            r.total_power_w.to_string(),
            r.energy_kwh.to_string(),
            r.cost.to_string(),
            opt_cell(d.map(|d| d.fan_w)),
            opt_cell(d.map(|d| d.ac_w)),
            opt_cell(d.map(|d| d.tv_w)),
            opt_cell(d.map(|d| d.fridge_w)),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| DashboardError::Csv(csv::Error::from(e.into_error())))
}

/// Strong ETag for an export body.
pub fn etag(body: &[u8]) -> String {
    format!("\"{}\"", blake3::hash(body).to_hex())
}
