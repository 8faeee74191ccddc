use time::{macros::format_description, Date, PrimitiveDateTime};

/// Per-appliance power draw for one tick, in watts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceLoads {
    pub fan_w: f64,
    pub ac_w: f64,
    pub tv_w: f64,
    pub fridge_w: f64,
}

impl DeviceLoads {
    pub fn sum(&self) -> f64 {
        self.fan_w + self.ac_w + self.tv_w + self.fridge_w
    }
}

/// A tick's reading before the store has assigned it a sequence id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub ts: PrimitiveDateTime,
    pub total_power_w: f64,
    pub predicted_power_w: f64,
    pub energy_kwh: f64,
    pub cost: f64,
    pub devices: Option<DeviceLoads>,
}

impl NewReading {
    pub fn with_id(self, id: i64) -> Reading {
        Reading {
            id,
            ts: self.ts,
            total_power_w: self.total_power_w,
            predicted_power_w: self.predicted_power_w,
            energy_kwh: self.energy_kwh,
            cost: self.cost,
            devices: self.devices,
        }
    }
}

/// One stored tick. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: i64,
    pub ts: PrimitiveDateTime,
    pub total_power_w: f64,
    pub predicted_power_w: f64,
    pub energy_kwh: f64,
    pub cost: f64,
    pub devices: Option<DeviceLoads>,
}

/// `YYYY-MM-DD HH:MM:SS`, the stored and exported representation.
///
/// Lexicographic order of the output matches chronological order, which the
/// SQLite day-range query relies on.
pub fn format_timestamp(ts: PrimitiveDateTime) -> Result<String, time::error::Format> {
    ts.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
}

/// `HH:MM:SS`
pub fn format_clock(ts: PrimitiveDateTime) -> Result<String, time::error::Format> {
    ts.format(format_description!("[hour]:[minute]:[second]"))
}

/// `YYYY-MM-DD`
pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}

pub fn parse_timestamp(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(
        s.trim(),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
}

pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
}
