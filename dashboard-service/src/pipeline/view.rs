use power_client::domain::{format_clock, format_timestamp, Reading};
use serde::Serialize;

/// A reading as the dashboard client sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingView {
    pub id: i64,
    pub timestamp: String,
    pub time: String,
    pub total: f64,
    pub predicted: f64,
    pub energy: f64,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fridge: Option<f64>,
}

impl TryFrom<&Reading> for ReadingView {
    type Error = time::error::Format;

    fn try_from(r: &Reading) -> Result<Self, Self::Error> {
        Ok(ReadingView {
            id: r.id,
            timestamp: format_timestamp(r.ts)?,
            time: format_clock(r.ts)?,
            total: r.total_power_w,
            predicted: r.predicted_power_w,
            energy: r.energy_kwh,
            cost: r.cost,
            fan: r.devices.map(|d| d.fan_w),
            ac: r.devices.map(|d| d.ac_w),
            tv: r.devices.map(|d| d.tv_w),
            fridge: r.devices.map(|d| d.fridge_w),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use power_client::domain::DeviceLoads;
    use time::macros::datetime;

    fn reading(devices: Option<DeviceLoads>) -> Reading {
        Reading {
            id: 3,
            ts: datetime!(2024-02-01 14:05:09),
            total_power_w: 1500.0,
            predicted_power_w: 1480.25,
            energy_kwh: 0.000833,
            cost: 0.005,
            devices,
        }
    }

    #[test]
    fn whole_house_view_omits_device_fields() {
        let json = serde_json::to_value(ReadingView::try_from(&reading(None)).unwrap()).unwrap();
        assert_eq!(json["time"], "14:05:09");
        assert_eq!(json["timestamp"], "2024-02-01 14:05:09");
        assert_eq!(json["total"], 1500.0);
        assert!(json.get("fan").is_none());
        assert!(json.get("fridge").is_none());
    }

    #[test]
    fn per_device_view_carries_breakdown() {
        let devices = DeviceLoads {
            fan_w: 80.0,
            ac_w: 1000.0,
            tv_w: 120.0,
            fridge_w: 300.0,
        };
        let json = serde_json::to_value(ReadingView::try_from(&reading(Some(devices))).unwrap()).unwrap();
        assert_eq!(json["fan"], 80.0);
        assert_eq!(json["ac"], 1000.0);
        assert_eq!(json["tv"], 120.0);
        assert_eq!(json["fridge"], 300.0);
    }
}
