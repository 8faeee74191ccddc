mod daily_aggregate;
mod reading;

pub use daily_aggregate::DailyAggregate;
pub use reading::{
    format_clock, format_date, format_timestamp, parse_date, parse_timestamp, DeviceLoads,
    NewReading, Reading,
};
