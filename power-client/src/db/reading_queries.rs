use sqlx::SqlitePool;
use time::{Date, Duration};

use crate::domain::{format_date, format_timestamp, parse_timestamp, DeviceLoads, NewReading, Reading};
use crate::ClientError;

const READING_COLUMNS: &str =
    "id, ts, total_power_w, predicted_power_w, energy_kwh, cost, fan_w, ac_w, tv_w, fridge_w";

#[derive(Debug, Clone, sqlx::FromRow)]
struct ReadingRow {
    id: i64,
    ts: String,
    total_power_w: f64,
    predicted_power_w: f64,
    energy_kwh: f64,
    cost: f64,
    fan_w: Option<f64>,
    ac_w: Option<f64>,
    tv_w: Option<f64>,
    fridge_w: Option<f64>,
}

impl TryFrom<ReadingRow> for Reading {
    type Error = ClientError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        let ts = parse_timestamp(&row.ts).map_err(|source| ClientError::Timestamp {
            value: row.ts.clone(),
            source,
        })?;

        // Breakdown is all-or-nothing; a partial row is treated as whole-house.
        let devices = match (row.fan_w, row.ac_w, row.tv_w, row.fridge_w) {
            (Some(fan_w), Some(ac_w), Some(tv_w), Some(fridge_w)) => Some(DeviceLoads {
                fan_w,
                ac_w,
                tv_w,
                fridge_w,
            }),
            _ => None,
        };

        Ok(Reading {
            id: row.id,
            ts,
            total_power_w: row.total_power_w,
            predicted_power_w: row.predicted_power_w,
            energy_kwh: row.energy_kwh,
            cost: row.cost,
            devices,
        })
    }
}

fn into_readings(rows: Vec<ReadingRow>) -> Result<Vec<Reading>, ClientError> {
    rows.into_iter().map(Reading::try_from).collect()
}

/// Create the `readings` table and its timestamp index if they do not exist.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), ClientError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            ts                TEXT    NOT NULL,
            total_power_w     REAL    NOT NULL,
            predicted_power_w REAL    NOT NULL,
            energy_kwh        REAL    NOT NULL,
            cost              REAL    NOT NULL,
            fan_w             REAL,
            ac_w              REAL,
            tv_w              REAL,
            fridge_w          REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS readings_ts_idx ON readings (ts)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert one reading and return the id SQLite assigned to it.
pub async fn insert_reading(pool: &SqlitePool, reading: &NewReading) -> Result<i64, ClientError> {
    let devices = reading.devices;
    let ts = format_timestamp(reading.ts)?;
    let result = sqlx::query(
        r#"
        INSERT INTO readings
            (ts, total_power_w, predicted_power_w, energy_kwh, cost, fan_w, ac_w, tv_w, fridge_w)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(ts)
    .bind(reading.total_power_w)
    .bind(reading.predicted_power_w)
    .bind(reading.energy_kwh)
    .bind(reading.cost)
    .bind(devices.map(|d| d.fan_w))
    .bind(devices.map(|d| d.ac_w))
    .bind(devices.map(|d| d.tv_w))
    .bind(devices.map(|d| d.fridge_w))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// The last `limit` readings, oldest first.
pub async fn recent_readings(pool: &SqlitePool, limit: usize) -> Result<Vec<Reading>, ClientError> {
    let sql = format!(
        r#"
        SELECT {READING_COLUMNS}
        FROM (
            SELECT {READING_COLUMNS}
            FROM readings
            ORDER BY id DESC
            LIMIT ?
        )
        ORDER BY id ASC
        "#
    );

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = sqlx::query_as::<_, ReadingRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    into_readings(rows)
}

/// Every reading whose timestamp falls on `date`, oldest first.
pub async fn readings_for_date(pool: &SqlitePool, date: Date) -> Result<Vec<Reading>, ClientError> {
    let sql = format!(
        r#"
        SELECT {READING_COLUMNS}
        FROM readings
        WHERE ts >= ?
          AND ts <  ?
        ORDER BY id ASC
        "#
    );

    // Bare dates sort before any timestamp on the same day.
    let start = format_date(date)?;
    let end = match date.checked_add(Duration::days(1)) {
        Some(next) => format_date(next)?,
        None => "9999-12-32".to_string(),
    };

    let rows = sqlx::query_as::<_, ReadingRow>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    into_readings(rows)
}

/// The whole table in insertion order.
pub async fn all_readings(pool: &SqlitePool) -> Result<Vec<Reading>, ClientError> {
    let sql = format!("SELECT {READING_COLUMNS} FROM readings ORDER BY id ASC");
    let rows = sqlx::query_as::<_, ReadingRow>(&sql).fetch_all(pool).await?;
    into_readings(rows)
}

pub async fn count_readings(pool: &SqlitePool) -> Result<usize, ClientError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readings")
        .fetch_one(pool)
        .await?;
    Ok(usize::try_from(count).unwrap_or(0))
}
