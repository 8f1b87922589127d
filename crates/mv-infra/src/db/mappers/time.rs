use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

pub fn ms_to_datetime(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("timestamp out of range: {ms}"))
}

pub fn datetime_to_ms(at: &DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}
