use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{AxisError, AxisResult};

pub fn decimal_to_f64(value: Decimal) -> AxisResult<f64> {
    value.to_f64().ok_or(AxisError::NonFinite {
        what: "decimal axis value",
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Inverse of [`datetime_to_unix_seconds`], rounded to whole milliseconds.
#[must_use]
pub fn unix_seconds_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis > i64::MAX as f64 || millis < i64::MIN as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
}
