use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::{AxisResult, ensure_finite};

/// A domain value before it is reduced to the numeric axis space.
///
/// Dates become Unix seconds and categories their ordinal index, so a single
/// scale serves value, date and category axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisValue {
    Number(f64),
    Date(DateTime<Utc>),
    Category(usize),
}

impl AxisValue {
    pub fn from_decimal(value: Decimal) -> AxisResult<Self> {
        Ok(Self::Number(decimal_to_f64(value)?))
    }

    pub fn to_f64(self) -> AxisResult<f64> {
        match self {
            Self::Number(value) => ensure_finite(value, "axis value"),
            Self::Date(time) => Ok(datetime_to_unix_seconds(time)),
            Self::Category(index) => Ok(index as f64),
        }
    }
}

/// Normalized extent of one data cell; `location` picks a point inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub start: f64,
    pub end: f64,
}

impl Cell {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Position at fraction `location` of the cell.
    #[must_use]
    pub fn at(self, location: f64) -> f64 {
        self.start + (self.end - self.start) * location
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for AxisValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}
