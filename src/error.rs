use thiserror::Error;

pub type AxisResult<T> = Result<T, AxisError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AxisError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("invalid axis domain: min={min}, max={max}")]
    InvalidDomain { min: f64, max: f64 },

    #[error(transparent)]
    Break(#[from] BreakError),
}

/// Rejection reasons for axis break declarations.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BreakError {
    #[error("break [{start}, {end}] overlaps an existing break")]
    Overlap { start: f64, end: f64 },

    #[error("break [{start}, {end}] must satisfy start < end")]
    Degenerate { start: f64, end: f64 },

    #[error("break size must be finite and in [0, 1], got {0}")]
    InvalidSize(f64),

    #[error("no break with bounds [{start}, {end}]")]
    NotFound { start: f64, end: f64 },
}

pub(crate) fn ensure_finite(value: f64, what: &'static str) -> AxisResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AxisError::NonFinite { what })
    }
}
