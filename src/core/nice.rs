use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{AxisError, AxisResult, ensure_finite};

/// Leading-digit candidates used to snap a raw step to a round value.
pub const DEFAULT_ROUND_STEPS: [f64; 4] = [1.0, 2.0, 5.0, 10.0];

const MAX_GRID_VALUES: f64 = 10_000.0;
const SNAP_EPSILON: f64 = 1e-9;

/// Human-friendly bounds and gridline spacing for an axis domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NiceRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NiceRange {
    /// Enumerates `min, min + step, ..., max` (capped at 10k entries).
    #[must_use]
    pub fn values(self) -> Vec<f64> {
        if !(self.step > 0.0) || !self.step.is_finite() || self.max < self.min {
            return Vec::new();
        }

        let count = ((self.max - self.min) / self.step).round();
        if !count.is_finite() || count < 0.0 {
            return Vec::new();
        }
        let count = count.min(MAX_GRID_VALUES) as usize;
        (0..=count)
            .map(|index| round_to_step_precision(self.min + self.step * index as f64, self.step))
            .collect()
    }

    /// Number of step intervals between `min` and `max`.
    #[must_use]
    pub fn interval_count(self) -> usize {
        self.values().len().saturating_sub(1)
    }
}

/// Time units whose natural divisors replace the decimal round set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl DurationUnit {
    /// Divisors in descending order, expressed in the unit itself.
    #[must_use]
    pub fn divisors(self) -> &'static [f64] {
        match self {
            Self::Second | Self::Minute => &[60.0, 30.0, 20.0, 15.0, 10.0, 2.0, 1.0],
            Self::Hour => &[24.0, 12.0, 6.0, 4.0, 2.0, 1.0],
            Self::Day => &[7.0, 1.0],
        }
    }

    /// Length of one unit in seconds, the axis space of date values.
    #[must_use]
    pub fn seconds(self) -> f64 {
        match self {
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3_600.0,
            Self::Day => 86_400.0,
        }
    }
}

/// Computes a nice `(min, max, step)` triple for `[min, max]`.
///
/// `desired_grid_count` values below `1` are treated as `1`. When
/// `unit_divisors` is supplied the step becomes a multiple of the largest
/// divisor that still yields more than `desired_grid_count` intervals.
///
/// With `strict_min_max` the bounds are returned untouched; otherwise they are
/// snapped outward to the step grid and padded by one step, never crossing
/// zero when the original bound did not.
pub fn compute_nice_range(
    min: f64,
    max: f64,
    desired_grid_count: i32,
    strict_min_max: bool,
    unit_divisors: Option<&[f64]>,
) -> AxisResult<NiceRange> {
    ensure_finite(min, "nice range min")?;
    ensure_finite(max, "nice range max")?;
    if max < min {
        return Err(AxisError::InvalidDomain { min, max });
    }

    let grid_count = f64::from(desired_grid_count.max(1));
    let mut difference = max - min;
    if !difference.is_finite() {
        return Err(AxisError::NonFinite {
            what: "nice range difference",
        });
    }
    if difference == 0.0 {
        difference = max.abs();
        if difference == 0.0 {
            difference = 1.0;
        }
    }

    let step = match unit_divisors {
        None => nice_step(difference / grid_count, &DEFAULT_ROUND_STEPS),
        Some(divisors) => duration_step(difference, grid_count, divisors)?,
    };
    if !step.is_finite() || step <= 0.0 {
        return Err(AxisError::NonFinite { what: "nice step" });
    }

    if strict_min_max {
        return Ok(NiceRange { min, max, step });
    }

    let mut nice_min = round_to_step_precision((min / step).floor() * step - step, step);
    let mut nice_max = round_to_step_precision((max / step).ceil() * step + step, step);
    if nice_min < 0.0 && min >= 0.0 {
        nice_min = 0.0;
    }
    if nice_max > 0.0 && max <= 0.0 {
        nice_max = 0.0;
    }

    Ok(NiceRange {
        min: nice_min,
        max: nice_max,
        step,
    })
}

/// Snaps `raw_step` to `round_steps[i] * 10^k`, picking the smallest candidate
/// not below the step's leading digit. `round_steps` must be ascending.
#[must_use]
pub fn nice_step(raw_step: f64, round_steps: &[f64]) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 0.0;
    }

    let magnitude = 10_f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let snapped = round_steps
        .iter()
        .copied()
        .find(|candidate| *candidate >= normalized - SNAP_EPSILON)
        .unwrap_or(10.0);
    round_to_step_precision(snapped * magnitude, snapped * magnitude)
}

fn duration_step(difference: f64, grid_count: f64, divisors: &[f64]) -> AxisResult<f64> {
    let mut sorted: SmallVec<[f64; 8]> = divisors
        .iter()
        .copied()
        .filter(|divisor| divisor.is_finite() && *divisor > 0.0)
        .collect();
    if sorted.is_empty() {
        return Err(AxisError::InvalidConfiguration(
            "unit divisors must contain at least one finite value > 0".to_owned(),
        ));
    }
    sorted.sort_by(|left, right| right.total_cmp(left));

    let smallest = sorted[sorted.len() - 1];
    let divisor = sorted
        .iter()
        .copied()
        .find(|divisor| difference / divisor > grid_count)
        .unwrap_or(smallest);

    let multiplier = nice_step(difference / divisor / grid_count, &DEFAULT_ROUND_STEPS);
    Ok(divisor * multiplier)
}

/// Rounds `value` to one decimal digit finer than `step`, removing the drift
/// that `floor(v / step) * step` accumulates for fractional steps.
fn round_to_step_precision(value: f64, step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return value;
    }
    let digits = (-step.log10().floor() + 1.0).max(0.0);
    if digits > 15.0 {
        return value;
    }
    let scale = 10_f64.powf(digits);
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() { rounded } else { value }
}
