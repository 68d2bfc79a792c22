#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::core::breaks::{AxisBreak, BreakSet};
use crate::core::nice::{DurationUnit, NiceRange, compute_nice_range};
use crate::core::types::{AxisValue, Cell};
use crate::error::{AxisError, AxisResult, ensure_finite};

/// Domain-to-normalized-position model of one axis.
///
/// The scale is geometry agnostic: it maps `[min, max]` (with breaks applied)
/// onto `[0, 1]`, and leaves pixel placement to
/// [`AxisGeometry`](crate::geometry::AxisGeometry). Every mutating method
/// recomputes the break mapping before returning, so queries never observe a
/// stale state.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScale {
    min: f64,
    max: f64,
    breaks: BreakSet,
    axis_length: f64,
}

impl AxisScale {
    /// Creates a scale over the visible domain `[min, max]`.
    pub fn new(min: f64, max: f64) -> AxisResult<Self> {
        validate_domain(min, max)?;
        let mut breaks = BreakSet::new();
        breaks.recompute(min, max);
        Ok(Self {
            min,
            max,
            breaks,
            axis_length: 1.0,
        })
    }

    /// Returns a copy using `axis_length` pixels for coordinate conversion.
    pub fn with_axis_length(mut self, axis_length: f64) -> AxisResult<Self> {
        self.set_axis_length(axis_length)?;
        Ok(self)
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Updates the visible domain (zoom/pan) and recomputes breaks.
    pub fn set_domain(&mut self, min: f64, max: f64) -> AxisResult<()> {
        validate_domain(min, max)?;
        self.min = min;
        self.max = max;
        debug!(min, max, "set axis domain");
        self.recompute();
        Ok(())
    }

    #[must_use]
    pub fn axis_length(&self) -> f64 {
        self.axis_length
    }

    pub fn set_axis_length(&mut self, axis_length: f64) -> AxisResult<()> {
        if !axis_length.is_finite() || axis_length <= 0.0 {
            return Err(AxisError::InvalidConfiguration(
                "axis length must be finite and > 0".to_owned(),
            ));
        }
        self.axis_length = axis_length;
        Ok(())
    }

    #[must_use]
    pub fn breaks(&self) -> &BreakSet {
        &self.breaks
    }

    pub fn add_break(&mut self, axis_break: AxisBreak) -> AxisResult<()> {
        self.breaks.add_break(axis_break)?;
        Ok(())
    }

    pub fn merge_break(&mut self, axis_break: AxisBreak) -> AxisResult<()> {
        self.breaks.merge_break(axis_break)?;
        Ok(())
    }

    pub fn remove_break(&mut self, start_value: f64, end_value: f64) -> AxisResult<AxisBreak> {
        Ok(self.breaks.remove_break(start_value, end_value)?)
    }

    pub fn clear_breaks(&mut self) {
        self.breaks.clear();
    }

    /// Rebuilds the break mapping for the current domain.
    pub fn recompute(&mut self) {
        self.breaks.recompute(self.min, self.max);
    }

    #[must_use]
    pub fn total_compressed_length(&self) -> f64 {
        self.breaks.total_compressed_length()
    }

    /// Maps a domain value to a normalized position.
    ///
    /// Values outside the visible domain produce positions outside `[0, 1]`
    /// so placement can cull them.
    pub fn value_to_position(&self, value: f64) -> AxisResult<f64> {
        let value = ensure_finite(value, "axis value")?;
        Ok(self.breaks.value_to_position(value))
    }

    /// Like [`Self::value_to_position`] but clamped to `[0, 1]`.
    pub fn value_to_position_clamped(&self, value: f64) -> AxisResult<f64> {
        let position = self.value_to_position(value)?;
        if !(0.0..=1.0).contains(&position) {
            trace!(value, position, "clamp out-of-range axis value");
        }
        Ok(position.clamp(0.0, 1.0))
    }

    /// Maps a normalized position back to a domain value.
    ///
    /// Positions outside `[0, 1]` are clamped to the nearest domain bound.
    pub fn position_to_value(&self, position: f64) -> AxisResult<f64> {
        let position = ensure_finite(position, "axis position")?;
        if !(0.0..=1.0).contains(&position) {
            trace!(position, "clamp out-of-range axis position");
        }
        Ok(self.breaks.position_to_value(position.clamp(0.0, 1.0)))
    }

    pub fn axis_value_to_position(&self, value: AxisValue) -> AxisResult<f64> {
        self.value_to_position(value.to_f64()?)
    }

    /// Pixel offset along a straight axis of `axis_length` pixels.
    #[must_use]
    pub fn position_to_coordinate(&self, position: f64) -> f64 {
        position * self.axis_length
    }

    #[must_use]
    pub fn coordinate_to_position(&self, coordinate: f64) -> f64 {
        coordinate / self.axis_length
    }

    /// Projects many values at once.
    pub fn values_to_positions(&self, values: &[f64]) -> AxisResult<Vec<f64>> {
        #[cfg(feature = "parallel-projection")]
        {
            values
                .par_iter()
                .map(|value| self.value_to_position(*value))
                .collect()
        }

        #[cfg(not(feature = "parallel-projection"))]
        {
            values
                .iter()
                .map(|value| self.value_to_position(*value))
                .collect()
        }
    }

    /// Normalized extent of the category cell `[index, index + 1]`.
    pub fn category_cell(&self, index: usize) -> AxisResult<Cell> {
        let start = index as f64;
        Ok(Cell::new(
            self.value_to_position(start)?,
            self.value_to_position(start + 1.0)?,
        ))
    }

    /// Nice bounds and step for the current domain.
    ///
    /// With a duration `unit` the domain is read as Unix seconds, snapped to
    /// the unit's divisors and returned in seconds again.
    pub fn nice_range(
        &self,
        desired_grid_count: i32,
        strict_min_max: bool,
        unit: Option<DurationUnit>,
    ) -> AxisResult<NiceRange> {
        let Some(unit) = unit else {
            return compute_nice_range(self.min, self.max, desired_grid_count, strict_min_max, None);
        };
        let seconds = unit.seconds();
        let range = compute_nice_range(
            self.min / seconds,
            self.max / seconds,
            desired_grid_count,
            strict_min_max,
            Some(unit.divisors()),
        )?;
        Ok(NiceRange {
            min: if strict_min_max { self.min } else { range.min * seconds },
            max: if strict_min_max { self.max } else { range.max * seconds },
            step: range.step * seconds,
        })
    }

    /// Gridline values inside the visible domain.
    ///
    /// Values falling strictly inside a compressing break are dropped and the
    /// break boundaries are added instead.
    pub fn grid_values(
        &self,
        desired_grid_count: i32,
        unit: Option<DurationUnit>,
    ) -> AxisResult<Vec<f64>> {
        let step = self.nice_range(desired_grid_count, true, unit)?.step;
        let first = (self.min / step).ceil() * step;
        let last = (self.max / step).floor() * step;
        let mut values = if first <= last {
            NiceRange {
                min: first,
                max: last,
                step,
            }
            .values()
        } else {
            Vec::new()
        };

        let compressing: Vec<(f64, f64)> = self
            .breaks
            .active_breaks()
            .filter(|axis_break| axis_break.break_size() < 1.0)
            .filter_map(|axis_break| {
                Some((
                    axis_break.adjusted_start_value()?,
                    axis_break.adjusted_end_value()?,
                ))
            })
            .collect();
        if compressing.is_empty() {
            return Ok(values);
        }

        values.retain(|value| {
            !compressing
                .iter()
                .any(|(start, end)| *value > *start && *value < *end)
        });
        for (start, end) in compressing {
            values.push(start);
            values.push(end);
        }
        values.sort_by(f64::total_cmp);
        values.dedup_by(|left, right| (*left - *right).abs() <= step * 1e-9);
        Ok(values)
    }
}

fn validate_domain(min: f64, max: f64) -> AxisResult<()> {
    ensure_finite(min, "axis min")?;
    ensure_finite(max, "axis max")?;
    if max <= min {
        return Err(AxisError::InvalidDomain { min, max });
    }
    Ok(())
}
