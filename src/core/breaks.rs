use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BreakError;

/// Derived extent of a break after clipping and compression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedBreak {
    pub start_value: f64,
    pub end_value: f64,
    pub start_position: f64,
    pub end_position: f64,
}

/// A declared sub-range of the domain rendered at reduced width.
///
/// `break_size` is the fraction of the natural width that stays visible:
/// `0` collapses the range to a single position, `1` leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBreak {
    start_value: f64,
    end_value: f64,
    break_size: f64,
    #[serde(skip)]
    adjusted: Option<AdjustedBreak>,
}

impl AxisBreak {
    pub fn new(start_value: f64, end_value: f64, break_size: f64) -> Result<Self, BreakError> {
        let candidate = Self {
            start_value,
            end_value,
            break_size,
            adjusted: None,
        };
        candidate.validate()?;
        Ok(candidate)
    }

    pub fn validate(&self) -> Result<(), BreakError> {
        if !self.start_value.is_finite()
            || !self.end_value.is_finite()
            || self.start_value >= self.end_value
        {
            return Err(BreakError::Degenerate {
                start: self.start_value,
                end: self.end_value,
            });
        }
        if !self.break_size.is_finite() || !(0.0..=1.0).contains(&self.break_size) {
            return Err(BreakError::InvalidSize(self.break_size));
        }
        Ok(())
    }

    #[must_use]
    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    #[must_use]
    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    #[must_use]
    pub fn break_size(&self) -> f64 {
        self.break_size
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.end_value - self.start_value
    }

    /// Whether the last recompute found any part of this break inside the domain.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.adjusted.is_some()
    }

    #[must_use]
    pub fn adjusted(&self) -> Option<AdjustedBreak> {
        self.adjusted
    }

    #[must_use]
    pub fn adjusted_start_value(&self) -> Option<f64> {
        self.adjusted.map(|adjusted| adjusted.start_value)
    }

    #[must_use]
    pub fn adjusted_end_value(&self) -> Option<f64> {
        self.adjusted.map(|adjusted| adjusted.end_value)
    }

    #[must_use]
    pub fn adjusted_start_position(&self) -> Option<f64> {
        self.adjusted.map(|adjusted| adjusted.start_position)
    }

    #[must_use]
    pub fn adjusted_end_position(&self) -> Option<f64> {
        self.adjusted.map(|adjusted| adjusted.end_position)
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start_value < other.end_value && other.start_value < self.end_value
    }
}

/// Which piece of the axis a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Normal,
    /// Index into `BreakSet::breaks`.
    Break(usize),
}

/// One affine piece of the value -> position mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakSegment {
    pub kind: SegmentKind,
    pub value_start: f64,
    pub value_end: f64,
    pub position_start: f64,
    pub position_end: f64,
}

impl BreakSegment {
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.position_start == self.position_end
    }

    fn value_to_position(&self, value: f64) -> f64 {
        if value == self.value_end {
            return self.position_end;
        }
        let ratio = (value - self.value_start) / (self.value_end - self.value_start);
        self.position_start + ratio * (self.position_end - self.position_start)
    }

    fn position_to_value(&self, position: f64) -> f64 {
        if self.is_collapsed() {
            return (self.value_start + self.value_end) * 0.5;
        }
        let ratio = (position - self.position_start) / (self.position_end - self.position_start);
        self.value_start + ratio * (self.value_end - self.value_start)
    }
}

/// Ordered, non-overlapping breaks of one axis plus the piecewise mapping
/// they induce on the current domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakSet {
    breaks: Vec<AxisBreak>,
    segments: Vec<BreakSegment>,
    domain: Option<(f64, f64)>,
    total_compressed_length: f64,
}

impl BreakSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn breaks(&self) -> &[AxisBreak] {
        &self.breaks
    }

    pub fn active_breaks(&self) -> impl Iterator<Item = &AxisBreak> {
        self.breaks.iter().filter(|axis_break| axis_break.is_active())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.breaks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[BreakSegment] {
        &self.segments
    }

    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    /// Domain width after compression, in value units.
    #[must_use]
    pub fn total_compressed_length(&self) -> f64 {
        self.total_compressed_length
    }

    /// Inserts a break in start order, rejecting overlaps.
    pub fn add_break(&mut self, axis_break: AxisBreak) -> Result<(), BreakError> {
        axis_break.validate()?;

        let index = self.insertion_index(axis_break.start_value);
        let overlaps_previous = index
            .checked_sub(1)
            .is_some_and(|previous| self.breaks[previous].overlaps(&axis_break));
        let overlaps_next = self
            .breaks
            .get(index)
            .is_some_and(|next| next.overlaps(&axis_break));
        if overlaps_previous || overlaps_next {
            warn!(
                start = axis_break.start_value,
                end = axis_break.end_value,
                "reject overlapping axis break"
            );
            return Err(BreakError::Overlap {
                start: axis_break.start_value,
                end: axis_break.end_value,
            });
        }

        self.breaks.insert(index, axis_break);
        self.refresh();
        Ok(())
    }

    /// Inserts a break, folding every break it overlaps into one.
    ///
    /// The merged break spans the union of the extents and keeps the smallest
    /// `break_size` of the merged group.
    pub fn merge_break(&mut self, axis_break: AxisBreak) -> Result<(), BreakError> {
        axis_break.validate()?;

        let mut merged = axis_break;
        self.breaks.retain(|existing| {
            if !existing.overlaps(&axis_break) {
                return true;
            }
            merged.start_value = merged.start_value.min(existing.start_value);
            merged.end_value = merged.end_value.max(existing.end_value);
            merged.break_size = merged.break_size.min(existing.break_size);
            false
        });
        merged.adjusted = None;

        let index = self.insertion_index(merged.start_value);
        self.breaks.insert(index, merged);
        self.refresh();
        Ok(())
    }

    /// Removes the break declared with exactly `[start_value, end_value]`.
    pub fn remove_break(
        &mut self,
        start_value: f64,
        end_value: f64,
    ) -> Result<AxisBreak, BreakError> {
        let found = self
            .breaks
            .binary_search_by_key(&OrderedFloat(start_value), |existing| {
                OrderedFloat(existing.start_value)
            })
            .ok()
            .filter(|index| self.breaks[*index].end_value == end_value);

        let Some(index) = found else {
            return Err(BreakError::NotFound {
                start: start_value,
                end: end_value,
            });
        };

        let mut removed = self.breaks.remove(index);
        removed.adjusted = None;
        self.refresh();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.breaks.clear();
        self.refresh();
    }

    /// Rebuilds the compressed mapping for the visible domain `[min, max]`.
    ///
    /// Breaks are clipped to the domain; a break whose clipped interval is
    /// empty stays in the set but is inactive until a later recompute.
    pub fn recompute(&mut self, min: f64, max: f64) {
        self.domain = Some((min, max));
        self.segments.clear();
        for axis_break in &mut self.breaks {
            axis_break.adjusted = None;
        }

        if !min.is_finite() || !max.is_finite() || max <= min {
            warn!(min, max, "skip break recompute for invalid domain");
            self.total_compressed_length = 0.0;
            return;
        }

        let span = max - min;
        let mut removed = 0.0;
        for axis_break in &self.breaks {
            if let Some((start, end)) = clip(axis_break, min, max) {
                removed += (end - start) * (1.0 - axis_break.break_size);
            }
        }

        let mut total = span - removed;
        let collapsed = total <= span * f64::EPSILON;
        if collapsed {
            warn!(
                min,
                max, "axis breaks collapse the whole domain; compression disabled"
            );
            total = span;
        }
        self.total_compressed_length = total;

        let mut cursor_value = min;
        let mut cursor_length = 0.0;
        for (index, axis_break) in self.breaks.iter().enumerate() {
            let Some((start, end)) = clip(axis_break, min, max) else {
                continue;
            };

            if start > cursor_value {
                let length = start - cursor_value;
                self.segments.push(BreakSegment {
                    kind: SegmentKind::Normal,
                    value_start: cursor_value,
                    value_end: start,
                    position_start: cursor_length / total,
                    position_end: (cursor_length + length) / total,
                });
                cursor_length += length;
            }

            let size = if collapsed { 1.0 } else { axis_break.break_size };
            let compressed = (end - start) * size;
            self.segments.push(BreakSegment {
                kind: SegmentKind::Break(index),
                value_start: start,
                value_end: end,
                position_start: cursor_length / total,
                position_end: (cursor_length + compressed) / total,
            });
            cursor_length += compressed;
            cursor_value = end;
        }

        if max > cursor_value {
            self.segments.push(BreakSegment {
                kind: SegmentKind::Normal,
                value_start: cursor_value,
                value_end: max,
                position_start: cursor_length / total,
                position_end: 1.0,
            });
        }
        if let Some(last) = self.segments.last_mut() {
            last.position_end = 1.0;
            last.position_start = last.position_start.min(1.0);
        }

        for segment in &self.segments {
            if let SegmentKind::Break(index) = segment.kind {
                self.breaks[index].adjusted = Some(AdjustedBreak {
                    start_value: segment.value_start,
                    end_value: segment.value_end,
                    start_position: segment.position_start,
                    end_position: segment.position_end,
                });
            }
        }

        debug!(
            min,
            max,
            breaks = self.breaks.len(),
            active = self.segments.iter().filter(|s| s.kind != SegmentKind::Normal).count(),
            total_compressed_length = total,
            "recompute axis breaks"
        );
    }

    /// Maps a domain value to its normalized position.
    ///
    /// Values outside the recomputed domain extrapolate at the uncompressed
    /// rate, so callers can detect them by a position outside `[0, 1]`.
    #[must_use]
    pub fn value_to_position(&self, value: f64) -> f64 {
        let (Some((min, max)), Some(_)) = (self.domain, self.segments.first()) else {
            return 0.0;
        };
        if value < min {
            return (value - min) / self.total_compressed_length;
        }
        if value > max {
            return 1.0 + (value - max) / self.total_compressed_length;
        }

        let index = self
            .segments
            .partition_point(|segment| segment.value_end <= value)
            .min(self.segments.len() - 1);
        self.segments[index].value_to_position(value)
    }

    /// Inverse of [`Self::value_to_position`].
    ///
    /// The single position of a fully collapsed break maps back to the
    /// break's midpoint value.
    #[must_use]
    pub fn position_to_value(&self, position: f64) -> f64 {
        let (Some((min, max)), Some(_)) = (self.domain, self.segments.first()) else {
            return 0.0;
        };
        if position < 0.0 {
            return min + position * self.total_compressed_length;
        }
        if position > 1.0 {
            return max + (position - 1.0) * self.total_compressed_length;
        }

        let last = self.segments.len() - 1;
        let mut index = self
            .segments
            .partition_point(|segment| segment.position_end < position)
            .min(last);
        if index < last
            && self.segments[index].position_end == position
            && self.segments[index + 1].is_collapsed()
        {
            index += 1;
        }
        self.segments[index].position_to_value(position)
    }

    /// Returns the active break containing `value`.
    ///
    /// Break intervals are closed at the start and open at the end, except
    /// the last active break which also contains its end value.
    #[must_use]
    pub fn break_at(&self, value: f64) -> Option<&AxisBreak> {
        let candidate = self
            .breaks
            .partition_point(|axis_break| axis_break.start_value <= value)
            .checked_sub(1)?;
        let axis_break = &self.breaks[candidate];
        let adjusted = axis_break.adjusted?;
        if value < adjusted.start_value || value > adjusted.end_value {
            return None;
        }
        if value < adjusted.end_value {
            return Some(axis_break);
        }
        let is_last_active = self.breaks[candidate + 1..]
            .iter()
            .all(|later| !later.is_active());
        is_last_active.then_some(axis_break)
    }

    fn insertion_index(&self, start_value: f64) -> usize {
        self.breaks
            .partition_point(|existing| existing.start_value < start_value)
    }

    fn refresh(&mut self) {
        if let Some((min, max)) = self.domain {
            self.recompute(min, max);
        }
    }
}

fn clip(axis_break: &AxisBreak, min: f64, max: f64) -> Option<(f64, f64)> {
    let start = axis_break.start_value.max(min);
    let end = axis_break.end_value.min(max);
    (end > start).then_some((start, end))
}
