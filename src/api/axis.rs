use std::fmt;
use std::sync::Arc;

use kurbo::{BezPath, Point};
use tracing::{debug, warn};

use crate::core::{AxisBreak, AxisScale, AxisValue, Cell, NiceRange};
use crate::core::primitives::unix_seconds_to_datetime;
use crate::error::{AxisError, AxisResult, ensure_finite};
use crate::geometry::{AxisGeometry, CircularGeometry, RangeShape};
use crate::placement::{
    ItemKind, ItemPlacer, LabelBox, Padding, Placement, PlacementResult, bend_label_along_arc,
};
use crate::render::{AxisFrame, GlyphRunPrimitive, PathPrimitive, PathRole, TextHAlign, TextPrimitive};

use super::label_cache::{LabelCache, LabelCacheStats};
use super::label_format::{date_format_for_unit, number_format_for_step};
use super::{
    AxisConfig, DefaultLabelFormatter, FixedWidthMeasurer, LabelFormatter, TextMeasurer, ValueKind,
};

pub type SharedLabelFormatter = Arc<dyn LabelFormatter + Send + Sync>;
pub type SharedTextMeasurer = Arc<dyn TextMeasurer + Send + Sync>;

const MAX_CATEGORY_CELLS: usize = 10_000;

/// One axis: a scale, a geometry and the configuration that turns both into
/// a draw list.
///
/// Every update method validates its input and recomputes the break mapping
/// before returning, so [`Axis::layout`] always observes a consistent state.
#[derive(Clone)]
pub struct Axis {
    scale: AxisScale,
    placer: ItemPlacer,
    config: AxisConfig,
    ray_angles: Vec<f64>,
    formatter: SharedLabelFormatter,
    measurer: SharedTextMeasurer,
    label_cache: LabelCache,
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("scale", &self.scale)
            .field("geometry", self.placer.geometry())
            .field("config", &self.config)
            .field("ray_angles", &self.ray_angles)
            .finish_non_exhaustive()
    }
}

/// One item slot produced for a layout pass.
struct AxisItem {
    value: AxisValue,
    cell: Cell,
}

impl Axis {
    pub fn new(min: f64, max: f64, geometry: impl Into<AxisGeometry>) -> AxisResult<Self> {
        let geometry = geometry.into();
        geometry.validate()?;
        let scale = AxisScale::new(min, max)?.with_axis_length(geometry.axis_length())?;
        Ok(Self {
            scale,
            placer: ItemPlacer::new(geometry),
            config: AxisConfig::default(),
            ray_angles: Vec::new(),
            formatter: Arc::new(DefaultLabelFormatter::new()),
            measurer: Arc::new(FixedWidthMeasurer::default()),
            label_cache: LabelCache::default(),
        })
    }

    pub fn with_config(mut self, config: AxisConfig) -> AxisResult<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: SharedLabelFormatter) -> Self {
        self.formatter = formatter;
        self.label_cache.clear();
        self
    }

    #[must_use]
    pub fn with_measurer(mut self, measurer: SharedTextMeasurer) -> Self {
        self.measurer = measurer;
        self
    }

    #[must_use]
    pub fn scale(&self) -> &AxisScale {
        &self.scale
    }

    #[must_use]
    pub fn geometry(&self) -> &AxisGeometry {
        self.placer.geometry()
    }

    #[must_use]
    pub fn placer(&self) -> &ItemPlacer {
        &self.placer
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    #[must_use]
    pub fn label_cache_stats(&self) -> LabelCacheStats {
        self.label_cache.stats()
    }

    /// Replaces the configuration, including its declared breaks.
    ///
    /// On error the axis keeps its previous configuration and breaks.
    pub fn set_config(&mut self, config: AxisConfig) -> AxisResult<()> {
        config.validate()?;
        let mut scale = self.scale.clone();
        scale.clear_breaks();
        for axis_break in &config.breaks {
            scale.add_break(*axis_break)?;
        }
        scale.recompute();

        debug!(
            value_kind = ?config.value_kind,
            breaks = config.breaks.len(),
            "apply axis config"
        );
        self.scale = scale;
        self.config = config;
        self.sync_config_breaks();
        self.label_cache.clear();
        Ok(())
    }

    /// Updates the visible domain (zoom/pan).
    pub fn set_domain(&mut self, min: f64, max: f64) -> AxisResult<()> {
        self.scale.set_domain(min, max)
    }

    /// Swaps the geometry, e.g. after the container was resized.
    pub fn set_geometry(&mut self, geometry: impl Into<AxisGeometry>) -> AxisResult<()> {
        let geometry = geometry.into();
        if let Err(error) = geometry.validate() {
            warn!(%error, "reject axis geometry");
            return Err(error);
        }
        self.scale.set_axis_length(geometry.axis_length())?;
        self.placer.set_geometry(geometry)?;
        debug!(axis_length = geometry.axis_length(), "set axis geometry");
        Ok(())
    }

    /// Angles (degrees) of the rays a polygonal radial grid connects.
    pub fn set_ray_angles(&mut self, ray_angles: Vec<f64>) -> AxisResult<()> {
        for angle in &ray_angles {
            ensure_finite(*angle, "ray angle")?;
        }
        self.ray_angles = ray_angles;
        Ok(())
    }

    pub fn add_break(&mut self, axis_break: AxisBreak) -> AxisResult<()> {
        if let Err(error) = self.scale.add_break(axis_break) {
            warn!(%error, "reject axis break");
            return Err(error);
        }
        self.sync_config_breaks();
        Ok(())
    }

    pub fn merge_break(&mut self, axis_break: AxisBreak) -> AxisResult<()> {
        self.scale.merge_break(axis_break)?;
        self.sync_config_breaks();
        Ok(())
    }

    pub fn remove_break(&mut self, start_value: f64, end_value: f64) -> AxisResult<AxisBreak> {
        let removed = self.scale.remove_break(start_value, end_value)?;
        self.sync_config_breaks();
        Ok(removed)
    }

    pub fn clear_breaks(&mut self) {
        self.scale.clear_breaks();
        self.config.breaks.clear();
    }

    pub fn recompute(&mut self) {
        self.scale.recompute();
    }

    fn sync_config_breaks(&mut self) {
        self.config.breaks = self.scale.breaks().breaks().to_vec();
    }

    pub fn value_to_position(&self, value: impl Into<AxisValue>) -> AxisResult<f64> {
        self.scale.axis_value_to_position(value.into())
    }

    pub fn position_to_value(&self, position: f64) -> AxisResult<f64> {
        self.scale.position_to_value(position)
    }

    /// Pixel point of `value`; values outside the domain extrapolate.
    pub fn value_to_point(&self, value: impl Into<AxisValue>) -> AxisResult<Point> {
        let position = self.value_to_position(value)?;
        self.geometry().position_to_point(position)
    }

    /// Domain value under `point`, clamped to the visible domain.
    pub fn point_to_value(&self, point: Point) -> AxisResult<f64> {
        let position = self.geometry().point_to_position(point)?;
        self.scale.position_to_value(position)
    }

    /// Outline covering the domain range `[start_value, end_value]`.
    pub fn range_path(
        &self,
        start_value: f64,
        end_value: f64,
        shape: RangeShape,
    ) -> AxisResult<BezPath> {
        let start = self.scale.value_to_position(start_value)?;
        let end = self.scale.value_to_position(end_value)?;
        self.fill_path(start, end, shape)
    }

    pub fn nice_range(&self) -> AxisResult<NiceRange> {
        let nice = self.config.nice;
        self.scale
            .nice_range(nice.desired_grid_count, nice.strict_min_max, nice.duration_unit)
    }

    fn fill_path(&self, start: f64, end: f64, shape: RangeShape) -> AxisResult<BezPath> {
        match self.geometry() {
            AxisGeometry::Radial(geometry) => {
                ensure_finite(start, "range start position")?;
                ensure_finite(end, "range end position")?;
                Ok(geometry.band_path(start, end, &self.ray_angles))
            }
            geometry => geometry.range_path(start, end, shape),
        }
    }

    /// Runs one layout pass and returns the resulting draw list.
    pub fn layout(&mut self) -> AxisResult<AxisFrame> {
        let mut frame = AxisFrame::new();

        if self.config.show_axis_line {
            frame = frame.with_path(PathPrimitive::new(
                PathRole::AxisLine,
                self.geometry().axis_line_path(),
            ));
        }

        if self.config.break_fills {
            for axis_break in self.scale.breaks().active_breaks() {
                let (Some(start), Some(end)) = (
                    axis_break.adjusted_start_position(),
                    axis_break.adjusted_end_position(),
                ) else {
                    continue;
                };
                if end <= start {
                    continue;
                }
                let path = self.fill_path(start, end, RangeShape::default())?;
                frame = frame.with_path(PathPrimitive::new(PathRole::BreakFill, path));
            }
        }

        let (items, step) = self.items()?;
        let format = self.label_format(step);
        let full_circle = self
            .geometry()
            .as_circular()
            .is_some_and(CircularGeometry::is_full_circle);
        let mut last_position: Option<f64> = None;
        let mut drew_start = false;

        for item in &items {
            if self.config.value_kind != ValueKind::Category {
                let position = item.cell.start;
                if last_position.is_some_and(|last| (last - position).abs() <= 1e-9) {
                    continue;
                }
                // The end of a closed circle coincides with its start.
                if full_circle && drew_start && (position - 1.0).abs() <= 1e-9 {
                    continue;
                }
                drew_start |= position.abs() <= 1e-9;
                last_position = Some(position);
            }

            if self.config.grid.visible {
                if let PlacementResult::Visible(placement) =
                    self.placer
                        .place_in_cell(ItemKind::Grid, item.cell, self.config.grid.location)?
                {
                    let path = self.placer.grid_path(&placement, &self.ray_angles)?;
                    frame = frame.with_path(PathPrimitive::new(PathRole::Grid, path));
                }
            }

            if self.config.ticks.visible {
                if let PlacementResult::Visible(placement) =
                    self.placer
                        .place_in_cell(ItemKind::Tick, item.cell, self.config.ticks.location)?
                {
                    let ticks = self.config.ticks;
                    let path = self.placer.tick_path(&placement, ticks.length, ticks.inside);
                    frame = frame.with_path(PathPrimitive::new(PathRole::Tick, path));
                }
            }

            if self.config.labels.visible {
                if let PlacementResult::Visible(placement) =
                    self.placer
                        .place_in_cell(ItemKind::Label, item.cell, self.config.labels.location)?
                {
                    let text =
                        self.label_cache
                            .get_or_format(item.value, &format, self.formatter.as_ref());
                    if !text.is_empty() {
                        frame = self.push_label(frame, &placement, text)?;
                    }
                }
            }
        }

        debug!(
            paths = frame.paths.len(),
            texts = frame.texts.len(),
            glyph_runs = frame.glyph_runs.len(),
            "axis layout"
        );
        Ok(frame)
    }

    fn push_label(
        &self,
        frame: AxisFrame,
        placement: &Placement,
        text: String,
    ) -> AxisResult<AxisFrame> {
        let labels = &self.config.labels;

        if labels.bent {
            if let Some(circular) = self.geometry().as_circular() {
                let metrics = self.measurer.measure(&text);
                if metrics.glyph_advances.len() == text.chars().count() {
                    let offset = labels.offset.resolve(circular.pixel_radius());
                    let radius = if labels.inside {
                        circular.pixel_radius() - offset
                    } else {
                        circular.pixel_radius() + offset
                    };
                    let label_box = LabelBox::new(metrics.width, metrics.height)
                        .with_padding(Padding::uniform(labels.padding));
                    let bent = bend_label_along_arc(
                        &label_box,
                        &metrics.glyph_advances,
                        circular.center(),
                        circular.position_to_angle(placement.position),
                        radius,
                        labels.inside,
                    )?;
                    return Ok(frame.with_glyph_run(GlyphRunPrimitive {
                        text,
                        glyphs: bent.glyphs,
                    }));
                }
                warn!(%text, "glyph advances do not match label; drawing it straight");
            }
        }

        let anchor = self.placer.label_point(placement, labels.offset, labels.inside);
        let facing = if labels.inside {
            -placement.normal
        } else {
            placement.normal
        };
        let h_align = if facing.x > 0.5 {
            TextHAlign::Left
        } else if facing.x < -0.5 {
            TextHAlign::Right
        } else {
            TextHAlign::Center
        };
        Ok(frame.with_text(TextPrimitive::new(text, anchor, h_align)))
    }

    /// Item slots for the current domain plus the grid step used to build them.
    fn items(&self) -> AxisResult<(Vec<AxisItem>, f64)> {
        let (min, max) = self.scale.domain();
        match self.config.value_kind {
            ValueKind::Category => {
                let first = min.floor().max(0.0);
                let last = max.ceil();
                if last <= first {
                    return Ok((Vec::new(), 1.0));
                }
                let count = ((last - first) as usize).min(MAX_CATEGORY_CELLS);
                let first = first as usize;
                let items = (first..first + count)
                    .map(|index| -> AxisResult<AxisItem> {
                        Ok(AxisItem {
                            value: AxisValue::Category(index),
                            cell: self.scale.category_cell(index)?,
                        })
                    })
                    .collect::<AxisResult<Vec<_>>>()?;
                Ok((items, 1.0))
            }
            kind => {
                let nice = self.config.nice;
                let step = self
                    .scale
                    .nice_range(nice.desired_grid_count, true, nice.duration_unit)?
                    .step;
                let values = self
                    .scale
                    .grid_values(nice.desired_grid_count, nice.duration_unit)?;
                let items = values
                    .into_iter()
                    .map(|value| -> AxisResult<AxisItem> {
                        let position = self.scale.value_to_position(value)?;
                        Ok(AxisItem {
                            value: axis_value(kind, value)?,
                            cell: Cell::new(position, position),
                        })
                    })
                    .collect::<AxisResult<Vec<_>>>()?;
                Ok((items, step))
            }
        }
    }

    fn label_format(&self, step: f64) -> String {
        let configured = &self.config.labels.format;
        if !configured.is_empty() {
            return configured.clone();
        }
        match self.config.value_kind {
            ValueKind::Number => number_format_for_step(step),
            ValueKind::Date => date_format_for_unit(self.config.nice.duration_unit).to_owned(),
            ValueKind::Category => String::new(),
        }
    }
}

fn axis_value(kind: ValueKind, value: f64) -> AxisResult<AxisValue> {
    match kind {
        ValueKind::Date => unix_seconds_to_datetime(value)
            .map(AxisValue::Date)
            .ok_or_else(|| {
                AxisError::InvalidConfiguration(format!(
                    "date axis value {value} is outside the representable range"
                ))
            }),
        ValueKind::Number | ValueKind::Category => Ok(AxisValue::Number(value)),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{CircularGeometry, LinearGeometry};
    use crate::render::{AxisRenderer, NullRenderer};

    fn bottom_axis() -> Axis {
        Axis::new(
            0.0,
            100.0,
            LinearGeometry::horizontal(Point::new(0.0, 300.0), 500.0, 300.0).expect("geometry"),
        )
        .expect("axis")
    }

    #[test]
    fn layout_emits_grid_ticks_and_labels() {
        let mut axis = bottom_axis();
        let frame = axis.layout().expect("layout");
        NullRenderer::default().render(&frame).expect("valid frame");

        assert_eq!(frame.paths_with_role(PathRole::AxisLine).count(), 1);
        assert_eq!(frame.paths_with_role(PathRole::Grid).count(), 6);
        assert_eq!(frame.paths_with_role(PathRole::Tick).count(), 6);
        let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
        assert_eq!(labels, ["0", "20", "40", "60", "80", "100"]);
        assert_relative_eq!(frame.texts[1].anchor.x, 100.0, epsilon = 1e-9);
        assert_eq!(frame.texts[1].anchor.y, 304.0);
    }

    #[test]
    fn breaks_add_fills_and_shift_points() {
        let mut axis = bottom_axis();
        axis.add_break(AxisBreak::new(40.0, 60.0, 0.1).expect("break"))
            .expect("add break");
        let point = axis.value_to_point(100.0).expect("point");
        assert_relative_eq!(point.x, 500.0, epsilon = 1e-9);
        assert_relative_eq!(
            axis.value_to_position(60.0).expect("position"),
            42.0 / 82.0,
            epsilon = 1e-12
        );

        let frame = axis.layout().expect("layout");
        assert_eq!(frame.paths_with_role(PathRole::BreakFill).count(), 1);
        assert_eq!(axis.config().breaks.len(), 1);

        assert!(axis.add_break(AxisBreak::new(50.0, 70.0, 0.5).expect("break")).is_err());
        assert_eq!(axis.config().breaks.len(), 1);
    }

    #[test]
    fn labels_are_cached_between_passes() {
        let mut axis = bottom_axis();
        axis.layout().expect("first pass");
        let first = axis.label_cache_stats();
        axis.layout().expect("second pass");
        let second = axis.label_cache_stats();
        assert_eq!(second.misses, first.misses);
        assert_eq!(second.hits, first.hits + 6);
    }

    #[test]
    fn zoom_culls_category_cells() {
        let mut config = AxisConfig::default().with_value_kind(ValueKind::Category);
        config.labels.location = 0.5;
        let mut axis = Axis::new(
            0.0,
            4.0,
            LinearGeometry::horizontal(Point::ORIGIN, 400.0, 100.0).expect("geometry"),
        )
        .expect("axis")
        .with_config(config)
        .expect("config");

        axis.set_domain(0.6, 2.4).expect("zoom");
        let frame = axis.layout().expect("layout");
        let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
        assert_eq!(labels, ["1"]);
        // Cell 0 starts before the visible domain; cells 1 and 2 keep their grid lines.
        assert_eq!(frame.paths_with_role(PathRole::Grid).count(), 2);
    }

    #[test]
    fn bent_labels_follow_circular_axes() {
        let geometry = CircularGeometry::new(Point::new(200.0, 200.0), -90.0, 270.0, 100.0, 0.0)
            .expect("geometry");
        let mut config = AxisConfig::default();
        config.labels.bent = true;
        let mut axis = Axis::new(0.0, 360.0, geometry)
            .expect("axis")
            .with_config(config)
            .expect("config");

        let frame = axis.layout().expect("layout");
        NullRenderer::default().render(&frame).expect("valid frame");
        assert!(frame.texts.is_empty());
        assert_eq!(frame.glyph_runs.len(), 4);
        let first = &frame.glyph_runs[0];
        assert_eq!(first.text, "0");
        assert_relative_eq!(first.glyphs[0].point.x, 200.0, epsilon = 1e-9);
        assert!(first.glyphs[0].point.y < 100.0);
    }

    #[test]
    fn full_circle_draws_shared_endpoint_once() {
        let geometry = CircularGeometry::new(Point::new(200.0, 200.0), -90.0, 270.0, 100.0, 0.0)
            .expect("geometry");
        let mut axis = Axis::new(0.0, 100.0, geometry).expect("axis");

        let frame = axis.layout().expect("layout");
        let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
        assert_eq!(labels, ["0", "20", "40", "60", "80"]);
        assert_eq!(frame.paths_with_role(PathRole::Grid).count(), 5);
        assert_eq!(frame.paths_with_role(PathRole::Tick).count(), 5);

        let gauge = CircularGeometry::new(Point::new(200.0, 200.0), 180.0, 360.0, 100.0, 0.0)
            .expect("geometry");
        axis.set_geometry(gauge).expect("gauge");
        let frame = axis.layout().expect("layout");
        assert_eq!(frame.texts.len(), 6);
    }

    #[test]
    fn config_breaks_follow_scale_order() {
        let config = AxisConfig::default()
            .with_break(AxisBreak::new(60.0, 70.0, 0.5).expect("break"))
            .with_break(AxisBreak::new(10.0, 20.0, 0.5).expect("break"));
        let axis = bottom_axis().with_config(config).expect("config");

        let starts: Vec<f64> = axis
            .config()
            .breaks
            .iter()
            .map(AxisBreak::start_value)
            .collect();
        assert_eq!(starts, [10.0, 60.0]);
        assert_eq!(axis.config().breaks, axis.scale().breaks().breaks());
    }

    #[test]
    fn invalid_updates_leave_the_axis_untouched() {
        let mut axis = bottom_axis();
        assert!(axis.set_domain(10.0, 10.0).is_err());
        assert_eq!(axis.scale().domain(), (0.0, 100.0));

        let overlapping = AxisConfig::default()
            .with_break(AxisBreak::new(10.0, 20.0, 0.5).expect("break"))
            .with_break(AxisBreak::new(15.0, 25.0, 0.5).expect("break"));
        assert!(axis.set_config(overlapping).is_err());
        assert!(axis.scale().breaks().is_empty());
        assert!(axis.config().breaks.is_empty());

        assert!(axis.set_ray_angles(vec![0.0, f64::NAN]).is_err());
        assert!(axis.value_to_point(f64::NAN).is_err());
    }

    #[test]
    fn points_map_back_to_values() {
        let axis = bottom_axis();
        assert_relative_eq!(
            axis.point_to_value(Point::new(125.0, 0.0)).expect("value"),
            25.0,
            epsilon = 1e-9
        );
        assert_eq!(axis.point_to_value(Point::new(-50.0, 0.0)), Ok(0.0));
    }
}
