//! Anchoring of grid lines, ticks, labels and bullets on an axis geometry.

mod bent_label;

pub use bent_label::{BentLabel, GlyphPlacement, LabelBox, Padding, bend_label_along_arc};

use kurbo::{BezPath, Point, Vec2};
use tracing::trace;

use crate::core::Cell;
use crate::error::{AxisResult, ensure_finite};
use crate::geometry::{AxisGeometry, Radius};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Grid,
    Tick,
    Label,
    Bullet,
}

/// Resolved anchor of one axis item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: ItemKind,
    pub position: f64,
    pub point: Point,
    /// Unit vector pointing away from the plot area.
    pub normal: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementResult {
    Visible(Placement),
    /// The item's position lies outside the visible axis; skip drawing it.
    Hidden,
}

impl PlacementResult {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    #[must_use]
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            Self::Visible(placement) => Some(placement),
            Self::Hidden => None,
        }
    }
}

/// Position at fraction `location` of `[start_position, end_position]`.
#[must_use]
pub fn effective_position(start_position: f64, end_position: f64, location: f64) -> f64 {
    start_position + (end_position - start_position) * location
}

/// Places axis items on one geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPlacer {
    geometry: AxisGeometry,
}

impl ItemPlacer {
    #[must_use]
    pub fn new(geometry: AxisGeometry) -> Self {
        Self { geometry }
    }

    #[must_use]
    pub fn geometry(&self) -> &AxisGeometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: AxisGeometry) -> AxisResult<()> {
        geometry.validate()?;
        self.geometry = geometry;
        Ok(())
    }

    /// Anchors an item at `location` within `[start_position, end_position]`.
    ///
    /// Items whose effective position falls strictly outside `[0, 1]` are
    /// reported as [`PlacementResult::Hidden`].
    pub fn place(
        &self,
        kind: ItemKind,
        start_position: f64,
        end_position: f64,
        location: f64,
    ) -> AxisResult<PlacementResult> {
        ensure_finite(start_position, "item start position")?;
        ensure_finite(end_position, "item end position")?;
        ensure_finite(location, "item location")?;

        let position = effective_position(start_position, end_position, location);
        if !(0.0..=1.0).contains(&position) {
            trace!(?kind, position, "hide item outside visible axis");
            return Ok(PlacementResult::Hidden);
        }

        Ok(PlacementResult::Visible(Placement {
            kind,
            position,
            point: self.geometry.position_to_point(position)?,
            normal: self.geometry.outward_normal(position),
        }))
    }

    pub fn place_in_cell(
        &self,
        kind: ItemKind,
        cell: Cell,
        location: f64,
    ) -> AxisResult<PlacementResult> {
        self.place(kind, cell.start, cell.end, location)
    }

    /// Tick mark starting on the axis line; `inside` points it into the plot.
    #[must_use]
    pub fn tick_path(&self, placement: &Placement, length: f64, inside: bool) -> BezPath {
        let direction = if inside { -placement.normal } else { placement.normal };
        let mut path = BezPath::new();
        path.move_to(placement.point);
        path.line_to(placement.point + direction * length);
        path
    }

    pub fn grid_path(&self, placement: &Placement, ray_angles: &[f64]) -> AxisResult<BezPath> {
        self.geometry.grid_path(placement.position, ray_angles)
    }

    /// Label anchor offset from the axis by `offset`, flipped into the plot
    /// when `inside` is set.
    ///
    /// Percentage offsets resolve against the axis radius (circular and
    /// radial axes) or the axis run length (linear axes).
    #[must_use]
    pub fn label_point(&self, placement: &Placement, offset: Radius, inside: bool) -> Point {
        let distance = offset.resolve(self.offset_reference());
        let signed = if inside { -distance } else { distance };
        placement.point + placement.normal * signed
    }

    fn offset_reference(&self) -> f64 {
        match &self.geometry {
            AxisGeometry::Linear(geometry) => geometry.axis_length(),
            AxisGeometry::Circular(geometry) => geometry.pixel_radius(),
            AxisGeometry::Radial(geometry) => geometry.pixel_radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kurbo::Shape;

    use super::*;
    use crate::geometry::{CircularGeometry, LinearGeometry, RadialGeometry};

    fn horizontal_placer() -> ItemPlacer {
        ItemPlacer::new(
            LinearGeometry::horizontal(Point::new(0.0, 100.0), 200.0, 100.0)
                .expect("geometry")
                .into(),
        )
    }

    #[test]
    fn location_interpolates_within_cell() {
        let placement = horizontal_placer()
            .place(ItemKind::Label, 0.25, 0.5, 0.5)
            .expect("place");
        let placement = placement.placement().expect("visible");
        assert_relative_eq!(placement.position, 0.375, epsilon = 1e-12);
        assert_relative_eq!(placement.point.x, 75.0, epsilon = 1e-9);
        assert_eq!(placement.kind, ItemKind::Label);
    }

    #[test]
    fn items_outside_the_axis_are_hidden() {
        let placer = horizontal_placer();
        assert_eq!(
            placer.place(ItemKind::Tick, 0.9, 1.1, 1.0),
            Ok(PlacementResult::Hidden)
        );
        assert_eq!(
            placer.place(ItemKind::Grid, -0.2, 0.0, 0.5),
            Ok(PlacementResult::Hidden)
        );
        assert!(placer.place(ItemKind::Grid, 1.0, 1.0, 0.0).expect("place").is_visible());
        assert!(placer.place(ItemKind::Bullet, f64::NAN, 0.0, 0.5).is_err());
    }

    #[test]
    fn ticks_and_labels_follow_the_outward_normal() {
        let placer = horizontal_placer();
        let result = placer
            .place(ItemKind::Tick, 0.5, 0.5, 0.0)
            .expect("place");
        let placement = result.placement().expect("visible");

        let outside = placer.tick_path(placement, 6.0, false);
        let inside = placer.tick_path(placement, 6.0, true);
        assert_eq!(outside.bounding_box().y1, 106.0);
        assert_eq!(inside.bounding_box().y0, 94.0);

        let label = placer.label_point(placement, Radius::Pixels(10.0), false);
        assert_eq!(label, Point::new(100.0, 110.0));
        let flipped = placer.label_point(placement, Radius::Pixels(10.0), true);
        assert_eq!(flipped, Point::new(100.0, 90.0));
    }

    #[test]
    fn circular_labels_move_radially() {
        let placer = ItemPlacer::new(
            CircularGeometry::new(Point::ORIGIN, -90.0, 270.0, 100.0, 0.0)
                .expect("geometry")
                .into(),
        );
        let result = placer.place(ItemKind::Label, 0.0, 0.0, 0.0).expect("place");
        let placement = result.placement().expect("visible");
        let label = placer.label_point(placement, Radius::Percent(10.0), false);
        assert_relative_eq!(label.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(label.y, -110.0, epsilon = 1e-9);
        let inside = placer.label_point(placement, Radius::Percent(10.0), true);
        assert_relative_eq!(inside.y, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn radial_labels_offset_from_the_ray() {
        let placer = ItemPlacer::new(
            RadialGeometry::new(Point::ORIGIN, -90.0, 100.0, 0.0)
                .expect("geometry")
                .into(),
        );
        let cell = Cell::new(0.4, 0.6);
        let result = placer
            .place_in_cell(ItemKind::Label, cell, 0.5)
            .expect("place");
        let placement = result.placement().expect("visible");
        assert_relative_eq!(placement.point.y, -50.0, epsilon = 1e-9);

        let label = placer.label_point(placement, Radius::Pixels(8.0), false);
        assert_relative_eq!(label.x, -8.0, epsilon = 1e-9);
        let inside = placer.label_point(placement, Radius::Pixels(8.0), true);
        assert_relative_eq!(inside.x, 8.0, epsilon = 1e-9);
    }
}
