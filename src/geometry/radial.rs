use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult, ensure_finite};

use super::{GridShape, Radius, annular_sector, append_arc, polar_point, validate_radii};

const FULL_TURN: f64 = 360.0;

/// Value axis running along one ray of a polar chart.
///
/// Position `0` sits on the inner radius and `1` on the outer radius. The
/// `start_angle..end_angle` sweep only shapes the grid drawn around the
/// center; it never changes where a position lands on the ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialGeometry {
    center: Point,
    axis_angle: f64,
    start_angle: f64,
    end_angle: f64,
    radius: Radius,
    #[serde(default)]
    inner_radius: Radius,
    #[serde(default)]
    reference_radius: f64,
    #[serde(default)]
    grid_shape: GridShape,
}

impl RadialGeometry {
    /// Radial axis with pixel radii and a full-turn grid starting at 12 o'clock.
    pub fn new(center: Point, axis_angle: f64, radius: f64, inner_radius: f64) -> AxisResult<Self> {
        Self::with_radii(
            center,
            axis_angle,
            Radius::Pixels(radius),
            Radius::Pixels(inner_radius),
            radius,
        )
    }

    pub fn with_radii(
        center: Point,
        axis_angle: f64,
        radius: Radius,
        inner_radius: Radius,
        reference_radius: f64,
    ) -> AxisResult<Self> {
        let geometry = Self {
            center,
            axis_angle,
            start_angle: -90.0,
            end_angle: 270.0,
            radius,
            inner_radius,
            reference_radius,
            grid_shape: GridShape::Circles,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Restricts the grid sweep, e.g. for a half-circle gauge.
    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> AxisResult<Self> {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_grid_shape(mut self, grid_shape: GridShape) -> Self {
        self.grid_shape = grid_shape;
        self
    }

    pub fn with_reference_radius(mut self, reference_radius: f64) -> AxisResult<Self> {
        self.reference_radius = reference_radius;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AxisResult<()> {
        if !self.axis_angle.is_finite() {
            return Err(AxisError::InvalidConfiguration(
                "radial axis angle must be finite".to_owned(),
            ));
        }
        if !self.start_angle.is_finite()
            || !self.end_angle.is_finite()
            || self.start_angle == self.end_angle
        {
            return Err(AxisError::InvalidConfiguration(format!(
                "radial grid needs distinct finite angles (start={}, end={})",
                self.start_angle, self.end_angle
            )));
        }
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(AxisError::InvalidConfiguration(
                "radial axis center must be finite".to_owned(),
            ));
        }
        validate_radii(self.pixel_radius(), self.pixel_inner_radius())
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub fn axis_angle(&self) -> f64 {
        self.axis_angle
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    #[must_use]
    pub fn grid_shape(&self) -> GridShape {
        self.grid_shape
    }

    #[must_use]
    pub fn pixel_radius(&self) -> f64 {
        self.radius.resolve(self.reference_radius)
    }

    #[must_use]
    pub fn pixel_inner_radius(&self) -> f64 {
        self.inner_radius.resolve(self.reference_radius)
    }

    #[must_use]
    pub fn axis_length(&self) -> f64 {
        self.pixel_radius() - self.pixel_inner_radius()
    }

    #[must_use]
    pub fn position_to_radius(&self, position: f64) -> f64 {
        let inner = self.pixel_inner_radius();
        inner + position * (self.pixel_radius() - inner)
    }

    #[must_use]
    pub fn position_to_point(&self, position: f64) -> Point {
        polar_point(self.center, self.axis_angle, self.position_to_radius(position))
    }

    /// Point at radius `position`, on the ray selected by `position2` along
    /// the grid sweep; `None` stays on the axis ray.
    pub fn position_to_point_at(&self, position: f64, position2: Option<f64>) -> AxisResult<Point> {
        let position = ensure_finite(position, "axis position")?;
        let angle = match position2 {
            Some(position2) => {
                let position2 = ensure_finite(position2, "angular position")?;
                self.start_angle + position2 * (self.end_angle - self.start_angle)
            }
            None => self.axis_angle,
        };
        Ok(polar_point(self.center, angle, self.position_to_radius(position)))
    }

    /// Position of the circle through `point`, clamped to the axis extent.
    #[must_use]
    pub fn point_to_position(&self, point: Point) -> f64 {
        let distance = (point - self.center).hypot();
        let inner = self.pixel_inner_radius();
        ((distance - inner) / (self.pixel_radius() - inner)).clamp(0.0, 1.0)
    }

    /// Perpendicular to the axis ray, on its counter-clockwise side.
    #[must_use]
    pub fn outward_normal(&self) -> Vec2 {
        Vec2::from_angle((self.axis_angle - 90.0).to_radians())
    }

    /// Segment of the axis ray between two positions.
    #[must_use]
    pub fn range_path(&self, start_position: f64, end_position: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.position_to_point(start_position));
        path.line_to(self.position_to_point(end_position));
        path
    }

    fn is_full_turn(&self) -> bool {
        (self.end_angle - self.start_angle).abs() >= FULL_TURN - 1e-9
    }

    fn arc_at(&self, path: &mut BezPath, radius: f64) {
        let (start, end) = (self.start_angle, self.end_angle);
        path.move_to(polar_point(self.center, start, radius));
        append_arc(
            path,
            self.center,
            radius,
            start.to_radians(),
            (end - start).to_radians(),
        );
    }

    fn ray_points(&self, radius: f64, ray_angles: &[f64]) -> Vec<Point> {
        ray_angles
            .iter()
            .map(|angle| polar_point(self.center, *angle, radius))
            .collect()
    }

    fn polygon_at(&self, path: &mut BezPath, radius: f64, ray_angles: &[f64], reverse: bool) {
        let mut points = self.ray_points(radius, ray_angles);
        if reverse {
            points.reverse();
        }
        let mut points = points.into_iter();
        if let Some(first) = points.next() {
            path.move_to(first);
            for point in points {
                path.line_to(point);
            }
        }
    }

    /// Grid line through `position`: an arc over the grid sweep, or chords
    /// between `ray_angles` when the grid shape is polygonal.
    #[must_use]
    pub fn grid_path(&self, position: f64, ray_angles: &[f64]) -> BezPath {
        let radius = self.position_to_radius(position);
        let mut path = BezPath::new();
        match self.grid_shape {
            GridShape::Polygons if !ray_angles.is_empty() => {
                self.polygon_at(&mut path, radius, ray_angles, false);
                if self.is_full_turn() {
                    path.close_path();
                }
            }
            _ => self.arc_at(&mut path, radius),
        }
        path
    }

    /// Closed ring between two positions following the grid shape.
    #[must_use]
    pub fn band_path(&self, start_position: f64, end_position: f64, ray_angles: &[f64]) -> BezPath {
        let first = self.position_to_radius(start_position);
        let second = self.position_to_radius(end_position);
        let (inner, outer) = (first.min(second), first.max(second));
        if outer <= inner {
            return BezPath::new();
        }

        if self.grid_shape == GridShape::Polygons && ray_angles.len() > 1 {
            let mut path = BezPath::new();
            self.polygon_at(&mut path, outer, ray_angles, false);
            if self.is_full_turn() {
                path.close_path();
                if inner > 0.0 {
                    self.polygon_at(&mut path, inner, ray_angles, true);
                    path.close_path();
                }
            } else {
                if inner > 0.0 {
                    for point in self.ray_points(inner, ray_angles).into_iter().rev() {
                        path.line_to(point);
                    }
                } else {
                    path.line_to(self.center);
                }
                path.close_path();
            }
            return path;
        }

        annular_sector(
            self.center,
            self.start_angle,
            self.end_angle,
            outer,
            inner,
            0.0,
        )
    }
}
