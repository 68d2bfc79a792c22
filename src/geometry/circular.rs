use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult};

use super::{
    Radius, RangeShape, annular_sector, append_arc, polar_point, validate_radii,
};

/// Axis bent along an arc from `start_angle` to `end_angle` (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularGeometry {
    center: Point,
    start_angle: f64,
    end_angle: f64,
    radius: Radius,
    #[serde(default)]
    inner_radius: Radius,
    /// Radius that percentage radii resolve against.
    #[serde(default)]
    reference_radius: f64,
}

impl CircularGeometry {
    /// Builds a circular axis with pixel radii.
    pub fn new(
        center: Point,
        start_angle: f64,
        end_angle: f64,
        radius: f64,
        inner_radius: f64,
    ) -> AxisResult<Self> {
        Self::with_radii(
            center,
            start_angle,
            end_angle,
            Radius::Pixels(radius),
            Radius::Pixels(inner_radius),
            radius,
        )
    }

    /// Builds a circular axis whose radii may be percentages of `reference_radius`.
    pub fn with_radii(
        center: Point,
        start_angle: f64,
        end_angle: f64,
        radius: Radius,
        inner_radius: Radius,
        reference_radius: f64,
    ) -> AxisResult<Self> {
        let geometry = Self {
            center,
            start_angle,
            end_angle,
            radius,
            inner_radius,
            reference_radius,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Returns a copy laid out against a new container reference radius.
    pub fn with_reference_radius(mut self, reference_radius: f64) -> AxisResult<Self> {
        self.reference_radius = reference_radius;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AxisResult<()> {
        if !self.start_angle.is_finite()
            || !self.end_angle.is_finite()
            || self.start_angle == self.end_angle
        {
            return Err(AxisError::InvalidConfiguration(format!(
                "circular axis needs distinct finite angles (start={}, end={})",
                self.start_angle, self.end_angle
            )));
        }
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(AxisError::InvalidConfiguration(
                "circular axis center must be finite".to_owned(),
            ));
        }
        validate_radii(self.pixel_radius(), self.pixel_inner_radius())
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
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
    pub fn pixel_radius(&self) -> f64 {
        self.radius.resolve(self.reference_radius)
    }

    #[must_use]
    pub fn pixel_inner_radius(&self) -> f64 {
        self.inner_radius.resolve(self.reference_radius)
    }

    /// Whether positions `0` and `1` land on the same point.
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        (self.end_angle - self.start_angle).abs() >= 360.0 - 1e-9
    }

    /// Arc length of the axis in pixels.
    #[must_use]
    pub fn axis_length(&self) -> f64 {
        (self.end_angle - self.start_angle).abs().to_radians() * self.pixel_radius()
    }

    #[must_use]
    pub fn position_to_angle(&self, position: f64) -> f64 {
        self.start_angle + position * (self.end_angle - self.start_angle)
    }

    #[must_use]
    pub fn angle_to_position(&self, angle: f64) -> f64 {
        (angle - self.start_angle) / (self.end_angle - self.start_angle)
    }

    #[must_use]
    pub fn point_at(&self, angle: f64, radius: f64) -> Point {
        polar_point(self.center, angle, radius)
    }

    #[must_use]
    pub fn position_to_point(&self, position: f64) -> Point {
        self.point_at(self.position_to_angle(position), self.pixel_radius())
    }

    /// Angle of `point` folded into the axis span; points beyond the span snap
    /// to the angularly nearest end.
    #[must_use]
    pub fn point_to_position(&self, point: Point) -> f64 {
        let offset = point - self.center;
        if offset.hypot2() == 0.0 {
            return 0.0;
        }
        let angle = offset.atan2().to_degrees();
        let low = self.start_angle.min(self.end_angle);
        let high = self.start_angle.max(self.end_angle);

        let mut folded = low + (angle - low).rem_euclid(360.0);
        if folded > high {
            let past_high = folded - high;
            let before_low = low + 360.0 - folded;
            folded = if past_high <= before_low { high } else { low };
        }
        self.angle_to_position(folded).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn outward_normal(&self, position: f64) -> Vec2 {
        Vec2::from_angle(self.position_to_angle(position).to_radians())
    }

    /// Annular sector between two positions.
    pub fn range_path(
        &self,
        start_position: f64,
        end_position: f64,
        shape: RangeShape,
    ) -> AxisResult<BezPath> {
        let outer = shape.outer_radius.unwrap_or_else(|| self.pixel_radius());
        let inner = shape
            .inner_radius
            .unwrap_or_else(|| self.pixel_inner_radius());
        validate_radii(outer, inner)?;

        Ok(annular_sector(
            self.center,
            self.position_to_angle(start_position),
            self.position_to_angle(end_position),
            outer,
            inner,
            shape.corner_radius.unwrap_or(0.0),
        ))
    }

    /// Radial grid line from the inner to the outer radius.
    #[must_use]
    pub fn grid_path(&self, position: f64) -> BezPath {
        let angle = self.position_to_angle(position);
        let mut path = BezPath::new();
        path.move_to(self.point_at(angle, self.pixel_inner_radius()));
        path.line_to(self.point_at(angle, self.pixel_radius()));
        path
    }

    /// Open arc at `radius` between two positions.
    #[must_use]
    pub fn arc_path(&self, start_position: f64, end_position: f64, radius: f64) -> BezPath {
        let start = self.position_to_angle(start_position);
        let end = self.position_to_angle(end_position);
        let mut path = BezPath::new();
        path.move_to(self.point_at(start, radius));
        append_arc(
            &mut path,
            self.center,
            radius,
            start.to_radians(),
            (end - start).to_radians(),
        );
        path
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kurbo::Shape;

    use super::*;

    fn full_circle() -> CircularGeometry {
        CircularGeometry::new(Point::ORIGIN, -90.0, 270.0, 100.0, 0.0).expect("geometry")
    }

    #[test]
    fn position_zero_points_up_for_clock_layout() {
        let point = full_circle().position_to_point(0.0);
        assert_relative_eq!(point.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(point.y, -100.0, epsilon = 1e-9);

        let quarter = full_circle().position_to_point(0.25);
        assert_relative_eq!(quarter.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(quarter.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn point_to_position_inverts_angles() {
        let geometry = full_circle();
        for position in [0.0, 0.1, 0.25, 0.5, 0.8, 0.99] {
            let point = geometry.position_to_point(position);
            assert_relative_eq!(geometry.point_to_position(point), position, epsilon = 1e-9);
        }
    }

    #[test]
    fn points_outside_partial_span_snap_to_nearest_end() {
        let geometry =
            CircularGeometry::new(Point::ORIGIN, 0.0, 90.0, 100.0, 20.0).expect("geometry");
        assert_eq!(geometry.point_to_position(Point::new(10.0, -1.0)), 0.0);
        assert_eq!(geometry.point_to_position(Point::new(-1.0, 10.0)), 1.0);
        assert_relative_eq!(
            geometry.point_to_position(Point::new(10.0, 10.0)),
            0.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn degenerate_configurations_are_rejected() {
        assert!(CircularGeometry::new(Point::ORIGIN, 0.0, 0.0, 100.0, 0.0).is_err());
        assert!(CircularGeometry::new(Point::ORIGIN, 0.0, 90.0, 50.0, 50.0).is_err());
        assert!(CircularGeometry::new(Point::ORIGIN, 0.0, 90.0, 50.0, -1.0).is_err());
    }

    #[test]
    fn percent_radii_follow_reference() {
        let geometry = CircularGeometry::with_radii(
            Point::new(200.0, 200.0),
            0.0,
            360.0,
            Radius::Percent(80.0),
            Radius::Percent(40.0),
            150.0,
        )
        .expect("geometry");
        assert_eq!(geometry.pixel_radius(), 120.0);
        assert_eq!(geometry.pixel_inner_radius(), 60.0);

        let resized = geometry.with_reference_radius(100.0).expect("resize");
        assert_eq!(resized.pixel_radius(), 80.0);
        assert_relative_eq!(resized.axis_length(), 2.0 * std::f64::consts::PI * 80.0, epsilon = 1e-9);
    }

    #[test]
    fn range_path_respects_radius_overrides() {
        let geometry = full_circle();
        let shape = RangeShape {
            outer_radius: Some(80.0),
            inner_radius: Some(40.0),
            corner_radius: None,
        };
        let bounds = geometry
            .range_path(0.25, 0.5, shape)
            .expect("path")
            .bounding_box();
        assert_relative_eq!(bounds.x1, 80.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.y1, 80.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.x0, 0.0, epsilon = 1e-6);

        let inverted = RangeShape {
            outer_radius: Some(10.0),
            inner_radius: Some(20.0),
            corner_radius: None,
        };
        assert!(geometry.range_path(0.0, 0.5, inverted).is_err());
    }
}
