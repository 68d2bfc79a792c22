//! Pixel-space mapping of normalized axis positions.
//!
//! Geometry is domain agnostic: it only ever sees positions in `[0, 1]`
//! produced by [`AxisScale`](crate::core::AxisScale). Angles are in degrees,
//! measured clockwise from the positive x-axis in a y-down pixel space.

mod circular;
mod linear;
mod radial;

pub use circular::CircularGeometry;
pub use linear::LinearGeometry;
pub use radial::RadialGeometry;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{Arc, BezPath, PathEl, Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult, ensure_finite};

/// Flattening tolerance used when arcs are converted to Bézier segments.
pub const PATH_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// How a radial axis draws its grid between the rays of the angular axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GridShape {
    #[default]
    Circles,
    Polygons,
}

/// A radius given in pixels or as a percentage of a reference radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Radius {
    Pixels(f64),
    /// Percent (`0..=100`) of the container-supplied reference radius.
    Percent(f64),
}

impl Radius {
    #[must_use]
    pub fn resolve(self, reference_radius: f64) -> f64 {
        match self {
            Self::Pixels(pixels) => pixels,
            Self::Percent(percent) => reference_radius * percent / 100.0,
        }
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

/// Overrides applied when building a range outline.
///
/// Radii default to the geometry's own radii; they are ignored by linear
/// geometry. `corner_radius` rounds the four corners of the outline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeShape {
    pub outer_radius: Option<f64>,
    pub inner_radius: Option<f64>,
    pub corner_radius: Option<f64>,
}

/// Axis shape, one variant per supported geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisGeometry {
    Linear(LinearGeometry),
    Circular(CircularGeometry),
    Radial(RadialGeometry),
}

impl From<LinearGeometry> for AxisGeometry {
    fn from(value: LinearGeometry) -> Self {
        Self::Linear(value)
    }
}

impl From<CircularGeometry> for AxisGeometry {
    fn from(value: CircularGeometry) -> Self {
        Self::Circular(value)
    }
}

impl From<RadialGeometry> for AxisGeometry {
    fn from(value: RadialGeometry) -> Self {
        Self::Radial(value)
    }
}

impl AxisGeometry {
    pub fn validate(&self) -> AxisResult<()> {
        match self {
            Self::Linear(geometry) => geometry.validate(),
            Self::Circular(geometry) => geometry.validate(),
            Self::Radial(geometry) => geometry.validate(),
        }
    }

    /// Pixel length of the axis: run length, arc length or ray length.
    #[must_use]
    pub fn axis_length(&self) -> f64 {
        match self {
            Self::Linear(geometry) => geometry.axis_length(),
            Self::Circular(geometry) => geometry.axis_length(),
            Self::Radial(geometry) => geometry.axis_length(),
        }
    }

    pub fn position_to_point(&self, position: f64) -> AxisResult<Point> {
        let position = ensure_finite(position, "axis position")?;
        Ok(match self {
            Self::Linear(geometry) => geometry.position_to_point(position),
            Self::Circular(geometry) => geometry.position_to_point(position),
            Self::Radial(geometry) => geometry.position_to_point(position),
        })
    }

    /// Point at `position` with a second, angular position.
    ///
    /// Only radial axes have a second dimension: `position2` picks the ray
    /// along the grid sweep. Other geometries ignore it.
    pub fn position_to_point_at(&self, position: f64, position2: Option<f64>) -> AxisResult<Point> {
        match self {
            Self::Radial(geometry) => geometry.position_to_point_at(position, position2),
            _ => {
                if let Some(position2) = position2 {
                    ensure_finite(position2, "angular position")?;
                }
                self.position_to_point(position)
            }
        }
    }

    /// Best-effort inverse of [`Self::position_to_point`], clamped to `[0, 1]`.
    pub fn point_to_position(&self, point: Point) -> AxisResult<f64> {
        ensure_point(point)?;
        Ok(match self {
            Self::Linear(geometry) => geometry.point_to_position(point),
            Self::Circular(geometry) => geometry.point_to_position(point),
            Self::Radial(geometry) => geometry.point_to_position(point),
        })
    }

    /// Closed outline covering `[start_position, end_position]`.
    pub fn range_path(
        &self,
        start_position: f64,
        end_position: f64,
        shape: RangeShape,
    ) -> AxisResult<BezPath> {
        ensure_finite(start_position, "range start position")?;
        ensure_finite(end_position, "range end position")?;
        match self {
            Self::Linear(geometry) => geometry.range_path(start_position, end_position, shape),
            Self::Circular(geometry) => geometry.range_path(start_position, end_position, shape),
            Self::Radial(geometry) => Ok(geometry.range_path(start_position, end_position)),
        }
    }

    /// Grid line through `position`.
    ///
    /// `ray_angles` lists the angular rays a polygonal radial grid connects;
    /// other geometries ignore it.
    pub fn grid_path(&self, position: f64, ray_angles: &[f64]) -> AxisResult<BezPath> {
        let position = ensure_finite(position, "grid position")?;
        for angle in ray_angles {
            ensure_finite(*angle, "ray angle")?;
        }
        Ok(match self {
            Self::Linear(geometry) => geometry.grid_path(position),
            Self::Circular(geometry) => geometry.grid_path(position),
            Self::Radial(geometry) => geometry.grid_path(position, ray_angles),
        })
    }

    /// Unit vector pointing away from the plot area at `position`.
    #[must_use]
    pub fn outward_normal(&self, position: f64) -> Vec2 {
        match self {
            Self::Linear(geometry) => geometry.outward_normal(),
            Self::Circular(geometry) => geometry.outward_normal(position),
            Self::Radial(geometry) => geometry.outward_normal(),
        }
    }

    /// The axis line itself.
    #[must_use]
    pub fn axis_line_path(&self) -> BezPath {
        match self {
            Self::Linear(geometry) => geometry.axis_line_path(),
            Self::Circular(geometry) => geometry.arc_path(0.0, 1.0, geometry.pixel_radius()),
            Self::Radial(geometry) => geometry.range_path(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn as_circular(&self) -> Option<&CircularGeometry> {
        match self {
            Self::Circular(geometry) => Some(geometry),
            _ => None,
        }
    }
}

/// Whether every control point of `path` is finite.
#[must_use]
pub fn path_is_finite(path: &BezPath) -> bool {
    let finite = |point: Point| point.x.is_finite() && point.y.is_finite();
    path.elements().iter().all(|element| match *element {
        PathEl::MoveTo(point) | PathEl::LineTo(point) => finite(point),
        PathEl::QuadTo(first, second) => finite(first) && finite(second),
        PathEl::CurveTo(first, second, third) => finite(first) && finite(second) && finite(third),
        PathEl::ClosePath => true,
    })
}

pub(crate) fn ensure_point(point: Point) -> AxisResult<Point> {
    ensure_finite(point.x, "point x")?;
    ensure_finite(point.y, "point y")?;
    Ok(point)
}

pub(crate) fn validate_radii(outer: f64, inner: f64) -> AxisResult<()> {
    if !outer.is_finite() || !inner.is_finite() || inner < 0.0 || outer <= inner {
        return Err(AxisError::InvalidConfiguration(format!(
            "radius must exceed inner radius and inner radius must be >= 0 (radius={outer}, inner={inner})"
        )));
    }
    Ok(())
}

/// Point at `angle_degrees` on a circle of `radius` around `center`.
#[must_use]
pub fn polar_point(center: Point, angle_degrees: f64, radius: f64) -> Point {
    center + Vec2::from_angle(angle_degrees.to_radians()) * radius
}

fn polar(center: Point, angle: f64, radius: f64) -> Point {
    center + Vec2::from_angle(angle) * radius
}

pub(crate) fn append_arc(path: &mut BezPath, center: Point, radius: f64, start: f64, sweep: f64) {
    if radius <= 0.0 || sweep == 0.0 {
        return;
    }
    let arc = Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: start,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    path.extend(arc.append_iter(PATH_TOLERANCE));
}

fn append_corner(path: &mut BezPath, center: Point, radius: f64, from: Point, to: Point) {
    let start = (from - center).atan2();
    let mut sweep = (to - center).atan2() - start;
    if sweep > PI {
        sweep -= TAU;
    } else if sweep < -PI {
        sweep += TAU;
    }
    append_arc(path, center, radius, start, sweep);
}

/// Annular sector between `inner` and `outer` radii, optionally with rounded corners.
///
/// A sweep of a full turn or more yields a ring made of two opposite
/// subpaths; `inner == 0` yields a pie slice.
pub(crate) fn annular_sector(
    center: Point,
    start_degrees: f64,
    end_degrees: f64,
    outer: f64,
    inner: f64,
    corner_radius: f64,
) -> BezPath {
    let start = start_degrees.to_radians();
    let end = end_degrees.to_radians();
    let sweep = end - start;
    let mut path = BezPath::new();

    if sweep.abs() >= TAU - 1e-9 {
        let sweep = TAU.copysign(sweep);
        path.move_to(polar(center, start, outer));
        append_arc(&mut path, center, outer, start, sweep);
        path.close_path();
        if inner > 0.0 {
            path.move_to(polar(center, start + sweep, inner));
            append_arc(&mut path, center, inner, start + sweep, -sweep);
            path.close_path();
        }
        return path;
    }

    let corner = clamp_corner_radius(corner_radius, outer, inner, sweep.abs() / 2.0);
    if corner <= 0.0 {
        path.move_to(polar(center, start, outer));
        append_arc(&mut path, center, outer, start, sweep);
        if inner > 0.0 {
            path.line_to(polar(center, end, inner));
            append_arc(&mut path, center, inner, end, -sweep);
        } else {
            path.line_to(center);
        }
        path.close_path();
        return path;
    }

    let direction = if sweep < 0.0 { -1.0 } else { 1.0 };
    let outer_offset = (corner / (outer - corner)).asin();
    let outer_edge = (outer - corner) * outer_offset.cos();

    path.move_to(polar(center, start, outer_edge));
    let first_center = polar(center, start + direction * outer_offset, outer - corner);
    append_corner(
        &mut path,
        first_center,
        corner,
        polar(center, start, outer_edge),
        polar(center, start + direction * outer_offset, outer),
    );
    append_arc(
        &mut path,
        center,
        outer,
        start + direction * outer_offset,
        sweep - 2.0 * direction * outer_offset,
    );
    let second_center = polar(center, end - direction * outer_offset, outer - corner);
    append_corner(
        &mut path,
        second_center,
        corner,
        polar(center, end - direction * outer_offset, outer),
        polar(center, end, outer_edge),
    );

    if inner > 0.0 {
        let inner_offset = (corner / (inner + corner)).asin();
        let inner_edge = (inner + corner) * inner_offset.cos();
        path.line_to(polar(center, end, inner_edge));
        let third_center = polar(center, end - direction * inner_offset, inner + corner);
        append_corner(
            &mut path,
            third_center,
            corner,
            polar(center, end, inner_edge),
            polar(center, end - direction * inner_offset, inner),
        );
        append_arc(
            &mut path,
            center,
            inner,
            end - direction * inner_offset,
            -(sweep - 2.0 * direction * inner_offset),
        );
        let fourth_center = polar(center, start + direction * inner_offset, inner + corner);
        append_corner(
            &mut path,
            fourth_center,
            corner,
            polar(center, start + direction * inner_offset, inner),
            polar(center, start, inner_edge),
        );
    } else {
        path.line_to(center);
    }
    path.close_path();
    path
}

/// Largest corner radius whose tangent circles still fit the sector.
fn clamp_corner_radius(corner: f64, outer: f64, inner: f64, half_sweep: f64) -> f64 {
    if !corner.is_finite() || corner <= 0.0 {
        return 0.0;
    }
    let mut corner = corner.min((outer - inner) / 2.0);
    if half_sweep < FRAC_PI_2 {
        let sin = half_sweep.sin();
        corner = corner.min(outer * sin / (1.0 + sin));
        if inner > 0.0 {
            corner = corner.min(inner * sin / (1.0 - sin));
        }
    }
    corner.max(0.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kurbo::Shape;

    use super::*;

    #[test]
    fn percent_radius_resolves_against_reference() {
        assert_eq!(Radius::Percent(80.0).resolve(200.0), 160.0);
        assert_eq!(Radius::Pixels(42.0).resolve(200.0), 42.0);
    }

    #[test]
    fn quarter_sector_area_matches_annulus_fraction() {
        let path = annular_sector(Point::ORIGIN, 0.0, 90.0, 100.0, 50.0, 0.0);
        let expected = PI * (100.0_f64.powi(2) - 50.0_f64.powi(2)) / 4.0;
        assert_relative_eq!(path.area().abs(), expected, max_relative = 1e-3);
    }

    #[test]
    fn rounded_corners_shrink_the_sector() {
        let sharp = annular_sector(Point::ORIGIN, 0.0, 90.0, 100.0, 50.0, 0.0);
        let rounded = annular_sector(Point::ORIGIN, 0.0, 90.0, 100.0, 50.0, 10.0);
        assert!(path_is_finite(&rounded));
        assert!(rounded.area().abs() < sharp.area().abs());
        assert!(rounded.area().abs() > sharp.area().abs() * 0.95);
    }

    #[test]
    fn oversized_corner_radius_is_clamped() {
        let path = annular_sector(Point::ORIGIN, 0.0, 10.0, 100.0, 0.0, 500.0);
        assert!(path_is_finite(&path));
        assert!(path.area().abs() > 0.0);
    }

    #[test]
    fn full_turn_sector_is_a_ring() {
        let ring = annular_sector(Point::ORIGIN, -90.0, 270.0, 100.0, 50.0, 0.0);
        let expected = PI * (100.0_f64.powi(2) - 50.0_f64.powi(2));
        assert_relative_eq!(ring.area().abs(), expected, max_relative = 1e-3);
    }
}
