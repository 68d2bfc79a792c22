use kurbo::{BezPath, Point, Rect, RoundedRect, Shape, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult};

use super::{Orientation, PATH_TOLERANCE, RangeShape};

/// Straight horizontal or vertical axis.
///
/// `origin` is the top-left end of the axis run. Horizontal axes grow to the
/// right; vertical axes put position `0` at the bottom. `cross_extent` is the
/// pixel depth of the plot area that grid lines and fills span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearGeometry {
    orientation: Orientation,
    origin: Point,
    axis_length: f64,
    cross_extent: f64,
    #[serde(default)]
    inversed: bool,
    #[serde(default)]
    opposite: bool,
}

impl LinearGeometry {
    pub fn new(
        orientation: Orientation,
        origin: Point,
        axis_length: f64,
        cross_extent: f64,
    ) -> AxisResult<Self> {
        let geometry = Self {
            orientation,
            origin,
            axis_length,
            cross_extent,
            inversed: false,
            opposite: false,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn horizontal(origin: Point, axis_length: f64, cross_extent: f64) -> AxisResult<Self> {
        Self::new(Orientation::Horizontal, origin, axis_length, cross_extent)
    }

    pub fn vertical(origin: Point, axis_length: f64, cross_extent: f64) -> AxisResult<Self> {
        Self::new(Orientation::Vertical, origin, axis_length, cross_extent)
    }

    /// Flips the direction in which positions grow.
    #[must_use]
    pub fn with_inversed(mut self, inversed: bool) -> Self {
        self.inversed = inversed;
        self
    }

    /// Marks a top (horizontal) or right (vertical) axis; the plot area then
    /// lies on the other side of the axis line.
    #[must_use]
    pub fn with_opposite(mut self, opposite: bool) -> Self {
        self.opposite = opposite;
        self
    }

    pub fn validate(&self) -> AxisResult<()> {
        if !self.axis_length.is_finite() || self.axis_length <= 0.0 {
            return Err(AxisError::InvalidConfiguration(
                "linear axis length must be finite and > 0".to_owned(),
            ));
        }
        if !self.cross_extent.is_finite() || self.cross_extent < 0.0 {
            return Err(AxisError::InvalidConfiguration(
                "linear cross extent must be finite and >= 0".to_owned(),
            ));
        }
        if !self.origin.x.is_finite() || !self.origin.y.is_finite() {
            return Err(AxisError::InvalidConfiguration(
                "linear axis origin must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[must_use]
    pub fn axis_length(&self) -> f64 {
        self.axis_length
    }

    #[must_use]
    pub fn cross_extent(&self) -> f64 {
        self.cross_extent
    }

    #[must_use]
    pub fn is_inversed(&self) -> bool {
        self.inversed
    }

    #[must_use]
    pub fn is_opposite(&self) -> bool {
        self.opposite
    }

    /// Pixel offset of `position` along the axis run, from `origin`.
    #[must_use]
    pub fn position_to_coordinate(&self, position: f64) -> f64 {
        let directed = if self.inversed { 1.0 - position } else { position };
        match self.orientation {
            Orientation::Horizontal => directed * self.axis_length,
            Orientation::Vertical => (1.0 - directed) * self.axis_length,
        }
    }

    #[must_use]
    pub fn position_to_point(&self, position: f64) -> Point {
        let coordinate = self.position_to_coordinate(position);
        match self.orientation {
            Orientation::Horizontal => Point::new(self.origin.x + coordinate, self.origin.y),
            Orientation::Vertical => Point::new(self.origin.x, self.origin.y + coordinate),
        }
    }

    #[must_use]
    pub fn point_to_position(&self, point: Point) -> f64 {
        let coordinate = match self.orientation {
            Orientation::Horizontal => point.x - self.origin.x,
            Orientation::Vertical => point.y - self.origin.y,
        };
        let ratio = coordinate / self.axis_length;
        let directed = match self.orientation {
            Orientation::Horizontal => ratio,
            Orientation::Vertical => 1.0 - ratio,
        };
        let position = if self.inversed { 1.0 - directed } else { directed };
        position.clamp(0.0, 1.0)
    }

    /// Direction from the axis line into the plot area.
    #[must_use]
    pub fn inward_normal(&self) -> Vec2 {
        match (self.orientation, self.opposite) {
            (Orientation::Horizontal, false) => Vec2::new(0.0, -1.0),
            (Orientation::Horizontal, true) => Vec2::new(0.0, 1.0),
            (Orientation::Vertical, false) => Vec2::new(1.0, 0.0),
            (Orientation::Vertical, true) => Vec2::new(-1.0, 0.0),
        }
    }

    #[must_use]
    pub fn outward_normal(&self) -> Vec2 {
        -self.inward_normal()
    }

    /// Rectangle across the plot depth between two positions.
    pub fn range_path(
        &self,
        start_position: f64,
        end_position: f64,
        shape: RangeShape,
    ) -> AxisResult<BezPath> {
        let start = self.position_to_point(start_position);
        let end = self.position_to_point(end_position) + self.inward_normal() * self.cross_extent;
        let rect = Rect::from_points(start, end).abs();

        let corner = shape
            .corner_radius
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .map(|radius| radius.min(rect.width() / 2.0).min(rect.height() / 2.0));
        Ok(match corner {
            Some(radius) if radius > 0.0 => {
                RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE)
            }
            _ => rect.to_path(PATH_TOLERANCE),
        })
    }

    #[must_use]
    pub fn grid_path(&self, position: f64) -> BezPath {
        let start = self.position_to_point(position);
        let mut path = BezPath::new();
        path.move_to(start);
        path.line_to(start + self.inward_normal() * self.cross_extent);
        path
    }

    #[must_use]
    pub fn axis_line_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.position_to_point(0.0));
        path.line_to(self.position_to_point(1.0));
        path
    }
}
