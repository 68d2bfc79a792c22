use kurbo::{BezPath, Point};

use crate::error::{AxisError, AxisResult};
use crate::geometry::path_is_finite;
use crate::placement::GlyphPlacement;

/// What a path in an axis frame represents; backends map roles to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRole {
    AxisLine,
    Grid,
    Tick,
    /// Closed outline of a compressed break.
    BreakFill,
}

/// Draw command for one stroked or filled path in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPrimitive {
    pub role: PathRole,
    pub path: BezPath,
}

impl PathPrimitive {
    #[must_use]
    pub fn new(role: PathRole, path: BezPath) -> Self {
        Self { role, path }
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.role == PathRole::BreakFill
    }

    pub fn validate(&self) -> AxisResult<()> {
        if !path_is_finite(&self.path) {
            return Err(AxisError::NonFinite {
                what: "path coordinates",
            });
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to `TextPrimitive::anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Draw command for one straight label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub anchor: Point,
    /// Rotation around the anchor in degrees.
    pub rotation: f64,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, anchor: Point, h_align: TextHAlign) -> Self {
        Self {
            text: text.into(),
            anchor,
            rotation: 0.0,
            h_align,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn validate(&self) -> AxisResult<()> {
        if self.text.is_empty() {
            return Err(AxisError::InvalidConfiguration(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.anchor.x.is_finite() || !self.anchor.y.is_finite() || !self.rotation.is_finite() {
            return Err(AxisError::NonFinite {
                what: "text anchor",
            });
        }
        Ok(())
    }
}

/// Draw command for a label bent along an arc, one placement per character.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRunPrimitive {
    pub text: String,
    pub glyphs: Vec<GlyphPlacement>,
}

impl GlyphRunPrimitive {
    pub fn validate(&self) -> AxisResult<()> {
        if self.glyphs.len() != self.text.chars().count() {
            return Err(AxisError::InvalidConfiguration(format!(
                "glyph run has {} placements for {} characters",
                self.glyphs.len(),
                self.text.chars().count()
            )));
        }
        for glyph in &self.glyphs {
            if !glyph.point.x.is_finite() || !glyph.point.y.is_finite() || !glyph.rotation.is_finite()
            {
                return Err(AxisError::NonFinite {
                    what: "glyph placement",
                });
            }
        }
        Ok(())
    }
}
