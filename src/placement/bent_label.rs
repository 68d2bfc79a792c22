use std::f64::consts::FRAC_PI_2;

use kurbo::{Point, Vec2};

use crate::error::{AxisError, AxisResult, ensure_finite};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Measured label: content box plus the padding around it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelBox {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl LabelBox {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn outer_width(&self) -> f64 {
        self.width + self.padding.left + self.padding.right
    }

    #[must_use]
    pub fn outer_height(&self) -> f64 {
        self.height + self.padding.top + self.padding.bottom
    }

    fn validate(&self) -> AxisResult<()> {
        let padding = self.padding;
        for value in [
            self.width,
            self.height,
            padding.top,
            padding.right,
            padding.bottom,
            padding.left,
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AxisError::InvalidConfiguration(
                    "label box dimensions must be finite and >= 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// One glyph of a bent label: its center and rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub index: usize,
    pub point: Point,
    pub rotation: f64,
}

/// A label laid along a circle.
#[derive(Debug, Clone, PartialEq)]
pub struct BentLabel {
    pub glyphs: Vec<GlyphPlacement>,
    /// Half of the arc covered by the padded label, in degrees.
    pub angular_half_width: f64,
    /// Shift of the content center along the arc from the anchor angle, in pixels.
    pub dx: f64,
    /// Radial distance from the axis circle to the content center line;
    /// negative when the label sits inside the circle.
    pub dy: f64,
    /// Text runs counter-clockwise so it reads upright on the lower half.
    pub flipped: bool,
}

/// Lays a label along the circle of `radius` around `center`, centered on
/// `angle` (degrees).
///
/// `glyph_advances` are the horizontal advances of each glyph as measured by
/// the text service; their sum is expected to match `label.width`.
pub fn bend_label_along_arc(
    label: &LabelBox,
    glyph_advances: &[f64],
    center: Point,
    angle: f64,
    radius: f64,
    inside: bool,
) -> AxisResult<BentLabel> {
    label.validate()?;
    ensure_finite(angle, "label angle")?;
    ensure_finite(radius, "label radius")?;
    if radius <= 0.0 {
        return Err(AxisError::InvalidConfiguration(
            "bent label radius must be > 0".to_owned(),
        ));
    }
    if glyph_advances
        .iter()
        .any(|advance| !advance.is_finite() || *advance < 0.0)
    {
        return Err(AxisError::InvalidConfiguration(
            "glyph advances must be finite and >= 0".to_owned(),
        ));
    }

    let normalized = angle.rem_euclid(360.0);
    let flipped = normalized > 0.0 && normalized < 180.0;
    let direction = if flipped { -1.0 } else { 1.0 };

    // Upright text faces the center with its bottom edge; flipped text with its top.
    let padding = label.padding;
    let near_padding = match (flipped, inside) {
        (false, false) | (true, true) => padding.bottom,
        (true, false) | (false, true) => padding.top,
    };
    let offset = near_padding + label.height / 2.0;
    let dy = if inside { -offset } else { offset };
    let text_radius = radius + dy;
    if text_radius <= 0.0 {
        return Err(AxisError::InvalidConfiguration(
            "bent label does not fit inside the circle".to_owned(),
        ));
    }

    let anchor = angle.to_radians();
    let half_width = label.outer_width() / 2.0 / text_radius;
    let dx = (padding.left - padding.right) / 2.0;
    let content_start = anchor - direction * half_width + direction * padding.left / text_radius;

    let mut travelled = 0.0;
    let glyphs = glyph_advances
        .iter()
        .enumerate()
        .map(|(index, advance)| {
            let theta = content_start + direction * (travelled + advance / 2.0) / text_radius;
            travelled += advance;
            let tangent = if flipped { theta - FRAC_PI_2 } else { theta + FRAC_PI_2 };
            GlyphPlacement {
                index,
                point: center + Vec2::from_angle(theta) * text_radius,
                rotation: tangent.to_degrees(),
            }
        })
        .collect();

    Ok(BentLabel {
        glyphs,
        angular_half_width: half_width.to_degrees(),
        dx,
        dy,
        flipped,
    })
}
