mod frame;
mod null_renderer;
mod primitives;

pub use frame::AxisFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{GlyphRunPrimitive, PathPrimitive, PathRole, TextHAlign, TextPrimitive};

use crate::error::AxisResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized `AxisFrame`, so painting code stays
/// isolated from scale, break and geometry math.
pub trait AxisRenderer {
    fn render(&mut self, frame: &AxisFrame) -> AxisResult<()>;
}
