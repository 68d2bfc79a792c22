pub mod breaks;
pub mod nice;
pub mod primitives;
pub mod scale;
pub mod types;

pub use breaks::{AdjustedBreak, AxisBreak, BreakSegment, BreakSet, SegmentKind};
pub use nice::{DEFAULT_ROUND_STEPS, DurationUnit, NiceRange, compute_nice_range, nice_step};
pub use scale::AxisScale;
pub use types::{AxisValue, Cell};
