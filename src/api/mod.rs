//! Axis facade: owns a scale and a geometry and turns them into draw lists.

mod axis;
mod axis_config;
mod label_cache;
mod label_format;

pub use axis::{Axis, SharedLabelFormatter, SharedTextMeasurer};
pub use axis_config::{AxisConfig, GridConfig, LabelConfig, NiceConfig, TickConfig, ValueKind};
pub use label_cache::LabelCacheStats;
pub use label_format::{
    DefaultLabelFormatter, FixedWidthMeasurer, LabelFormatter, LabelMetrics, TextMeasurer,
    date_format_for_unit, number_format_for_step,
};
