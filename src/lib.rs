//! chart-axis: coordinate axes for charting.
//!
//! Domain values flow one way per layout pass: [`core::AxisScale`] maps them
//! (through any axis breaks) onto normalized positions in `[0, 1]`,
//! [`geometry::AxisGeometry`] maps positions onto pixel points for linear,
//! circular and radial axes, [`placement::ItemPlacer`] anchors grid lines,
//! ticks and labels, and [`api::Axis::layout`] collects everything into a
//! backend-agnostic [`render::AxisFrame`].

pub mod api;
pub mod core;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod render;
pub mod telemetry;

pub use api::{Axis, AxisConfig};
pub use error::{AxisError, AxisResult, BreakError};
