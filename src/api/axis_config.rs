use serde::{Deserialize, Serialize};

use crate::core::{AxisBreak, DurationUnit};
use crate::error::{AxisError, AxisResult};
use crate::geometry::Radius;

/// Kind of values an axis carries; drives item generation and label formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValueKind {
    #[default]
    Number,
    /// Unix seconds, labelled as UTC dates.
    Date,
    /// Ordinal category indices; each category owns the cell `[i, i + 1]`.
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NiceConfig {
    pub desired_grid_count: i32,
    pub strict_min_max: bool,
    pub duration_unit: Option<DurationUnit>,
}

impl Default for NiceConfig {
    fn default() -> Self {
        Self {
            desired_grid_count: 5,
            strict_min_max: false,
            duration_unit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub visible: bool,
    /// Location of the grid line inside a category cell.
    pub location: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            visible: true,
            location: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub visible: bool,
    pub length: f64,
    pub inside: bool,
    pub location: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            visible: true,
            length: 5.0,
            inside: false,
            location: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub visible: bool,
    /// Distance from the axis line, in pixels or percent of the axis radius.
    pub offset: Radius,
    pub inside: bool,
    pub location: f64,
    /// Bend labels along the circle on circular axes.
    pub bent: bool,
    pub padding: f64,
    /// Format string handed to the label formatter; empty picks a default
    /// from the grid step or duration unit.
    pub format: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            visible: true,
            offset: Radius::Pixels(4.0),
            inside: false,
            location: 0.0,
            bent: false,
            padding: 0.0,
            format: String::new(),
        }
    }
}

/// Complete, serializable description of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub value_kind: ValueKind,
    pub nice: NiceConfig,
    pub grid: GridConfig,
    pub ticks: TickConfig,
    pub labels: LabelConfig,
    pub show_axis_line: bool,
    pub break_fills: bool,
    pub breaks: Vec<AxisBreak>,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            value_kind: ValueKind::Number,
            nice: NiceConfig::default(),
            grid: GridConfig::default(),
            ticks: TickConfig::default(),
            labels: LabelConfig::default(),
            show_axis_line: true,
            break_fills: true,
            breaks: Vec::new(),
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn with_value_kind(mut self, value_kind: ValueKind) -> Self {
        self.value_kind = value_kind;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: LabelConfig) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_break(mut self, axis_break: AxisBreak) -> Self {
        self.breaks.push(axis_break);
        self
    }

    pub fn validate(&self) -> AxisResult<()> {
        for (name, location) in [
            ("grid location", self.grid.location),
            ("tick location", self.ticks.location),
            ("label location", self.labels.location),
        ] {
            if !location.is_finite() || !(0.0..=1.0).contains(&location) {
                return Err(AxisError::InvalidConfiguration(format!(
                    "{name} must be finite and in [0, 1]"
                )));
            }
        }
        if !self.ticks.length.is_finite() || self.ticks.length < 0.0 {
            return Err(AxisError::InvalidConfiguration(
                "tick length must be finite and >= 0".to_owned(),
            ));
        }
        let offset = match self.labels.offset {
            Radius::Pixels(value) | Radius::Percent(value) => value,
        };
        if !offset.is_finite() {
            return Err(AxisError::NonFinite {
                what: "label offset",
            });
        }
        if !self.labels.padding.is_finite() || self.labels.padding < 0.0 {
            return Err(AxisError::InvalidConfiguration(
                "label padding must be finite and >= 0".to_owned(),
            ));
        }
        for axis_break in &self.breaks {
            axis_break.validate()?;
        }
        Ok(())
    }
}
