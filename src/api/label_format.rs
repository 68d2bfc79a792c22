use chrono::{DateTime, Utc};
use smallvec::SmallVec;

use crate::core::{AxisValue, DurationUnit};

/// Text-formatting service used for axis labels.
pub trait LabelFormatter {
    fn format(&self, value: AxisValue, format: &str) -> String;
}

/// Rendered size of one label and the advance of each of its characters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelMetrics {
    pub width: f64,
    pub height: f64,
    pub glyph_advances: SmallVec<[f64; 16]>,
}

/// Text-measuring service used to bend labels and size label boxes.
pub trait TextMeasurer {
    fn measure(&self, text: &str) -> LabelMetrics;
}

/// Built-in formatter.
///
/// Numbers accept `""` (shortest form) or a `0.00`-style pattern fixing the
/// number of decimals. Dates use `chrono` strftime patterns in UTC.
/// Categories print their configured name, or the index when unnamed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultLabelFormatter {
    categories: Vec<String>,
}

impl DefaultLabelFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

impl LabelFormatter for DefaultLabelFormatter {
    fn format(&self, value: AxisValue, format: &str) -> String {
        match value {
            AxisValue::Number(number) => format_number(number, format),
            AxisValue::Date(time) => format_date(time, format),
            AxisValue::Category(index) => self
                .categories
                .get(index)
                .cloned()
                .unwrap_or_else(|| index.to_string()),
        }
    }
}

/// Monospace estimate for hosts without a text engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthMeasurer {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for FixedWidthMeasurer {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 12.0,
        }
    }
}

impl TextMeasurer for FixedWidthMeasurer {
    fn measure(&self, text: &str) -> LabelMetrics {
        let glyph_advances: SmallVec<[f64; 16]> =
            text.chars().map(|_| self.char_width).collect();
        LabelMetrics {
            width: glyph_advances.iter().sum(),
            height: self.line_height,
            glyph_advances,
        }
    }
}

/// Decimal pattern (`0`, `0.0`, `0.00`, ...) showing the digits `step` needs.
#[must_use]
pub fn number_format_for_step(step: f64) -> String {
    if !step.is_finite() || step <= 0.0 {
        return String::new();
    }
    let decimals = (-step.log10().floor()).clamp(0.0, 12.0) as usize;
    // Steps like 0.25 need one digit more than their magnitude.
    let decimals = (decimals..=12)
        .find(|digits| {
            let scale = 10_f64.powi(*digits as i32);
            ((step * scale).round() - step * scale).abs() <= 1e-9 * scale.max(1.0)
        })
        .unwrap_or(decimals);
    if decimals == 0 {
        "0".to_owned()
    } else {
        format!("0.{}", "0".repeat(decimals))
    }
}

/// Default strftime pattern for a date axis snapped to `unit`.
#[must_use]
pub fn date_format_for_unit(unit: Option<DurationUnit>) -> &'static str {
    match unit {
        Some(DurationUnit::Second) => "%H:%M:%S",
        Some(DurationUnit::Minute | DurationUnit::Hour) => "%H:%M",
        Some(DurationUnit::Day) | None => "%Y-%m-%d",
    }
}

fn format_number(value: f64, format: &str) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }
    let precision = match format.split_once('.') {
        Some((_, decimals)) => Some(decimals.chars().filter(|digit| *digit == '0').count()),
        None if format.starts_with('0') => Some(0),
        None => None,
    };
    let text = match precision {
        Some(precision) => format!("{value:.precision$}"),
        None => {
            let text = format!("{value:.10}");
            text.trim_end_matches('0').trim_end_matches('.').to_owned()
        }
    };
    if text.trim_start_matches('-').chars().all(|digit| digit == '0' || digit == '.') {
        text.trim_start_matches('-').to_owned()
    } else {
        text
    }
}

fn format_date(time: DateTime<Utc>, format: &str) -> String {
    let pattern = if format.is_empty() { "%Y-%m-%d %H:%M:%S" } else { format };
    time.format(pattern).to_string()
}
