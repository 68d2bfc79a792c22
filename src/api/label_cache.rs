use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;

use crate::core::AxisValue;

use super::LabelFormatter;

/// Runtime metrics exposed by the axis label cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LabelCacheKey {
    Number(OrderedFloat<f64>),
    Date(DateTime<Utc>),
    Category(usize),
}

impl From<AxisValue> for LabelCacheKey {
    fn from(value: AxisValue) -> Self {
        match value {
            AxisValue::Number(number) => Self::Number(OrderedFloat(number)),
            AxisValue::Date(time) => Self::Date(time),
            AxisValue::Category(index) => Self::Category(index),
        }
    }
}

/// Formatted labels for one format string.
///
/// Entries are dropped whenever the active format string changes or the
/// cache reaches `MAX_ENTRIES`.
#[derive(Debug, Clone, Default)]
pub(super) struct LabelCache {
    format: String,
    entries: HashMap<LabelCacheKey, String>,
    hits: u64,
    misses: u64,
}

impl LabelCache {
    const MAX_ENTRIES: usize = 8192;

    pub(super) fn get_or_format(
        &mut self,
        value: AxisValue,
        format: &str,
        formatter: &dyn LabelFormatter,
    ) -> String {
        if self.format != format {
            self.entries.clear();
            format.clone_into(&mut self.format);
        }

        let key = LabelCacheKey::from(value);
        if let Some(text) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return text.clone();
        }

        self.misses = self.misses.saturating_add(1);
        let text = formatter.format(value, format);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.clear();
        }
        self.entries.insert(key, text.clone());
        text
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(super) fn stats(&self) -> LabelCacheStats {
        LabelCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}
