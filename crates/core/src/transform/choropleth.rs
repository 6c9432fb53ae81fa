//! Bucketed fill symbols for choropleth layers.

use serde::Deserialize;

use crate::config::Color;
use crate::registry::symbol::{ClassBreak, Symbol};

/// One bucket: values in `min..=max` are filled with `rgb`.
///
/// Lists of breaks must be ascending and non-overlapping, and the last `max`
/// must sit above any real data value. Neither is checked here.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ChoroplethBreak {
    pub min: f64,
    pub max: f64,
    pub rgb: [u8; 3],
}

impl ChoroplethBreak {
    pub const fn new(min: f64, max: f64, rgb: [u8; 3]) -> Self {
        Self { min, max, rgb }
    }
}

pub fn build_class_breaks(breaks: &[ChoroplethBreak], alpha: f32) -> Vec<ClassBreak> {
    breaks
        .iter()
        .map(|b| {
            let [r, g, bl] = b.rgb;
            ClassBreak {
                min: b.min,
                max: b.max,
                label: format!("{} - {}", b.min, b.max),
                symbol: Symbol::fill(Color::rgba(r, g, bl, alpha)),
            }
        })
        .collect()
}

/// First bucket whose inclusive range holds `value`
pub fn classify(breaks: &[ClassBreak], value: f64) -> Option<&ClassBreak> {
    breaks.iter().find(|b| b.min <= value && value <= b.max)
}
