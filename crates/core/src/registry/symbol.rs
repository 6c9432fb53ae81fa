use crate::config::Color;
use crate::feature::{AttributeValue, Feature};
use crate::transform::choropleth;

// ============================================================================
// Symbols
// ============================================================================

/// A solid stroke
#[derive(Clone, Debug, PartialEq)]
pub struct LineSymbol {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    /// Circle marker, `size` in points
    Marker {
        color: Color,
        size: f32,
    },
    Fill {
        color: Color,
        outline: Option<LineSymbol>,
    },
    Line(LineSymbol),
}

impl Symbol {
    pub fn circle(color: Color, size: f32) -> Self {
        Symbol::Marker { color, size }
    }

    pub fn fill(color: Color) -> Self {
        Symbol::Fill {
            color,
            outline: None,
        }
    }

    pub fn line(color: Color, width: f32) -> Self {
        Symbol::Line(LineSymbol { color, width })
    }

    /// Only meaningful on fills; other symbols are returned unchanged.
    pub fn with_outline(self, width: f32, outline_color: Color) -> Self {
        match self {
            Symbol::Fill { color, .. } => Symbol::Fill {
                color,
                outline: Some(LineSymbol {
                    color: outline_color,
                    width,
                }),
            },
            other => other,
        }
    }

    /// The colour a legend swatch shows
    pub fn color(&self) -> Color {
        match self {
            Symbol::Marker { color, .. } | Symbol::Fill { color, .. } => *color,
            Symbol::Line(line) => line.color,
        }
    }
}

// ============================================================================
// Renderers
// ============================================================================

/// Features whose field matches any of `values` draw with `symbol`
#[derive(Clone, Debug, PartialEq)]
pub struct ValueClass {
    pub label: String,
    pub values: Vec<String>,
    pub symbol: Symbol,
}

impl ValueClass {
    pub fn new(label: impl Into<String>, values: &[&str], symbol: Symbol) -> Self {
        Self {
            label: label.into(),
            values: values.iter().map(|v| (*v).to_owned()).collect(),
            symbol,
        }
    }
}

/// Numeric bucket with inclusive bounds
#[derive(Clone, Debug, PartialEq)]
pub struct ClassBreak {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub symbol: Symbol,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Renderer {
    /// Every feature draws the same way
    Simple { label: Option<String>, symbol: Symbol },
    /// Categorical by a text field
    UniqueValue {
        field: String,
        classes: Vec<ValueClass>,
        default: Option<(String, Symbol)>,
    },
    /// Bucketed by a numeric field
    ClassBreaks { field: String, breaks: Vec<ClassBreak> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

impl Renderer {
    pub fn simple(symbol: Symbol) -> Self {
        Renderer::Simple {
            label: None,
            symbol,
        }
    }

    /// Symbol a feature draws with, or `None` if no rule matches it
    pub fn symbol_for(&self, feature: &Feature) -> Option<&Symbol> {
        match self {
            Renderer::Simple { symbol, .. } => Some(symbol),
            Renderer::UniqueValue {
                field,
                classes,
                default,
            } => {
                let value = feature.attribute(field).and_then(AttributeValue::as_str);
                classes
                    .iter()
                    .find(|class| value.is_some_and(|v| class.values.iter().any(|c| c == v)))
                    .map(|class| &class.symbol)
                    .or(default.as_ref().map(|(_, symbol)| symbol))
            }
            Renderer::ClassBreaks { field, breaks } => feature
                .attribute(field)
                .and_then(AttributeValue::as_f64)
                .and_then(|value| choropleth::classify(breaks, value))
                .map(|b| &b.symbol),
        }
    }

    /// One entry per rule, in declaration order
    pub fn legend(&self, layer_title: &str) -> Vec<LegendEntry> {
        let entry = |label: &str, symbol: &Symbol| LegendEntry {
            label: label.to_owned(),
            color: symbol.color(),
        };

        match self {
            Renderer::Simple { label, symbol } => {
                vec![entry(label.as_deref().unwrap_or(layer_title), symbol)]
            }
            Renderer::UniqueValue {
                classes, default, ..
            } => classes
                .iter()
                .map(|c| entry(c.label.as_str(), &c.symbol))
                .chain(default.iter().map(|(label, symbol)| entry(label.as_str(), symbol)))
                .collect(),
            Renderer::ClassBreaks { breaks, .. } => {
                breaks.iter().map(|b| entry(b.label.as_str(), &b.symbol)).collect()
            }
        }
    }
}
