//! Map configuration.
//!
//! A single immutable [`MapConfig`] carries every endpoint, colour and size the
//! layer registry needs. It is built once at startup, optionally from a JSON
//! override file, and handed to [`LayerRegistry::new`](crate::registry::LayerRegistry::new).

use std::path::Path;

use palette::{Srgb, Srgba, WithAlpha};
use serde::Deserialize;

use crate::feature::{Extent, SpatialReference};
use crate::transform::choropleth::ChoroplethBreak;

// ============================================================================
// Colour
// ============================================================================

/// An sRGB colour with alpha.
///
/// Deserializes from a CSS colour name (`"mediumseagreen"`), `[r, g, b]` or
/// `[r, g, b, alpha]` with alpha in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "ColorSpec")]
pub struct Color(Srgba<f32>);

impl Color {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self(Srgb::new(red, green, blue).into_format::<f32>().with_alpha(alpha))
    }

    /// Look up a CSS colour keyword
    pub fn named(name: &str) -> Option<Self> {
        palette::named::from_str(&name.to_ascii_lowercase())
            .map(|c| Self(c.into_format::<f32>().with_alpha(1.0)))
    }

    pub fn alpha(&self) -> f32 {
        self.0.alpha
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let rgb: Srgb<u8> = self.0.color.into_format();
        [rgb.red, rgb.green, rgb.blue]
    }

    /// `rgba(r, g, b, a)` for the browser renderer
    pub fn to_css(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("rgba({r}, {g}, {b}, {})", self.alpha())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Named(String),
    Rgb([u8; 3]),
    Rgba(u8, u8, u8, f32),
}

impl TryFrom<ColorSpec> for Color {
    type Error = String;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Named(name) => {
                Color::named(&name).ok_or_else(|| format!("unknown colour name {name:?}"))
            }
            ColorSpec::Rgb([r, g, b]) => Ok(Color::rgb(r, g, b)),
            ColorSpec::Rgba(r, g, b, a) if (0.0..=1.0).contains(&a) => Ok(Color::rgba(r, g, b, a)),
            ColorSpec::Rgba(_, _, _, a) => Err(format!("alpha {a} outside 0.0..=1.0")),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub spatial_reference: SpatialReference,
    pub basemap: String,
    /// Initial visible bounding box
    pub extent: Extent,
    pub endpoints: Endpoints,
    pub style: StyleConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            spatial_reference: SpatialReference::WGS84,
            basemap: "dark-gray".to_owned(),
            extent: Extent {
                xmin: -90.32,
                ymin: 38.53,
                xmax: -90.15,
                ymax: 38.75,
            },
            endpoints: Endpoints::default(),
            style: StyleConfig::default(),
        }
    }
}

impl MapConfig {
    /// Load a JSON override file. Keys that are absent keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Backend paths, relative to the fetcher's base URL
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub bus_stops: String,
    pub rail_stops: String,
    /// Combined stop list of every service type
    pub all_stops: String,
    pub counties: String,
    pub tracts: String,
    pub cycling: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            bus_stops: "/stops/bus".to_owned(),
            rail_stops: "/stops/ml".to_owned(),
            all_stops: "/stops".to_owned(),
            counties: "/counties".to_owned(),
            tracts: "/tracts".to_owned(),
            cycling: "/bikes".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub bus_stop_size: f32,
    pub bus_stop_accessible: Color,
    pub bus_stop_not_accessible: Color,

    pub rail_stop_size: f32,
    pub rail_red: Color,
    pub rail_blue: Color,
    pub rail_both: Color,

    pub county_fill: Color,
    pub county_outline: Color,
    pub county_outline_width: f32,

    pub cycling_width: f32,
    pub cycling_paved: Color,
    pub cycling_unpaved: Color,
    pub cycling_gravel: Color,
    pub cycling_other: Color,

    /// Alpha applied to every population-density bucket
    pub tract_alpha: f32,
    /// Ascending, non-overlapping; the last max is a ceiling above any real value
    pub population_density_breaks: Vec<ChoroplethBreak>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            bus_stop_size: 4.0,
            bus_stop_accessible: Color::rgb(60, 179, 113), // mediumseagreen
            bus_stop_not_accessible: Color::rgba(180, 110, 200, 0.7),

            rail_stop_size: 10.0,
            rail_red: Color::rgb(255, 0, 0),
            rail_blue: Color::rgb(0, 0, 255),
            rail_both: Color::rgb(128, 0, 128),

            county_fill: Color::rgba(255, 255, 255, 0.0),
            county_outline: Color::rgba(250, 250, 250, 0.5),
            county_outline_width: 1.5,

            cycling_width: 0.8,
            cycling_paved: Color::rgba(208, 148, 75, 0.7),
            cycling_unpaved: Color::rgba(158, 145, 125, 0.7),
            cycling_gravel: Color::rgba(180, 80, 170, 0.7),
            cycling_other: Color::rgba(75, 108, 208, 0.7),

            tract_alpha: 0.15,
            population_density_breaks: vec![
                ChoroplethBreak::new(0.0, 2500.0, [94, 150, 98]),
                ChoroplethBreak::new(2500.0, 5000.0, [17, 200, 152]),
                ChoroplethBreak::new(5000.0, 7500.0, [0, 210, 255]),
                ChoroplethBreak::new(7500.0, 10000.0, [44, 60, 255]),
                ChoroplethBreak::new(10000.0, 99999.0, [50, 1, 63]),
            ],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
