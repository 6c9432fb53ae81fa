//! Core enums and errors for transit data.

use std::sync::Arc;

// ============================================================================
// Enums
// ============================================================================

/// Service type of a stop as reported by the metro backend.
///
/// The set is closed: a code outside it is a data error, never a silent
/// fallback to some default category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteType {
    Bus,
    /// MetroLink Red Line only
    RailRed,
    /// MetroLink Blue Line only
    RailBlue,
    /// Served by both MetroLink lines
    RailBoth,
}

impl RouteType {
    pub const ALL: [RouteType; 4] = [
        RouteType::Bus,
        RouteType::RailRed,
        RouteType::RailBlue,
        RouteType::RailBoth,
    ];

    /// Parse the backend's `typ` code (`bus`, `mlr`, `mlb`, `mlc`)
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "bus" => Ok(Self::Bus),
            "mlr" => Ok(Self::RailRed),
            "mlb" => Ok(Self::RailBlue),
            "mlc" => Ok(Self::RailBoth),
            other => Err(TransitError::UnknownRouteType(other.to_owned())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::RailRed => "mlr",
            Self::RailBlue => "mlb",
            Self::RailBoth => "mlc",
        }
    }

    /// Human-readable stop category shown in popups
    pub fn category_label(&self) -> &'static str {
        match self {
            Self::Bus => "Bus",
            Self::RailRed | Self::RailBlue | Self::RailBoth => "Light Rail",
        }
    }

    /// Legend label for the individual line
    pub fn line_label(&self) -> &'static str {
        match self {
            Self::Bus => "Bus",
            Self::RailRed => "Red Line",
            Self::RailBlue => "Blue Line",
            Self::RailBoth => "Blue/Red Lines",
        }
    }

    pub fn is_rail(&self) -> bool {
        !matches!(self, Self::Bus)
    }
}

/// Wheelchair boarding as reported in the `whlChr` field.
///
/// Values outside the two known codes are kept verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WheelchairBoarding {
    Possible,
    NotPossible,
    Other(Arc<str>),
}

impl WheelchairBoarding {
    pub const POSSIBLE: &'static str = "POSSIBLE";
    pub const NOT_POSSIBLE: &'static str = "NOT_POSSIBLE";

    pub fn from_code(code: &str) -> Self {
        match code {
            Self::POSSIBLE => Self::Possible,
            Self::NOT_POSSIBLE => Self::NotPossible,
            other => Self::Other(other.into()),
        }
    }

    /// The backend code this value was parsed from
    pub fn code(&self) -> &str {
        match self {
            Self::Possible => Self::POSSIBLE,
            Self::NotPossible => Self::NOT_POSSIBLE,
            Self::Other(code) => code,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Unknown route type: {0:?}")]
    UnknownRouteType(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
