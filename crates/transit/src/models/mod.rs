//! Transit data models and types.

pub mod stop;
pub mod types;

// Re-exports for convenience
pub use stop::{Route, StopMarker};
pub use types::{Result, RouteType, TransitError, WheelchairBoarding};
