//! # metro-transit
//!
//! Transit entities as the metro backend reports them: stops, the routes that
//! serve them, and the closed set of service types a stop can belong to.
//!
//! ## Example
//!
//! ```
//! use metro_transit::prelude::*;
//! use geo::Point;
//!
//! let stop = StopMarker {
//!     id: StopIdentifier::new("14328"),
//!     name: "Grand MetroLink Station".into(),
//!     route_type: RouteType::from_code("mlc").unwrap(),
//!     routes: vec![Route::new("ml", "MLR", "MetroLink Red")],
//!     location: Point::new(-90.2316, 38.6311),
//!     tract_geoid: None,
//!     wheelchair: None,
//! };
//!
//! assert_eq!(stop.route_type.category_label(), "Light Rail");
//! assert_eq!(stop.routes_served(), "MLR-MetroLink Red");
//! ```

pub mod identifiers;
pub mod models;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::{RouteIdentifier, StopIdentifier};
    pub use crate::models::stop::{Route, StopMarker};
    pub use crate::models::types::{RouteType, TransitError, WheelchairBoarding};
}

pub use prelude::*;
