//! Stops and the routes that serve them.

use std::sync::Arc;

use geo::Point;
use itertools::Itertools;

use crate::identifiers::*;
use crate::models::types::*;

/// A route serving a stop. Owned by the stop that lists it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub id: RouteIdentifier,
    /// Short name (e.g., "70", "MLB")
    pub short_name: Arc<str>,
    /// Long name (e.g., "Grand", "MetroLink Blue")
    pub long_name: Arc<str>,
}

impl Route {
    pub fn new(
        id: impl Into<RouteIdentifier>,
        short_name: impl Into<Arc<str>>,
        long_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            long_name: long_name.into(),
        }
    }

    /// `"{short}-{long}"`, the form listed in stop popups
    pub fn display_name(&self) -> String {
        format!("{}-{}", self.short_name, self.long_name)
    }
}

/// A bus or light-rail stop.
///
/// `location` is x = longitude, y = latitude. Markers are rebuilt on every
/// fetch and never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct StopMarker {
    pub id: StopIdentifier,
    pub name: Arc<str>,
    pub route_type: RouteType,
    /// Routes in the order the backend listed them
    pub routes: Vec<Route>,
    pub location: Point,
    /// Census tract the stop falls in, when the backend resolved one
    pub tract_geoid: Option<Arc<str>>,
    pub wheelchair: Option<WheelchairBoarding>,
}

impl StopMarker {
    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    /// Display names of all routes, joined by `", "`
    pub fn routes_served(&self) -> String {
        self.routes.iter().map(Route::display_name).join(", ")
    }
}
