//! Selection state and the collections derived from it.

use crate::domain::{Direction, Prediction, Route, Stop, UserLocation, VehiclePosition};

/// The rider's dependent selections.
///
/// `direction` is only set while `route` is; `stop` only while `direction`
/// is. The cascade's transitions maintain this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub route: Option<Route>,
    pub direction: Option<Direction>,
    pub stop: Option<Stop>,
}

/// Completion flags used to tell "still loading" from "loaded, empty".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStatus {
    /// The stops fetch for the current direction has completed.
    pub stops_loaded: bool,
    /// The vehicles fetch for the current direction has completed.
    pub vehicles_loaded: bool,
    /// A predictions fetch has succeeded since the last upstream change.
    pub predictions_attempted: bool,
}

/// Everything the cascade owns. Collections are replaced wholesale by each
/// accepted fetch, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeState {
    pub selection: SelectionState,
    pub routes: Vec<Route>,
    pub directions: Vec<Direction>,
    pub stops: Vec<Stop>,
    pub predictions: Vec<Prediction>,
    pub vehicles: Vec<VehiclePosition>,
    pub user_location: Option<UserLocation>,
    pub status: FetchStatus,
}

impl CascadeState {
    /// Look up a loaded route by id.
    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id.as_str() == id)
    }

    /// Look up a loaded direction by value.
    pub fn direction_by_value(&self, value: &str) -> Option<&Direction> {
        self.directions.iter().find(|d| d.as_str() == value)
    }

    /// Look up a loaded stop by id.
    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id.as_str() == id)
    }
}
