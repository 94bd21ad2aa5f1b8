//! The dependent-query cascade: route → direction → stop.
//!
//! `QueryCascade` is a synchronous state container. Each transition
//! updates the selection, clears everything downstream of the change, and
//! returns the [`Fetch`]es it wants run. Whoever runs them hands the
//! completions back through [`QueryCascade::apply`], which drops any result
//! whose token has been superseded in the meantime.
//!
//! Clearing is always synchronous: after `set_route` returns, the old
//! direction, stop, stops, predictions and vehicles are gone, whether or not
//! the new directions have arrived.

mod fetch;
mod predictions;
mod reset;
mod sequence;
mod state;
mod vehicles;


pub use fetch::{Fetch, Outcome};
pub use sequence::{Collection, FetchToken, TokenLedger};
pub use state::{CascadeState, FetchStatus, SelectionState};

use tracing::{debug, warn};

use crate::cta::CtaError;
use crate::domain::{Direction, Route, Stop};

/// Selection state plus the fetch bookkeeping that keeps it consistent.
#[derive(Debug, Default)]
pub struct QueryCascade {
    state: CascadeState,
    tokens: TokenLedger,
}

impl QueryCascade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &CascadeState {
        &self.state
    }

    /// Fetches to run when a session starts: the route list and the
    /// rider's location.
    pub fn start(&mut self) -> Vec<Fetch> {
        vec![
            Fetch::Routes {
                token: self.tokens.issue(Collection::Routes),
            },
            Fetch::Location {
                token: self.tokens.issue(Collection::Location),
            },
        ]
    }

    /// Select a route.
    ///
    /// Clears the direction, stop and every collection below the route,
    /// supersedes their pending fetches, and asks for the route's directions.
    pub fn set_route(&mut self, route: Route) -> Fetch {
        debug!(route = %route.id, "route selected");
        let route_id = route.id.clone();

        self.state.selection = SelectionState {
            route: Some(route),
            direction: None,
            stop: None,
        };
        self.state.directions.clear();
        self.state.stops.clear();
        self.state.predictions.clear();
        self.state.vehicles.clear();
        self.state.status = FetchStatus::default();

        self.tokens.invalidate(Collection::Stops);
        self.tokens.invalidate(Collection::Vehicles);
        self.tokens.invalidate(Collection::Predictions);

        Fetch::Directions {
            token: self.tokens.issue(Collection::Directions),
            route: route_id,
        }
    }

    /// Select a direction on the current route.
    ///
    /// Clears the stop, stops, predictions and vehicles, then asks for the
    /// stops of (route, direction) and the vehicles of the route. The two
    /// fetches are independent. Ignored when no route is selected.
    pub fn set_direction(&mut self, direction: Direction) -> Vec<Fetch> {
        let Some(route_id) = self.state.selection.route.as_ref().map(|r| r.id.clone()) else {
            debug!(%direction, "ignoring direction without a route");
            return Vec::new();
        };
        debug!(route = %route_id, %direction, "direction selected");

        self.state.selection.direction = Some(direction.clone());
        self.state.selection.stop = None;
        self.state.stops.clear();
        self.state.predictions.clear();
        self.state.status.stops_loaded = false;
        self.state.status.predictions_attempted = false;
        self.tokens.invalidate(Collection::Predictions);

        let stops = Fetch::Stops {
            token: self.tokens.issue(Collection::Stops),
            route: route_id.clone(),
            direction,
        };
        let vehicles = self.track_vehicles(route_id);
        vec![stops, vehicles]
    }

    /// Select a stop. No fetch follows; predictions are requested
    /// explicitly. Ignored when no direction is selected.
    ///
    /// Returns whether the selection changed.
    pub fn set_stop(&mut self, stop: Stop) -> bool {
        if self.state.selection.direction.is_none() {
            debug!(stop = %stop.id, "ignoring stop without a direction");
            return false;
        }
        debug!(stop = %stop.id, "stop selected");

        self.state.selection.stop = Some(stop);
        // A pending predictions fetch was keyed by the previous stop.
        self.tokens.invalidate(Collection::Predictions);
        true
    }

    /// Apply a completed fetch.
    ///
    /// Returns whether the state changed. Superseded results change nothing.
    pub fn apply(&mut self, outcome: Outcome) -> bool {
        let token = outcome.token();
        if !self.tokens.is_current(token) {
            debug!(collection = ?token.collection(), "discarding superseded result");
            return false;
        }

        match outcome {
            Outcome::Routes { result, .. } => {
                self.state.routes = or_empty("routes", result);
            }
            Outcome::Directions { result, .. } => {
                self.state.directions = or_empty("directions", result);
            }
            Outcome::Stops { result, .. } => {
                self.state.stops = or_empty("stops", result);
                self.state.status.stops_loaded = true;
            }
            Outcome::Vehicles { result, .. } => {
                self.apply_vehicles(result);
            }
            Outcome::Predictions { result, .. } => {
                return self.apply_predictions(result);
            }
            Outcome::Location { location, .. } => {
                self.state.user_location = Some(location);
            }
        }
        true
    }
}

/// Degrade a failed fetch to an empty collection.
fn or_empty<T>(collection: &'static str, result: Result<Vec<T>, CtaError>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(collection, error = %e, "fetch failed, showing no data");
            Vec::new()
        }
    }
}
