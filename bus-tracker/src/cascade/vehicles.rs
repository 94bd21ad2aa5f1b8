//! Live vehicle tracking for the selected route.
//!
//! Vehicles are fetched once per direction selection and never polled.

use crate::cta::CtaError;
use crate::domain::{RouteId, VehiclePosition};

use super::fetch::Fetch;
use super::sequence::Collection;
use super::{QueryCascade, or_empty};

impl QueryCascade {
    /// Clear the current vehicles and ask for the route's positions.
    pub(super) fn track_vehicles(&mut self, route: RouteId) -> Fetch {
        self.state.vehicles.clear();
        self.state.status.vehicles_loaded = false;
        Fetch::Vehicles {
            token: self.tokens.issue(Collection::Vehicles),
            route,
        }
    }

    pub(super) fn apply_vehicles(&mut self, result: Result<Vec<VehiclePosition>, CtaError>) {
        self.state.vehicles = or_empty("vehicles", result);
        self.state.status.vehicles_loaded = true;
    }
}
