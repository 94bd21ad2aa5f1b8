//! Returning the cascade to its initial state.

use tracing::debug;

use super::QueryCascade;
use super::sequence::Collection;
use super::state::CascadeState;

impl QueryCascade {
    /// Clear every selection, every derived collection, the rider's
    /// location and all fetch flags in one step.
    ///
    /// Pending fetches (a still-running location lookup included) are
    /// superseded. The route list survives, and the location is not
    /// looked up again.
    pub fn reset(&mut self) {
        debug!("resetting selections");
        let routes = std::mem::take(&mut self.state.routes);
        self.state = CascadeState {
            routes,
            ..CascadeState::default()
        };

        for collection in [
            Collection::Directions,
            Collection::Stops,
            Collection::Vehicles,
            Collection::Predictions,
            Collection::Location,
        ] {
            self.tokens.invalidate(collection);
        }
    }
}
