//! Arrival predictions, fetched only on explicit request.
//!
//! Unlike the other collections, a failed predictions fetch leaves the
//! previous predictions (and the attempted flag) as they were.

use tracing::{debug, warn};

use crate::cta::CtaError;
use crate::domain::Prediction;

use super::QueryCascade;
use super::fetch::Fetch;
use super::sequence::Collection;

impl QueryCascade {
    /// Ask for predictions at the selected stop on the selected route.
    ///
    /// Returns `None` (and does nothing) unless both are selected.
    pub fn request_predictions(&mut self) -> Option<Fetch> {
        let selection = &self.state.selection;
        let (Some(route), Some(stop)) = (&selection.route, &selection.stop) else {
            debug!("ignoring prediction request without route and stop");
            return None;
        };
        let (route, stop) = (route.id.clone(), stop.id.clone());

        debug!(%route, %stop, "predictions requested");
        Some(Fetch::Predictions {
            token: self.tokens.issue(Collection::Predictions),
            route,
            stop,
        })
    }

    pub(super) fn apply_predictions(&mut self, result: Result<Vec<Prediction>, CtaError>) -> bool {
        match result {
            Ok(predictions) => {
                self.state.predictions = predictions;
                self.state.status.predictions_attempted = true;
                true
            }
            Err(e) => {
                warn!(error = %e, "predictions fetch failed, keeping previous predictions");
                false
            }
        }
    }
}
