//! Fetch requests emitted by the cascade and their completions.

use crate::cta::CtaError;
use crate::domain::{
    Direction, Prediction, Route, RouteId, Stop, StopId, UserLocation, VehiclePosition,
};

use super::sequence::FetchToken;

/// A request the cascade wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Routes {
        token: FetchToken,
    },
    Directions {
        token: FetchToken,
        route: RouteId,
    },
    Stops {
        token: FetchToken,
        route: RouteId,
        direction: Direction,
    },
    Vehicles {
        token: FetchToken,
        route: RouteId,
    },
    Predictions {
        token: FetchToken,
        route: RouteId,
        stop: StopId,
    },
    Location {
        token: FetchToken,
    },
}

impl Fetch {
    pub fn token(&self) -> FetchToken {
        match self {
            Fetch::Routes { token }
            | Fetch::Directions { token, .. }
            | Fetch::Stops { token, .. }
            | Fetch::Vehicles { token, .. }
            | Fetch::Predictions { token, .. }
            | Fetch::Location { token } => *token,
        }
    }
}

/// A completed fetch, carrying the token it was issued with.
#[derive(Debug)]
pub enum Outcome {
    Routes {
        token: FetchToken,
        result: Result<Vec<Route>, CtaError>,
    },
    Directions {
        token: FetchToken,
        result: Result<Vec<Direction>, CtaError>,
    },
    Stops {
        token: FetchToken,
        result: Result<Vec<Stop>, CtaError>,
    },
    Vehicles {
        token: FetchToken,
        result: Result<Vec<VehiclePosition>, CtaError>,
    },
    Predictions {
        token: FetchToken,
        result: Result<Vec<Prediction>, CtaError>,
    },
    /// Geolocation never fails: the resolver has already applied its fallback.
    Location {
        token: FetchToken,
        location: UserLocation,
    },
}

impl Outcome {
    pub fn token(&self) -> FetchToken {
        match self {
            Outcome::Routes { token, .. }
            | Outcome::Directions { token, .. }
            | Outcome::Stops { token, .. }
            | Outcome::Vehicles { token, .. }
            | Outcome::Predictions { token, .. }
            | Outcome::Location { token, .. } => *token,
        }
    }
}
