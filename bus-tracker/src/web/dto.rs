//! Form bodies and JSON responses for the web layer.

use serde::{Deserialize, Serialize};

use crate::domain::UserLocation;
use crate::geolocation::GeolocationError;

/// Route picker submission.
#[derive(Debug, Deserialize)]
pub struct RouteForm {
    /// Route designator, e.g. "22"
    pub rt: String,
}

/// Direction picker submission.
#[derive(Debug, Deserialize)]
pub struct DirectionForm {
    pub direction: String,
}

/// Stop picker submission.
#[derive(Debug, Deserialize)]
pub struct StopForm {
    pub stop_id: String,
}

/// What the browser's geolocation API answered.
///
/// Either `lat` and `lon`, or an `error`. The page script sends
/// `"denied"` when the rider refused permission.
#[derive(Debug, Deserialize)]
pub struct LocationReport {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub error: Option<String>,
}

impl LocationReport {
    /// Interpret the report. Coordinates outside the valid ranges count as
    /// unavailable.
    pub fn into_result(self) -> Result<UserLocation, GeolocationError> {
        match (self.lat, self.lon, self.error) {
            (_, _, Some(error)) if error == "denied" => Err(GeolocationError::Denied),
            (_, _, Some(error)) => Err(GeolocationError::Unavailable(error)),
            (Some(lat), Some(lon), None)
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) =>
            {
                Ok(UserLocation::new(lat, lon))
            }
            _ => Err(GeolocationError::Unavailable(
                "no usable coordinates".to_string(),
            )),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(json: &str) -> Result<UserLocation, GeolocationError> {
        serde_json::from_str::<LocationReport>(json)
            .unwrap()
            .into_result()
    }

    #[test]
    fn coordinates_become_a_location() {
        assert_eq!(
            report(r#"{"lat": 41.95, "lon": -87.66}"#),
            Ok(UserLocation::new(41.95, -87.66))
        );
    }

    #[test]
    fn denial_and_failures() {
        assert_eq!(
            report(r#"{"error": "denied"}"#),
            Err(GeolocationError::Denied)
        );
        assert_eq!(
            report(r#"{"error": "timeout"}"#),
            Err(GeolocationError::Unavailable("timeout".into()))
        );
        assert!(report(r#"{"lat": 120.0, "lon": 0.0}"#).is_err());
        assert!(report("{}").is_err());
    }
}
