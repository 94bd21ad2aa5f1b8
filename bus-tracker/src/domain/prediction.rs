//! Arrival predictions for a stop.

use serde::Serialize;

use super::time::format_arrival_time;

/// A predicted arrival of a bus at the selected stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    /// Route designator as reported with the prediction.
    pub route: String,
    pub destination_label: String,
    /// Raw `"<date> <H:MM>"` timestamp.
    pub arrival_timestamp: String,
}

impl Prediction {
    /// The rider-facing line, e.g.
    /// "Route 22 to Northbound – Arriving at 2:10 PM".
    pub fn summary(&self) -> String {
        format!(
            "Route {} to {} \u{2013} Arriving at {}",
            self.route,
            self.destination_label,
            format_arrival_time(&self.arrival_timestamp)
        )
    }
}
