//! Rider-facing render model.
//!
//! A [`View`] is a pure function of the cascade state. The session builds a
//! fresh one after every accepted transition; templates and the map script
//! only ever read views.

use serde::Serialize;

use crate::cascade::CascadeState;
use crate::domain::{BoundingBox, UserLocation, VehiclePosition};
use crate::viewport;

/// Shown once the stops for a direction have loaded and there are none.
pub const NO_STOP_DATA: &str = "No stop data available";

/// Shown once the vehicles for a route have loaded and there are none.
pub const NO_ACTIVE_BUSES: &str = "No active buses";

/// Shown after a successful predictions fetch returned nothing.
pub const NO_UPCOMING_BUSES: &str = "No upcoming buses";

/// One option of a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// What the stop picker shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "stops", rename_all = "snake_case")]
pub enum StopsView {
    /// No direction selected yet.
    Hidden,
    /// Stops requested, not yet answered: no list and no message.
    Loading,
    /// Stops answered with nothing.
    Unavailable,
    Available(Vec<Choice>),
}

/// What the predictions area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "lines", rename_all = "snake_case")]
pub enum PredictionsView {
    NotRequested,
    NoneUpcoming,
    Upcoming(Vec<String>),
}

/// Vehicle status line under the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "count", rename_all = "snake_case")]
pub enum VehiclesView {
    Hidden,
    Loading,
    NoneActive,
    Active(usize),
}

/// A bus drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMarker {
    pub vehicle_id: String,
    pub lat: f64,
    pub lon: f64,
    pub icon: &'static str,
    pub label: String,
}

impl VehicleMarker {
    fn from_position(v: &VehiclePosition) -> Self {
        let label = if v.destination_label.is_empty() {
            format!("Bus {}", v.vehicle_id)
        } else {
            format!("Bus {} to {}", v.vehicle_id, v.destination_label)
        };
        Self {
            vehicle_id: v.vehicle_id.clone(),
            lat: v.lat,
            lon: v.lon,
            icon: heading_arrow(v.heading_degrees),
            label,
        }
    }
}

/// Everything the page and the map need to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    /// Bumped on every published view; lets clients skip redundant redraws.
    pub revision: u64,
    pub routes: Vec<Choice>,
    pub directions: Vec<Choice>,
    pub route_selected: bool,
    pub stops: StopsView,
    pub can_request_predictions: bool,
    pub predictions: PredictionsView,
    pub vehicles: VehiclesView,
    pub markers: Vec<VehicleMarker>,
    pub user: Option<UserLocation>,
    /// `None` means "keep the current framing".
    pub viewport: Option<BoundingBox>,
}

impl View {
    /// Render the current cascade state.
    pub fn from_state(state: &CascadeState, revision: u64) -> Self {
        let selection = &state.selection;
        let selected_route = selection.route.as_ref().map(|r| r.id.as_str());
        let selected_direction = selection.direction.as_ref().map(|d| d.as_str());
        let selected_stop = selection.stop.as_ref().map(|s| s.id.as_str());

        let routes = state
            .routes
            .iter()
            .map(|r| Choice {
                value: r.id.to_string(),
                label: r.label(),
                selected: selected_route == Some(r.id.as_str()),
            })
            .collect();

        let directions = state
            .directions
            .iter()
            .map(|d| Choice {
                value: d.to_string(),
                label: d.to_string(),
                selected: selected_direction == Some(d.as_str()),
            })
            .collect();

        let stops = if selected_direction.is_none() {
            StopsView::Hidden
        } else if !state.status.stops_loaded {
            StopsView::Loading
        } else if state.stops.is_empty() {
            StopsView::Unavailable
        } else {
            StopsView::Available(
                state
                    .stops
                    .iter()
                    .map(|s| Choice {
                        value: s.id.to_string(),
                        label: s.name.clone(),
                        selected: selected_stop == Some(s.id.as_str()),
                    })
                    .collect(),
            )
        };

        let predictions = if !state.predictions.is_empty() {
            PredictionsView::Upcoming(state.predictions.iter().map(|p| p.summary()).collect())
        } else if state.status.predictions_attempted {
            PredictionsView::NoneUpcoming
        } else {
            PredictionsView::NotRequested
        };

        let vehicles = if selected_direction.is_none() {
            VehiclesView::Hidden
        } else if !state.status.vehicles_loaded {
            VehiclesView::Loading
        } else if state.vehicles.is_empty() {
            VehiclesView::NoneActive
        } else {
            VehiclesView::Active(state.vehicles.len())
        };

        Self {
            revision,
            routes,
            directions,
            route_selected: selected_route.is_some(),
            stops,
            can_request_predictions: selected_route.is_some() && selected_stop.is_some(),
            predictions,
            vehicles,
            markers: state
                .vehicles
                .iter()
                .map(VehicleMarker::from_position)
                .collect(),
            user: state.user_location,
            viewport: viewport::fit(&state.vehicles, state.user_location),
        }
    }

    // Template helpers: askama reads these rather than matching enums.

    pub fn stop_choices(&self) -> &[Choice] {
        match &self.stops {
            StopsView::Available(choices) => choices,
            _ => &[],
        }
    }

    pub fn stop_message(&self) -> Option<&'static str> {
        match self.stops {
            StopsView::Unavailable => Some(NO_STOP_DATA),
            _ => None,
        }
    }

    pub fn prediction_lines(&self) -> &[String] {
        match &self.predictions {
            PredictionsView::Upcoming(lines) => lines,
            _ => &[],
        }
    }

    pub fn prediction_message(&self) -> Option<&'static str> {
        match self.predictions {
            PredictionsView::NoneUpcoming => Some(NO_UPCOMING_BUSES),
            _ => None,
        }
    }

    pub fn vehicle_message(&self) -> Option<String> {
        match self.vehicles {
            VehiclesView::Hidden | VehiclesView::Loading => None,
            VehiclesView::NoneActive => Some(NO_ACTIVE_BUSES.to_string()),
            VehiclesView::Active(1) => Some("1 active bus".to_string()),
            VehiclesView::Active(n) => Some(format!("{n} active buses")),
        }
    }
}

/// Eight-point arrow for a compass heading.
pub fn heading_arrow(degrees: f64) -> &'static str {
    const ARROWS: [&str; 8] = [
        "\u{2191}", "\u{2197}", "\u{2192}", "\u{2198}", "\u{2193}", "\u{2199}", "\u{2190}",
        "\u{2196}",
    ];
    if !degrees.is_finite() {
        return ARROWS[0];
    }
    let sector = ((degrees.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    ARROWS[sector]
}
