//! Askama templates for the web frontend.

use askama::Template;

use crate::view::View;

/// Full page: map, selection panel and the script that drives them.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: View,
}

/// Selection panel fragment, swapped in after each action.
#[derive(Template)]
#[template(path = "panel.html")]
pub struct PanelTemplate {
    pub view: View,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::CascadeState;
    use crate::domain::{Direction, Prediction, Route, RouteId, Stop, StopId};

    fn state_with_stop() -> CascadeState {
        let route = Route::new(RouteId::new("22").unwrap(), "Clark");
        let mut state = CascadeState::default();
        state.routes = vec![route.clone()];
        state.selection.route = Some(route);
        state.directions = vec![Direction::new("Northbound")];
        state.selection.direction = Some(Direction::new("Northbound"));
        state.stops = vec![Stop::new(StopId::new("1").unwrap(), "Clark & Howard")];
        state.status.stops_loaded = true;
        state
    }

    #[test]
    fn panel_lists_routes_with_labels() {
        let html = PanelTemplate {
            view: View::from_state(&state_with_stop(), 1),
        }
        .render()
        .unwrap();

        assert!(html.contains("22 - Clark"));
        assert!(html.contains(r#"value="22" selected"#));
    }

    #[test]
    fn panel_escapes_stop_names() {
        let html = PanelTemplate {
            view: View::from_state(&state_with_stop(), 1),
        }
        .render()
        .unwrap();

        assert!(html.contains("Clark &amp; Howard"));
    }

    #[test]
    fn panel_shows_no_stop_data() {
        let mut state = state_with_stop();
        state.stops.clear();
        let html = PanelTemplate {
            view: View::from_state(&state, 1),
        }
        .render()
        .unwrap();

        assert!(html.contains("No stop data available"));
    }

    #[test]
    fn panel_shows_prediction_lines() {
        let mut state = state_with_stop();
        state.predictions = vec![Prediction {
            route: "22".into(),
            destination_label: "Northbound".into(),
            arrival_timestamp: "12/25 14:10".into(),
        }];
        state.status.predictions_attempted = true;
        let html = PanelTemplate {
            view: View::from_state(&state, 1),
        }
        .render()
        .unwrap();

        assert!(html.contains("Arriving at 2:10 PM"));
    }

    #[test]
    fn index_embeds_panel() {
        let html = IndexTemplate {
            view: View::from_state(&CascadeState::default(), 0),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"id="panel""#));
        assert!(html.contains("Select a route"));
    }
}
