//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::session::{Action, SessionError, SessionHandle};
use crate::view::View;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Cookie carrying the rider's session id.
pub const SESSION_COOKIE: &str = "bus_tracker_session";

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/panel", get(panel))
        .route("/api/view", get(current_view))
        .route("/location", post(report_location))
        .route("/select/route", post(select_route))
        .route("/select/direction", post(select_direction))
        .route("/select/stop", post(select_stop))
        .route("/predictions", post(request_predictions))
        .route("/reset", post(reset))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Full page. Every load starts the rider over with a fresh session.
async fn index_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (id, session) = state.sessions.open(session_cookie(&headers)).await;
    let page = render(&IndexTemplate {
        view: session.current(),
    })?;
    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    Ok(([(header::SET_COOKIE, cookie)], page).into_response())
}

/// Selection panel fragment for the rider's current view.
async fn panel(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let session = rider(&state, &headers).await?;
    render(&PanelTemplate {
        view: session.current(),
    })
}

/// The rider's current view as JSON, read by the map script.
async fn current_view(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<View>, AppError> {
    let session = rider(&state, &headers).await?;
    Ok(Json(session.current()))
}

/// The browser's answer to the geolocation prompt.
async fn report_location(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(report): Json<LocationReport>,
) -> Result<StatusCode, AppError> {
    let id = session_cookie(&headers).ok_or_else(AppError::no_session)?;
    if state
        .sessions
        .report_location(id, report.into_result())
        .await
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::no_session())
    }
}

async fn select_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RouteForm>,
) -> Result<Response, AppError> {
    act(&state, &headers, Action::SelectRoute(form.rt)).await
}

async fn select_direction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<DirectionForm>,
) -> Result<Response, AppError> {
    act(&state, &headers, Action::SelectDirection(form.direction)).await
}

async fn select_stop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<StopForm>,
) -> Result<Response, AppError> {
    act(&state, &headers, Action::SelectStop(form.stop_id)).await
}

/// "Get Predictions" button.
async fn request_predictions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    act(&state, &headers, Action::RequestPredictions).await
}

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    act(&state, &headers, Action::Reset).await
}

/// Send an action to the rider's session and answer with the resulting
/// view: the panel fragment for the page script, JSON for everyone else.
async fn act(state: &AppState, headers: &HeaderMap, action: Action) -> Result<Response, AppError> {
    let session = rider(state, headers).await?;
    let view = session.dispatch(action).await?;
    if accepts_html(headers) {
        Ok(render(&PanelTemplate { view })?.into_response())
    } else {
        Ok(Json(view).into_response())
    }
}

/// The session named by the request's cookie.
async fn rider(state: &AppState, headers: &HeaderMap) -> Result<SessionHandle, AppError> {
    let id = session_cookie(headers).ok_or_else(AppError::no_session)?;
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(AppError::no_session)
}

fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    /// No cookie, or the session behind it has expired.
    fn no_session() -> Self {
        AppError::NotFound {
            message: "no rider session, reload the page".to_string(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Unknown { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            SessionError::Closed => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;

    use super::*;
    use crate::cta::mock::{MockTransit, Reply};
    use crate::domain::{Direction, Route, RouteId, UserLocation};
    use crate::registry::SessionRegistry;

    fn app_state() -> AppState {
        let mock = MockTransit::new();
        mock.set_routes(Reply::ok(vec![Route::new(RouteId::new("22").unwrap(), "Clark")]));
        mock.set_directions("22", Reply::ok(vec![Direction::new("Northbound")]));
        AppState::new(SessionRegistry::new(mock, None))
    }

    /// Load the page and return the session cookie it set.
    async fn load_page(state: &AppState, cookie: Option<&str>) -> (String, String) {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        let response = index_page(State(state.clone()), headers).await.unwrap();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let cookie = set_cookie.split(';').next().unwrap().to_string();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (cookie, String::from_utf8(body.to_vec()).unwrap())
    }

    fn with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    async fn wait_for(
        state: &AppState,
        cookie: &str,
        mut f: impl FnMut(&View) -> bool,
    ) -> View {
        let session = rider(state, &with_cookie(cookie)).await.unwrap();
        let mut views = session.subscribe();
        let view = tokio::time::timeout(Duration::from_secs(60), views.wait_for(|v| f(v)))
            .await
            .expect("timed out waiting for view")
            .expect("session stopped");
        view.clone()
    }

    #[test]
    fn accepts_html_checks_accept_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(accepts_html(&headers));
        assert!(!accepts_html(&HeaderMap::new()));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let headers = with_cookie("theme=dark; bus_tracker_session=abc123; lang=en");
        assert_eq!(session_cookie(&headers), Some("abc123"));
        assert_eq!(session_cookie(&with_cookie("theme=dark")), None);
    }

    #[test]
    fn unknown_selection_maps_to_bad_request() {
        let err = AppError::from(SessionError::Unknown {
            kind: "route",
            value: "999".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = AppError::from(SessionError::Closed);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test(start_paused = true)]
    async fn select_known_route_returns_json_view() {
        let state = app_state();
        let (cookie, _) = load_page(&state, None).await;
        wait_for(&state, &cookie, |v| !v.routes.is_empty()).await;

        let response = select_route(
            State(state.clone()),
            with_cookie(&cookie),
            Form(RouteForm { rt: "22".into() }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn select_known_route_returns_panel_for_html_clients() {
        let state = app_state();
        let (cookie, _) = load_page(&state, None).await;
        wait_for(&state, &cookie, |v| !v.routes.is_empty()).await;

        let mut headers = with_cookie(&cookie);
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        let response = select_route(State(state), headers, Form(RouteForm { rt: "22".into() }))
            .await
            .unwrap();

        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test(start_paused = true)]
    async fn select_unknown_route_is_rejected() {
        let state = app_state();
        let (cookie, _) = load_page(&state, None).await;
        wait_for(&state, &cookie, |v| !v.routes.is_empty()).await;

        let err = select_route(
            State(state),
            with_cookie(&cookie),
            Form(RouteForm { rt: "999".into() }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn actions_without_a_session_are_not_found() {
        let state = app_state();
        let err = request_predictions(State(state.clone()), HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = current_view(State(state), with_cookie("bus_tracker_session=gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn page_load_starts_a_fresh_session() {
        let state = app_state();
        let (first, page) = load_page(&state, None).await;
        assert!(page.contains(r#"id="panel""#));
        wait_for(&state, &first, |v| !v.routes.is_empty()).await;
        act(&state, &with_cookie(&first), Action::SelectRoute("22".into()))
            .await
            .unwrap();

        let (second, _) = load_page(&state, Some(&first)).await;
        assert_ne!(first, second);
        let view = wait_for(&state, &second, |v| !v.routes.is_empty()).await;
        assert!(!view.route_selected);

        // The replaced session is gone.
        let err = panel(State(state.clone()), with_cookie(&first))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn reload_after_reset_resolves_location_again() {
        let state = app_state();
        let here = UserLocation::new(41.95, -87.66);
        let report = || {
            Json(LocationReport {
                lat: Some(here.lat),
                lon: Some(here.lon),
                error: None,
            })
        };

        let (cookie, _) = load_page(&state, None).await;
        let status = report_location(State(state.clone()), with_cookie(&cookie), report())
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        wait_for(&state, &cookie, |v| v.user.is_some()).await;

        act(&state, &with_cookie(&cookie), Action::Reset)
            .await
            .unwrap();
        assert_eq!(
            rider(&state, &with_cookie(&cookie))
                .await
                .unwrap()
                .current()
                .user,
            None
        );

        let (cookie, _) = load_page(&state, Some(&cookie)).await;
        report_location(State(state.clone()), with_cookie(&cookie), report())
            .await
            .unwrap();
        let view = wait_for(&state, &cookie, |v| v.user.is_some()).await;
        assert_eq!(view.user, Some(here));
    }

    #[tokio::test(start_paused = true)]
    async fn panel_renders_for_the_rider() {
        let state = app_state();
        let (cookie, _) = load_page(&state, None).await;
        wait_for(&state, &cookie, |v| !v.routes.is_empty()).await;

        let Html(fragment) = panel(State(state), with_cookie(&cookie)).await.unwrap();
        assert!(fragment.contains("22 - Clark"));
        assert!(!fragment.contains("<html"));
    }
}
