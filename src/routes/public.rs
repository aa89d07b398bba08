use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::{
    controller::{Controller, EventOutcome, SessionEvent, SortKey, TripListEntry},
    error::AppError,
    models::{form::TripForm, trip::{Coordinates, WaterKind}},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/map/click", post(map_click))
        .route("/map/fit", post(map_fit))
        .route("/trips", post(trip_submit))
        .route("/trips/select", post(trip_select))
        .route("/trips/sort", post(trips_sort))
        .route("/reset", post(reset))
}

struct KindOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    alerts: Vec<String>,
    map_ready: bool,
    form_hidden: bool,
    kinds: Vec<KindOption>,
    size: String,
    duration: String,
    bait: String,
    entries: Vec<TripListEntry>,
}

impl IndexTemplate {
    fn from_session(session: &mut Controller) -> Self {
        let draft = session.form().draft().clone();
        let kinds = WaterKind::ALL
            .into_iter()
            .map(|kind| KindOption {
                value: kind.as_str(),
                label: kind.style().display_name,
                selected: kind == draft.kind,
            })
            .collect();
        Self {
            alerts: session.take_alerts(),
            map_ready: session.map_scene().is_some(),
            form_hidden: !session.form_displayed(),
            kinds,
            size: draft.size,
            duration: draft.duration,
            bait: draft.bait,
            entries: session.entries().to_vec(),
        }
    }
}

async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    AskamaTemplateResponse::into_response(IndexTemplate::from_session(&mut session))
}

#[derive(Deserialize)]
struct ClickForm {
    lat: f64,
    lng: f64,
}

async fn map_click(
    State(state): State<AppState>,
    Form(form): Form<ClickForm>,
) -> Result<Redirect, AppError> {
    let event = SessionEvent::MapClicked(Coordinates::new(form.lat, form.lng));
    state.session.lock().await.handle(event).await?;
    Ok(Redirect::to("/"))
}

async fn map_fit(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state
        .session
        .lock()
        .await
        .handle(SessionEvent::FitAllTrips)
        .await?;
    Ok(Redirect::to("/"))
}

async fn trip_submit(
    State(state): State<AppState>,
    Form(form): Form<TripForm>,
) -> Result<Response, AppError> {
    let mut session = state.session.lock().await;
    match session.handle(SessionEvent::FormSubmitted(form)).await? {
        EventOutcome::Rejected => Ok((
            StatusCode::BAD_REQUEST,
            AskamaTemplateResponse::into_response(IndexTemplate::from_session(&mut session)),
        )
            .into_response()),
        EventOutcome::Applied | EventOutcome::Ignored => Ok(Redirect::to("/").into_response()),
    }
}

#[derive(Deserialize)]
struct SelectForm {
    #[serde(default)]
    id: Option<String>,
}

async fn trip_select(
    State(state): State<AppState>,
    Form(form): Form<SelectForm>,
) -> Result<Redirect, AppError> {
    let id = form.id.filter(|id| !id.trim().is_empty());
    state
        .session
        .lock()
        .await
        .handle(SessionEvent::EntryClicked(id))
        .await?;
    Ok(Redirect::to("/"))
}

#[derive(Deserialize)]
struct SortForm {
    key: SortKey,
}

async fn trips_sort(
    State(state): State<AppState>,
    Form(form): Form<SortForm>,
) -> Result<Redirect, AppError> {
    state
        .session
        .lock()
        .await
        .handle(SessionEvent::SortList(form.key))
        .await?;
    Ok(Redirect::to("/"))
}

async fn reset(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.session.lock().await.reset().await?;
    Ok(Redirect::to("/"))
}
