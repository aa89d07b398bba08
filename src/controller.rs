//! The logging session: one owner for the map, the entry form and the trip list.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::SessionConfig,
    error::AppError,
    models::{
        form::{FormState, TripForm},
        map::{Bounds, MapScene, Marker, Popup, PopupOptions, ViewOptions},
        trip::{Coordinates, Trip, TripRecord},
    },
    services::{
        geolocation::Geolocator,
        map::{MapBackend, MapHandle},
        store::KeyValueStore,
    },
};

pub const TRIPS_KEY: &str = "trips";
pub const GEOLOCATION_ALERT: &str =
    "Turn on location services for your browser in privacy security settings";
pub const INVALID_INPUT_ALERT: &str = "Inputs have to be positive numbers!";
pub const NO_SPOT_ALERT: &str = "Click on the map to pick a spot first!";

const PAN_SECONDS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MapClicked(Coordinates),
    FormSubmitted(TripForm),
    /// `None` when the click landed in the list but outside any entry.
    EntryClicked(Option<String>),
    FitAllTrips,
    SortList(SortKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Newest,
    Oldest,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    Ignored,
    /// The user got an alert and nothing changed.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Constructed,
    Running,
    Disposed,
}

/// One rendered row of the trip list.
#[derive(Debug, Clone, PartialEq)]
pub struct TripListEntry {
    pub id: String,
    pub list_class: &'static str,
    pub icon: &'static str,
    pub description: String,
    pub coordinates: String,
    pub duration: String,
    pub size: f64,
    pub bait: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<&Trip> for TripListEntry {
    fn from(trip: &Trip) -> Self {
        let style = trip.kind().style();
        Self {
            id: trip.id().to_string(),
            list_class: style.list_class,
            icon: style.icon,
            description: trip.description().to_string(),
            coordinates: trip.coordinates().to_string(),
            duration: trip.duration().to_string(),
            size: trip.size(),
            bait: trip.bait().to_string(),
            created_at: trip.created_at(),
        }
    }
}

fn marker_for(trip: &Trip) -> Marker {
    Marker {
        trip_id: trip.id().to_string(),
        position: trip.coordinates(),
        popup: Popup {
            options: PopupOptions::pinned(trip.kind().style().popup_class),
            content: trip.popup_content(),
            open: true,
        },
    }
}

pub struct Controller {
    config: SessionConfig,
    maps: Arc<dyn MapBackend>,
    store: Arc<dyn KeyValueStore>,
    geolocator: Arc<dyn Geolocator>,
    phase: Phase,
    map: Option<Box<dyn MapHandle>>,
    pending_click: Option<Coordinates>,
    form: FormState,
    trips: Vec<Trip>,
    entries: Vec<TripListEntry>,
    sort_key: Option<SortKey>,
    alerts: Vec<String>,
}

impl Controller {
    pub fn new(
        config: SessionConfig,
        maps: Arc<dyn MapBackend>,
        store: Arc<dyn KeyValueStore>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            config,
            maps,
            store,
            geolocator,
            phase: Phase::Constructed,
            map: None,
            pending_click: None,
            form: FormState::default(),
            trips: Vec::new(),
            entries: Vec::new(),
            sort_key: None,
            alerts: Vec::new(),
        }
    }

    /// Locates the user, builds the map, restores saved trips and puts every
    /// trip on the map once both exist.
    pub async fn init(&mut self) -> Result<(), AppError> {
        match self.geolocator.current_position().await {
            Ok(position) => self.load_map(position),
            Err(err) => {
                warn!("geolocation failed: {err}");
                self.alerts.push(GEOLOCATION_ALERT.to_string());
            }
        }

        self.load_trips().await?;
        self.render_markers();
        self.phase = Phase::Running;
        info!(
            trips = self.trips.len(),
            map = self.map.is_some(),
            "session ready"
        );
        Ok(())
    }

    pub async fn handle(&mut self, event: SessionEvent) -> Result<EventOutcome, AppError> {
        if self.phase != Phase::Running {
            debug!(?event, "session not running, dropping event");
            return Ok(EventOutcome::Ignored);
        }

        match event {
            SessionEvent::MapClicked(coords) => Ok(self.show_form(coords)),
            SessionEvent::FormSubmitted(form) => self.new_trip(form).await,
            SessionEvent::EntryClicked(id) => Ok(self.move_to_trip(id.as_deref())),
            SessionEvent::FitAllTrips => Ok(self.fit_all()),
            SessionEvent::SortList(key) => Ok(self.sort_entries(key)),
        }
    }

    /// Forgets every saved trip and starts over.
    pub async fn reset(&mut self) -> Result<(), AppError> {
        self.store.remove(TRIPS_KEY).await?;
        info!("saved trips cleared");
        self.clear();
        self.init().await
    }

    pub fn dispose(&mut self) {
        self.clear();
        self.phase = Phase::Disposed;
        info!("session disposed");
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.trips.iter().find(|trip| trip.id() == id)
    }

    /// List rows in display order.
    pub fn entries(&self) -> &[TripListEntry] {
        &self.entries
    }

    pub fn map_scene(&self) -> Option<MapScene> {
        self.map.as_ref().map(|map| map.scene())
    }

    pub fn pending_click(&self) -> Option<Coordinates> {
        self.pending_click
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_displayed(&self) -> bool {
        self.form.is_displayed(Utc::now())
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    fn clear(&mut self) {
        self.phase = Phase::Constructed;
        self.map = None;
        self.pending_click = None;
        self.form = FormState::default();
        self.trips.clear();
        self.entries.clear();
        self.sort_key = None;
        self.alerts.clear();
    }

    fn load_map(&mut self, position: Coordinates) {
        info!(
            "https://www.google.pt/maps/@{},{}",
            position.lat, position.lng
        );
        let mut map = self.maps.init(position, self.config.zoom);
        map.add_tile_layer(self.config.tile_layer.clone());
        self.map = Some(map);
    }

    async fn load_trips(&mut self) -> Result<(), AppError> {
        let Some(raw) = self.store.get(TRIPS_KEY).await? else {
            return Ok(());
        };
        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!("ignoring unreadable saved trips: {err}");
                return Ok(());
            }
        };

        // One bad record must not cost the rest of the list.
        for value in values {
            let record = match serde_json::from_value::<TripRecord>(value) {
                Ok(record) => record,
                Err(err) => {
                    warn!("skipping saved trip: {err}");
                    continue;
                }
            };
            match Trip::try_from(record) {
                Ok(trip) => {
                    self.render_entry(&trip);
                    self.trips.push(trip);
                }
                Err(err) => warn!("skipping saved trip: {err}"),
            }
        }
        debug!(count = self.trips.len(), "saved trips restored");
        Ok(())
    }

    async fn save_trips(&self) -> Result<(), AppError> {
        let records: Vec<TripRecord> = self.trips.iter().map(TripRecord::from).collect();
        let raw = serde_json::to_string(&records)?;
        self.store.set(TRIPS_KEY, &raw).await
    }

    fn render_markers(&mut self) {
        let Some(map) = self.map.as_mut() else {
            return;
        };
        for trip in &self.trips {
            map.add_marker(marker_for(trip));
        }
    }

    /// Newest first, unless the list was sorted another way.
    fn render_entry(&mut self, trip: &Trip) {
        self.entries.insert(0, TripListEntry::from(trip));
        if let Some(key) = self.sort_key {
            self.apply_sort(key);
        }
    }

    fn show_form(&mut self, coords: Coordinates) -> EventOutcome {
        if self.map.is_none() {
            return EventOutcome::Ignored;
        }
        if !coords.is_on_earth() {
            warn!(lat = coords.lat, lng = coords.lng, "ignoring click off the map");
            return EventOutcome::Ignored;
        }
        if let Some(previous) = self.pending_click.replace(coords) {
            debug!(%previous, %coords, "pending spot moved");
        }
        self.form.show();
        EventOutcome::Applied
    }

    fn reject(&mut self, alert: &str) -> EventOutcome {
        self.alerts.push(alert.to_string());
        EventOutcome::Rejected
    }

    async fn new_trip(&mut self, form: TripForm) -> Result<EventOutcome, AppError> {
        let Some(location) = self.pending_click else {
            self.form.keep_draft(form);
            return Ok(self.reject(NO_SPOT_ALERT));
        };

        let size = form.size_value();
        if !size.is_finite() || size <= 0.0 {
            debug!(size = %form.size, "rejecting trip size");
            self.form.keep_draft(form);
            return Ok(self.reject(INVALID_INPUT_ALERT));
        }

        let trip = Trip::new(
            form.kind,
            location,
            size,
            form.duration.clone(),
            form.bait.clone(),
        );
        info!(id = trip.id(), kind = %trip.kind(), "trip logged");

        if let Some(map) = self.map.as_mut() {
            map.add_marker(marker_for(&trip));
        }
        self.render_entry(&trip);
        self.trips.push(trip);

        let reopen_delay = TimeDelta::from_std(self.config.form_reopen_delay)
            .unwrap_or_else(|_| TimeDelta::zero());
        self.form.keep_draft(form);
        self.form.hide(Utc::now() + reopen_delay);
        self.pending_click = None;

        self.save_trips().await?;
        Ok(EventOutcome::Applied)
    }

    fn move_to_trip(&mut self, id: Option<&str>) -> EventOutcome {
        let Some(id) = id else {
            return EventOutcome::Ignored;
        };
        let Some(map) = self.map.as_mut() else {
            return EventOutcome::Ignored;
        };
        let Some(trip) = self.trips.iter_mut().find(|trip| trip.id() == id) else {
            warn!(id, "list entry without a trip");
            return EventOutcome::Ignored;
        };

        map.set_view(
            trip.coordinates(),
            self.config.zoom,
            ViewOptions::animated_pan(PAN_SECONDS),
        );
        trip.register_selection();
        EventOutcome::Applied
    }

    fn fit_all(&mut self) -> EventOutcome {
        let Some(map) = self.map.as_mut() else {
            return EventOutcome::Ignored;
        };
        match Bounds::enclosing(self.trips.iter().map(Trip::coordinates)) {
            Some(bounds) => {
                map.fit_bounds(bounds);
                EventOutcome::Applied
            }
            None => EventOutcome::Ignored,
        }
    }

    fn sort_entries(&mut self, key: SortKey) -> EventOutcome {
        self.sort_key = Some(key);
        self.apply_sort(key);
        EventOutcome::Applied
    }

    fn apply_sort(&mut self, key: SortKey) {
        match key {
            SortKey::Newest => self
                .entries
                .sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Oldest => self
                .entries
                .sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortKey::Size => self.entries.sort_by(|a, b| b.size.total_cmp(&a.size)),
        }
    }
}
