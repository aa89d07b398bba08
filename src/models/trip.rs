use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// A `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within latitude/longitude range.
    pub fn is_on_earth(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(coords: Coordinates) -> Self {
        (coords.lat, coords.lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterKind {
    Freshwater,
    Saltwater,
}

/// Everything that differs between the two kinds of trip.
#[derive(Debug)]
pub struct KindStyle {
    pub display_name: &'static str,
    pub icon: &'static str,
    pub popup_class: &'static str,
    pub list_class: &'static str,
}

const FRESHWATER_STYLE: KindStyle = KindStyle {
    display_name: "Freshwater",
    icon: "💦",
    popup_class: "freshwater-popup",
    list_class: "trip--freshwater",
};

const SALTWATER_STYLE: KindStyle = KindStyle {
    display_name: "Saltwater",
    icon: "🧂",
    popup_class: "saltwater-popup",
    list_class: "trip--saltwater",
};

impl WaterKind {
    pub const ALL: [WaterKind; 2] = [WaterKind::Freshwater, WaterKind::Saltwater];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterKind::Freshwater => "freshwater",
            WaterKind::Saltwater => "saltwater",
        }
    }

    pub fn style(&self) -> &'static KindStyle {
        match self {
            WaterKind::Freshwater => &FRESHWATER_STYLE,
            WaterKind::Saltwater => &SALTWATER_STYLE,
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for WaterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `"<Kind> on <Month> <day> at <HH>:<MM>"`, read off the wall clock of `created_at`.
pub fn describe<Tz: TimeZone>(kind: WaterKind, created_at: &DateTime<Tz>) -> String {
    format!(
        "{} on {} {} at {:02}:{:02}",
        kind.style().display_name,
        MONTHS[created_at.month0() as usize],
        created_at.day(),
        created_at.hour(),
        created_at.minute()
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: String,
    kind: WaterKind,
    created_at: DateTime<FixedOffset>,
    coordinates: Coordinates,
    size: f64,
    duration: String,
    bait: String,
    click_count: u32,
    description: String,
}

impl Trip {
    pub fn new(
        kind: WaterKind,
        coordinates: Coordinates,
        size: f64,
        duration: impl Into<String>,
        bait: impl Into<String>,
    ) -> Self {
        Self::new_at(
            kind,
            coordinates,
            size,
            duration,
            bait,
            Local::now().fixed_offset(),
        )
    }

    pub fn new_at(
        kind: WaterKind,
        coordinates: Coordinates,
        size: f64,
        duration: impl Into<String>,
        bait: impl Into<String>,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            created_at,
            coordinates,
            size,
            duration: duration.into(),
            bait: bait.into(),
            click_count: 0,
            description: describe(kind, &created_at),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> WaterKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn bait(&self) -> &str {
        &self.bait
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn register_selection(&mut self) {
        self.click_count += 1;
    }

    pub fn popup_content(&self) -> String {
        format!("{} {}", self.kind.style().icon, self.description)
    }
}

/// Stored form of a [`Trip`]; the `type` tag is resolved back into a kind on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<FixedOffset>,
    pub coordinates: Coordinates,
    pub size: f64,
    pub duration: String,
    pub bait: String,
    #[serde(default)]
    pub click_count: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Trip> for TripRecord {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            kind: trip.kind.as_str().to_string(),
            created_at: trip.created_at,
            coordinates: trip.coordinates,
            size: trip.size,
            duration: trip.duration.clone(),
            bait: trip.bait.clone(),
            click_count: trip.click_count,
            description: Some(trip.description.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trip type {0:?}")]
pub struct UnknownKind(pub String);

impl TryFrom<TripRecord> for Trip {
    type Error = UnknownKind;

    fn try_from(record: TripRecord) -> Result<Self, Self::Error> {
        let kind = WaterKind::parse(&record.kind).ok_or(UnknownKind(record.kind))?;
        let description = record
            .description
            .unwrap_or_else(|| describe(kind, &record.created_at));
        Ok(Self {
            id: record.id,
            kind,
            created_at: record.created_at,
            coordinates: record.coordinates,
            size: record.size,
            duration: record.duration,
            bait: record.bait,
            click_count: record.click_count,
            description,
        })
    }
}
