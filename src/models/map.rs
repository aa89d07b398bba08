use serde::{Deserialize, Serialize};

use super::trip::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

impl PopupOptions {
    pub fn pinned(class_name: impl Into<String>) -> Self {
        Self {
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            class_name: class_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub options: PopupOptions,
    pub content: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub trip_id: String,
    pub position: Coordinates,
    pub popup: Popup,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    pub animate: bool,
    /// Seconds.
    pub pan_duration: Option<f64>,
}

impl ViewOptions {
    pub fn animated_pan(seconds: f64) -> Self {
        Self {
            animate: true,
            pan_duration: Some(seconds),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl Bounds {
    /// Smallest box holding every point, `None` for no points.
    pub fn enclosing(points: impl IntoIterator<Item = Coordinates>) -> Option<Self> {
        points.into_iter().fold(None, |acc, point| {
            Some(match acc {
                None => Bounds {
                    south_west: point,
                    north_east: point,
                },
                Some(bounds) => Bounds {
                    south_west: Coordinates::new(
                        bounds.south_west.lat.min(point.lat),
                        bounds.south_west.lng.min(point.lng),
                    ),
                    north_east: Coordinates::new(
                        bounds.north_east.lat.max(point.lat),
                        bounds.north_east.lng.max(point.lng),
                    ),
                },
            })
        })
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// What the browser needs to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    pub center: Coordinates,
    pub zoom: u8,
    pub view_options: ViewOptions,
    pub fit_bounds: Option<Bounds>,
    pub tile_layers: Vec<TileLayer>,
    pub markers: Vec<Marker>,
}
