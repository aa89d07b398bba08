//! The map widget seam.
//!
//! Tiles are drawn by Leaflet in the browser; on this side a map is the list of
//! instructions the page script replays, captured as a [`MapScene`].

use crate::models::{
    map::{Bounds, MapScene, Marker, TileLayer, ViewOptions},
    trip::Coordinates,
};

pub trait MapBackend: Send + Sync {
    fn init(&self, center: Coordinates, zoom: u8) -> Box<dyn MapHandle>;
}

pub trait MapHandle: Send + Sync {
    fn add_tile_layer(&mut self, layer: TileLayer);
    fn set_view(&mut self, center: Coordinates, zoom: u8, options: ViewOptions);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn add_marker(&mut self, marker: Marker);
    fn scene(&self) -> MapScene;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SceneMapBackend;

impl MapBackend for SceneMapBackend {
    fn init(&self, center: Coordinates, zoom: u8) -> Box<dyn MapHandle> {
        Box::new(SceneMap::new(center, zoom))
    }
}

#[derive(Debug, Clone)]
pub struct SceneMap {
    scene: MapScene,
}

impl SceneMap {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self {
            scene: MapScene {
                center,
                zoom,
                view_options: ViewOptions::default(),
                fit_bounds: None,
                tile_layers: Vec::new(),
                markers: Vec::new(),
            },
        }
    }
}

impl MapHandle for SceneMap {
    fn add_tile_layer(&mut self, layer: TileLayer) {
        self.scene.tile_layers.push(layer);
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8, options: ViewOptions) {
        self.scene.center = center;
        self.scene.zoom = zoom;
        self.scene.view_options = options;
        self.scene.fit_bounds = None;
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        // Leaflet picks the zoom; the center is what we can know here.
        self.scene.center = bounds.center();
        self.scene.fit_bounds = Some(bounds);
    }

    fn add_marker(&mut self, marker: Marker) {
        self.scene.markers.push(marker);
    }

    fn scene(&self) -> MapScene {
        self.scene.clone()
    }
}
