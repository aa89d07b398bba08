use async_trait::async_trait;

use crate::{error::GeolocationError, models::trip::Coordinates};

/// One-shot position request.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Answers with the home position from the configuration, if there is one.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    home: Option<Coordinates>,
}

impl ConfiguredGeolocator {
    pub fn new(home: Option<Coordinates>) -> Self {
        Self { home }
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.home.ok_or(GeolocationError::Unavailable)
    }
}
