use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::AppConfig,
    controller::Controller,
    db::DbPool,
    services::{geolocation::ConfiguredGeolocator, map::SceneMapBackend, store::SqliteStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    /// Handlers take the lock for a whole event, so events never interleave.
    pub session: Arc<Mutex<Controller>>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, session: Controller) -> Self {
        Self {
            config,
            db,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// A not yet initialised session wired to the sqlite store, the Leaflet
    /// scene and the configured home position.
    pub fn build_session(config: &AppConfig, db: &DbPool) -> Controller {
        Controller::new(
            config.session.clone(),
            Arc::new(SceneMapBackend),
            Arc::new(SqliteStore::new(db.clone())),
            Arc::new(ConfiguredGeolocator::new(config.session.home)),
        )
    }
}
