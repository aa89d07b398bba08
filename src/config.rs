use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use crate::{error::AppError, models::map::TileLayer, models::trip::Coordinates};

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub session: SessionConfig,
}

/// The part of the configuration a [`crate::controller::Controller`] needs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub home: Option<Coordinates>,
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub form_reopen_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            home: None,
            zoom: 14,
            tile_layer: TileLayer {
                url_template: DEFAULT_TILE_URL.into(),
                attribution: DEFAULT_TILE_ATTRIBUTION.into(),
            },
            form_reopen_delay: Duration::from_millis(1000),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://fishlog.db?mode=rwc".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let defaults = SessionConfig::default();

        let home = match (
            parse_var::<f64>("FISHLOG_HOME_LAT")?,
            parse_var::<f64>("FISHLOG_HOME_LNG")?,
        ) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            (None, None) => None,
            _ => {
                return Err(AppError::Config(
                    "FISHLOG_HOME_LAT and FISHLOG_HOME_LNG must be set together".into(),
                ))
            }
        };

        let zoom = parse_var::<u8>("FISHLOG_MAP_ZOOM")?.unwrap_or(defaults.zoom);
        let form_reopen_delay = parse_var::<u64>("FISHLOG_FORM_REOPEN_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.form_reopen_delay);

        let tile_layer = TileLayer {
            url_template: env::var("FISHLOG_TILE_URL")
                .unwrap_or(defaults.tile_layer.url_template),
            attribution: env::var("FISHLOG_TILE_ATTRIBUTION")
                .unwrap_or(defaults.tile_layer.attribution),
        };

        Ok(Self {
            database_url,
            listen_addr,
            session: SessionConfig {
                home,
                zoom,
                tile_layer,
                form_reopen_delay,
            },
        })
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| AppError::Config(format!("invalid {name}: {err}"))),
        Err(_) => Ok(None),
    }
}
