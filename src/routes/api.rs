use axum::{extract::State, routing::get, Json, Router};

use crate::{models::map::MapScene, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/map", get(map_scene))
}

/// `null` until the session has a map.
async fn map_scene(State(state): State<AppState>) -> Json<Option<MapScene>> {
    Json(state.session.lock().await.map_scene())
}
