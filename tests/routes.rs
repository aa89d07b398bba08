use std::{fs::File, net::SocketAddr};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use fishlog::{
    config::{AppConfig, SessionConfig},
    db::{init_pool, migrate},
    models::trip::Coordinates,
    routes::create_router,
    state::AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

async fn app(home: Option<Coordinates>) -> (Router, AppState, TempDir) {
    let root = TempDir::new().expect("temp dir");
    let db_path = root.path().join("routes.sqlite");
    File::create(&db_path).expect("db file");
    let config = AppConfig {
        database_url: format!("sqlite://{}", db_path.to_string_lossy()),
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        session: SessionConfig {
            home,
            form_reopen_delay: std::time::Duration::ZERO,
            ..SessionConfig::default()
        },
    };
    let db = init_pool(&config.database_url).await.expect("pool");
    migrate(&db).await.expect("migrations");

    let mut session = AppState::build_session(&config, &db);
    session.init().await.expect("session init");
    let state = AppState::new(config, db, session);
    (create_router(state.clone()), state, root)
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn logging_a_trip_over_http_adds_a_marker() {
    let (router, state, _root) = app(Some(Coordinates::new(38.7, -9.1))).await;

    let response = router
        .clone()
        .oneshot(form_post("/map/click", "lat=39.0&lng=-12.0"))
        .await
        .expect("click");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = router
        .clone()
        .oneshot(form_post(
            "/trips",
            "type=freshwater&size=5.2&duration=24&bait=178",
        ))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.session.lock().await.trips().len(), 1);

    let response = router
        .clone()
        .oneshot(Request::get("/api/map").body(Body::empty()).expect("request"))
        .await
        .expect("scene");
    assert_eq!(response.status(), StatusCode::OK);
    let scene: Value = serde_json::from_str(&body_text(response).await).expect("json scene");
    assert_eq!(scene["markers"][0]["position"], serde_json::json!([39.0, -12.0]));
    assert_eq!(
        scene["markers"][0]["popup"]["options"]["className"],
        "freshwater-popup"
    );

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("index");
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Freshwater on"));
    assert!(page.contains("trip--freshwater"));
}

#[tokio::test]
async fn a_refused_size_renders_the_alert_with_bad_request() {
    let (router, state, _root) = app(Some(Coordinates::new(38.7, -9.1))).await;

    router
        .clone()
        .oneshot(form_post("/map/click", "lat=39.0&lng=-12.0"))
        .await
        .expect("click");

    let response = router
        .oneshot(form_post(
            "/trips",
            "type=saltwater&size=-3&duration=24&bait=178",
        ))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let page = body_text(response).await;
    assert!(page.contains("Inputs have to be positive numbers!"));
    assert!(page.contains("value=\"-3\""));

    let session = state.session.lock().await;
    assert!(session.trips().is_empty());
    assert!(session.alerts().is_empty(), "alerts are drained by the page");
}

#[tokio::test]
async fn without_a_location_the_scene_is_null() {
    let (router, _state, _root) = app(None).await;

    let response = router
        .oneshot(Request::get("/api/map").body(Body::empty()).expect("request"))
        .await
        .expect("scene");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "null");
}

#[tokio::test]
async fn reset_over_http_clears_the_list() {
    let (router, state, _root) = app(Some(Coordinates::new(38.7, -9.1))).await;

    router
        .clone()
        .oneshot(form_post("/map/click", "lat=39.0&lng=-12.0"))
        .await
        .expect("click");
    router
        .clone()
        .oneshot(form_post("/trips", "type=saltwater&size=2&duration=1&bait=eel"))
        .await
        .expect("submit");

    let response = router
        .oneshot(form_post("/reset", ""))
        .await
        .expect("reset");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let session = state.session.lock().await;
    assert!(session.trips().is_empty());
    assert!(session.map_scene().is_some());
}

#[tokio::test]
async fn non_finite_clicks_over_http_leave_no_pending_spot() {
    let (router, state, _root) = app(Some(Coordinates::new(38.7, -9.1))).await;

    let response = router
        .clone()
        .oneshot(form_post("/map/click", "lat=NaN&lng=inf"))
        .await
        .expect("click");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = router
        .oneshot(form_post("/trips", "type=saltwater&size=2&duration=1&bait=eel"))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let session = state.session.lock().await;
    assert!(session.pending_click().is_none());
    assert!(session.trips().is_empty());
}
