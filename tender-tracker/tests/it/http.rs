use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use tender_core::{FixFeed, GeoPoint, VesselId, WaypointSource};
use tender_tracker::{
    consumer::Consumer,
    error::Error,
    hub::FixHub,
    pier::{ConfiguredPier, PierClient},
    poller::{Poller, SensorClient},
    startup::App,
    streamer::FixStreamClient,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::helper::{PIER, WAIT_TIMEOUT, tender3, tender4, test_settings};

const TENDER3_MMSI: u32 = 982150013;
const TENDER4_MMSI: u32 = 982150014;

async fn mock_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn readings() -> serde_json::Value {
    json!({
        "ais-1": {
            "User ID": TENDER3_MMSI,
            "Latitude": 43.30,
            "Longitude": 5.35,
            "SOG": 6.5,
            "COG": 270.0
        },
        "ais-2": {
            "User ID": TENDER4_MMSI,
            "Latitude": 0.0,
            "Longitude": 0.0
        },
        "battery": "87%"
    })
}

fn poller(server: &MockServer) -> Poller {
    Poller::new(
        SensorClient::new(format!("{}/readings", server.uri())),
        Duration::from_secs(10),
        vec![(TENDER3_MMSI, tender3()), (TENDER4_MMSI, tender4())],
    )
}

#[tokio::test]
async fn test_sensor_client_ignores_non_position_readings() {
    let server = MockServer::start().await;
    mock_json(&server, "/readings", readings()).await;

    let client = SensorClient::new(format!("{}/readings", server.uri()));
    let readings = client.readings().await.unwrap();

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].user_id, Some(TENDER3_MMSI));
}

#[tokio::test]
async fn test_poller_publishes_valid_readings_by_mmsi() {
    let server = MockServer::start().await;
    mock_json(&server, "/readings", readings()).await;

    let hub = FixHub::new([tender3(), tender4()]);
    let mut fixes = hub.subscribe(&tender3()).unwrap();

    let mut poller = poller(&server);
    assert_eq!(poller.poll_once(&hub).await.unwrap(), 1);

    let fix = tokio::time::timeout(WAIT_TIMEOUT, fixes.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fix.position, GeoPoint::new(43.30, 5.35));
    assert_eq!(fix.speed_over_ground, Some(6.5));
    assert_eq!(fix.course_over_ground, Some(270.0));
    assert!(hub.latest(&tender4()).is_none());
}

#[tokio::test]
async fn test_poller_does_not_republish_unchanged_readings() {
    let server = MockServer::start().await;
    mock_json(&server, "/readings", readings()).await;

    let hub = FixHub::new([tender3(), tender4()]);
    let mut poller = poller(&server);

    assert_eq!(poller.poll_once(&hub).await.unwrap(), 1);
    assert_eq!(poller.poll_once(&hub).await.unwrap(), 0);
}

#[tokio::test]
async fn test_poller_skips_zero_position_reading_for_same_vessel() {
    let server = MockServer::start().await;
    mock_json(
        &server,
        "/readings",
        json!({
            "ais-1": {
                "User ID": TENDER3_MMSI,
                "Latitude": 0.0,
                "Longitude": 0.0
            },
            "ais-2": {
                "User ID": TENDER3_MMSI,
                "Latitude": 43.30,
                "Longitude": 5.35,
                "SOG": 4.0,
                "COG": 90.0
            }
        }),
    )
    .await;

    let hub = FixHub::new([tender3(), tender4()]);
    let mut poller = poller(&server);

    assert_eq!(poller.poll_once(&hub).await.unwrap(), 1);
    let fix = hub.latest(&tender3()).unwrap();
    assert_eq!(fix.position, GeoPoint::new(43.30, 5.35));
    assert_eq!(fix.course_over_ground, Some(90.0));
}

#[tokio::test]
async fn test_poller_reports_failed_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/readings"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let hub = FixHub::new([tender3()]);
    let err = poller(&server).poll_once(&hub).await.unwrap_err();

    assert!(matches!(err, Error::FailedRequest { body, .. } if body == "unavailable"));
}

#[tokio::test]
async fn test_pier_client_fetches_location() {
    let server = MockServer::start().await;
    mock_json(&server, "/pier", json!({ "lat": 43.2951, "lng": 5.3625 })).await;

    let pier = PierClient::new(format!("{}/pier", server.uri()))
        .pier()
        .await
        .unwrap();

    assert_eq!(pier, Some(PIER));
}

#[tokio::test]
async fn test_pier_client_treats_missing_pier_as_unknown() {
    let server = MockServer::start().await;
    mock_json(&server, "/pier", serde_json::Value::Null).await;

    let pier = PierClient::new(format!("{}/pier", server.uri()))
        .pier()
        .await
        .unwrap();

    assert_eq!(pier, None);
}

#[tokio::test]
async fn test_pier_client_rejects_invalid_location() {
    let server = MockServer::start().await;
    mock_json(&server, "/pier", json!({ "lat": 123.0, "lng": 5.3625 })).await;

    let res = PierClient::new(format!("{}/pier", server.uri()))
        .pier()
        .await;

    assert!(matches!(res, Err(tender_core::Error::Unexpected { .. })));
}

#[tokio::test]
async fn test_configured_pier_is_returned_as_is() {
    assert_eq!(ConfiguredPier(Some(PIER)).pier().await.unwrap(), Some(PIER));
    assert_eq!(ConfiguredPier(None).pier().await.unwrap(), None);
}

#[tokio::test]
async fn test_app_resolves_pier_from_url() {
    let server = MockServer::start().await;
    let pier = GeoPoint::new(43.30, 5.37);
    mock_json(
        &server,
        "/pier",
        json!({ "lat": pier.latitude, "lng": pier.longitude }),
    )
    .await;

    let mut settings = test_settings();
    settings.pier = None;
    settings.pier_url = Some(format!("{}/pier", server.uri()));

    let app = App::build(settings).await.unwrap();
    let waypoints = app.waypoints().borrow().clone();

    assert_eq!(waypoints.pier.map(|p| p.position), Some(pier));
    assert!(waypoints.ship.is_none());
}

#[tokio::test]
async fn test_app_starts_without_pier_when_none_is_published() {
    let server = MockServer::start().await;

    let mut settings = test_settings();
    settings.pier = None;
    settings.pier_url = Some(format!("{}/pier", server.uri()));

    let app = App::build(settings).await.unwrap();
    assert!(app.waypoints().borrow().pier.is_none());
}

#[tokio::test]
async fn test_stream_client_feeds_consumer() {
    let server = MockServer::start().await;
    let body = [
        r#"{"vessel":"tender3","lat":43.3,"lon":5.35,"speed":4.0,"course":10.0}"#,
        "garbage",
        r#"{"vessel":"tender4","lat":43.31,"lon":5.36}"#,
    ]
    .join("\n");

    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let hub = FixHub::new([tender3(), tender4()]);
    let client = FixStreamClient::new(format!("{}/stream", server.uri()));
    let source = client.streamer().await.unwrap();

    let res = Consumer::new().run(source, &hub).await;
    assert!(matches!(res, Err(Error::StreamClosed { .. })));

    assert_eq!(
        hub.latest(&tender3()).map(|f| f.position),
        Some(GeoPoint::new(43.3, 5.35))
    );
    assert_eq!(
        hub.latest(&tender4()).map(|f| f.position),
        Some(GeoPoint::new(43.31, 5.36))
    );
    assert!(hub.latest(&VesselId::from("ship")).is_none());
}
