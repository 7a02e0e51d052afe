//! Integration tests for the location queries.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_list_locations_returns_registry_order() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(&app.router, "/api/v1/locations").await;

    assert_eq!(status, StatusCode::OK);
    let locations = json.as_array().unwrap();
    assert_eq!(locations.len(), 12);
    assert_eq!(locations[0]["id"], "awakening");
    assert_eq!(locations[0]["kind"], "startgame");
    assert_eq!(locations[1]["id"], "ancient_map");
}

#[tokio::test]
async fn test_get_location_by_id() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(&app.router, "/api/v1/locations/hidden_compass").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Rusted Compass");
    assert_eq!(json["kind"], "secret");
    assert_eq!(json["radius"], 25.0);
    assert_eq!(json["stage"], "start");
}

#[tokio::test]
async fn test_get_unknown_location_returns_404() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(&app.router, "/api/v1/locations/lost_tower").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}
