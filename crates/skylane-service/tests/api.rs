//! End-to-end tests of the REST surface against the seed fixture.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use skylane_lib::PlaneMatch;
use skylane_service_shared::test_utils::{seeded_state, seeded_state_with, StubForecaster};
use skylane_service_shared::ServiceIdentity;

fn server(mode: PlaneMatch) -> (TempDir, TestServer) {
    let (dir, state) = seeded_state(mode);
    let server = TestServer::new(skylane_service::router(state, "/metrics")).unwrap();
    (dir, server)
}

fn names(list: &Value, key: &str) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item[key].as_str().unwrap().to_string())
        .collect()
}

fn assert_problem(body: &Value, status: u16, type_uri: &str) {
    assert_eq!(body["status"], status, "{body}");
    assert_eq!(body["type"], type_uri, "{body}");
    assert_eq!(body["content_type"], "application/problem+json");
}

// =============================================================================
// Countries and airlines
// =============================================================================

#[tokio::test]
async fn test_countries_are_name_ordered() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server.get("/countries").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(
        names(&body["countries"], "name"),
        ["France", "Japan", "United Kingdom", "United States"]
    );
    assert_eq!(body["content_type"], "application/json");
}

#[tokio::test]
async fn test_airlines_by_country_code_is_case_insensitive() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airlines")
        .add_query_param("country_code", "gb")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(names(&body["airlines"], "iata"), ["BA"]);
}

#[tokio::test]
async fn test_airlines_by_country_requires_code() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server.get("/airlines").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_problem(&body, 400, "/problems/invalid-request");
    assert_eq!(body["detail"], "Country code is required");
}

#[tokio::test]
async fn test_airlines_by_country_without_rows_is_not_found() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airlines")
        .add_query_param("country_code", "JP")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_problem(&response.json::<Value>(), 404, "/problems/not-found");
}

#[tokio::test]
async fn test_airline_search_by_icao() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airlines/search")
        .add_query_param("icao", "baw")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(names(&body["airlines"], "name"), ["British Airways"]);
}

#[tokio::test]
async fn test_create_airline_then_duplicate_is_conflict() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let airline = json!({
        "name": "Virgin Atlantic",
        "iata": "vs",
        "icao": "VIR",
        "callsign": "VIRGIN",
        "country": "United Kingdom"
    });

    let created = server.post("/airlines").json(&airline).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(created.json::<Value>()["message"], "Airline added successfully");

    let found = server
        .get("/airlines/search")
        .add_query_param("iata", "VS")
        .await;
    assert_eq!(found.status_code(), StatusCode::OK);

    let duplicate = server.post("/airlines").json(&airline).await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    let body = duplicate.json::<Value>();
    assert_problem(&body, 400, "/problems/conflict");
    assert_eq!(body["detail"], "The IATA or ICAO code already exists");
}

#[tokio::test]
async fn test_create_airline_missing_fields() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .post("/airlines")
        .json(&json!({ "name": "Nameless", "iata": "NN" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_problem(&response.json::<Value>(), 400, "/problems/invalid-request");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server.post("/airlines").text("{not json").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_problem(&response.json::<Value>(), 400, "/problems/invalid-request");
}

#[tokio::test]
async fn test_delete_airline_then_missing_is_not_found() {
    let (_dir, server) = server(PlaneMatch::Exact);

    let deleted = server.delete("/airlines").add_query_param("iata", "af").await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    let body = deleted.json::<Value>();
    assert_eq!(body["message"], "Airline deleted successfully");
    assert_eq!(names(&body["deleted"], "name"), ["Air France"]);

    let again = server.delete("/airlines").add_query_param("iata", "AF").await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_airline_routes_are_ordered_legs() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airlines/routes")
        .add_query_param("airline", "ba")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["airline"], "BA");
    let legs: Vec<String> = body["routes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| format!("{}-{}", r["departure"].as_str().unwrap(), r["arrival"].as_str().unwrap()))
        .collect();
    assert_eq!(legs, ["JFK-LHR", "LHR-CDG", "LHR-JFK", "LHR-NWF"]);
}

#[tokio::test]
async fn test_airline_routes_rejects_wrong_length() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airlines/routes")
        .add_query_param("airline", "BAW")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Airports
// =============================================================================

#[tokio::test]
async fn test_airports_by_country() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airports")
        .add_query_param("country_code", "us")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let mut codes = names(&response.json::<Value>()["airports"], "iata");
    codes.sort();
    assert_eq!(codes, ["JFK", "LAX"]);
}

#[tokio::test]
async fn test_airport_search_includes_todays_temperatures() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airports/search")
        .add_query_param("iata", "lhr")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["name"], "London Heathrow Airport");
    assert_eq!(body["icao"], "EGLL");
    assert_eq!(body["high"], 18.5);
    assert_eq!(body["low"], 9.0);
}

#[tokio::test]
async fn test_airport_search_weather_failure_is_upstream_error() {
    let forecaster = Arc::new(StubForecaster::failing());
    let (_dir, state) = seeded_state_with(PlaneMatch::Exact, forecaster.clone());
    let server = TestServer::new(skylane_service::router(state, "/metrics")).unwrap();

    let response = server
        .get("/airports/search")
        .add_query_param("iata", "JFK")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_problem(&body, 500, "/problems/upstream-error");
    assert_eq!(body["detail"], "Failed to fetch weather data");
    assert_eq!(forecaster.calls(), 1);
}

#[tokio::test]
async fn test_airport_search_without_coordinates_skips_weather() {
    let forecaster = Arc::new(StubForecaster::failing());
    let (_dir, state) = seeded_state_with(PlaneMatch::Exact, forecaster.clone());
    let server = TestServer::new(skylane_service::router(state, "/metrics")).unwrap();

    let response = server
        .get("/airports/search")
        .add_query_param("iata", "NWF")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_problem(&response.json::<Value>(), 500, "/problems/data-integrity");
    assert_eq!(forecaster.calls(), 0);
}

#[tokio::test]
async fn test_create_airport_accepts_numeric_strings() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let airport = json!({
        "name": "Manchester Airport",
        "city": "Manchester",
        "country": "United Kingdom",
        "iata": "man",
        "icao": "EGCC",
        "latitude": 53.3537,
        "longitude": "-2.2750"
    });

    let created = server.post("/airports").json(&airport).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(created.json::<Value>()["message"], "Airport added successfully");

    let duplicate = server.post("/airports").json(&airport).await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    assert_problem(&duplicate.json::<Value>(), 400, "/problems/conflict");
}

#[tokio::test]
async fn test_create_airport_rejects_bad_latitude() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .post("/airports")
        .json(&json!({
            "name": "Broken",
            "city": "Nowhere",
            "country": "France",
            "iata": "BRK",
            "latitude": "north",
            "longitude": 2.0
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["detail"],
        "Latitude and longitude must be valid numbers"
    );
}

#[tokio::test]
async fn test_delete_airport() {
    let (_dir, server) = server(PlaneMatch::Exact);

    let deleted = server.delete("/airports").add_query_param("icao", "RJTT").await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(names(&deleted.json::<Value>()["deleted"], "iata"), ["HND"]);

    let missing = server.delete("/airports").add_query_param("icao", "RJTT").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_airports_routes_origin_lists_every_airport() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server.get("/airports/routesorigin").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["airports"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_airlines_serving_airport() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airports/airlinesbyairport")
        .add_query_param("iata", "cdg")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        names(&response.json::<Value>()["airlines"], "name"),
        ["Air France", "British Airways"]
    );
}

#[tokio::test]
async fn test_nearest_airports_to_central_london() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/airports/nearest")
        .add_query_param("lat", "51.5")
        .add_query_param("lon", "-0.1")
        .add_query_param("limit", "2")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(names(&body["airports"], "iata"), ["LHR", "CDG"]);
    assert!(body["airports"][0]["distance_km"].as_f64().unwrap() < 30.0);
}

#[tokio::test]
async fn test_nearest_airports_rejects_bad_input() {
    let (_dir, server) = server(PlaneMatch::Exact);

    let not_a_number = server
        .get("/airports/nearest")
        .add_query_param("lat", "abc")
        .add_query_param("lon", "0")
        .await;
    assert_eq!(not_a_number.status_code(), StatusCode::BAD_REQUEST);

    let too_many = server
        .get("/airports/nearest")
        .add_query_param("lat", "0")
        .add_query_param("lon", "0")
        .add_query_param("limit", "500")
        .await;
    assert_eq!(too_many.status_code(), StatusCode::BAD_REQUEST);

    let out_of_range = server
        .get("/airports/nearest")
        .add_query_param("lat", "91")
        .add_query_param("lon", "0")
        .await;
    assert_eq!(out_of_range.status_code(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Routes
// =============================================================================

#[tokio::test]
async fn test_route_distance_jfk_lhr() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/distance")
        .add_query_param("departure", "jfk")
        .add_query_param("arrival", "lhr")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let km = body["distance_km"].as_f64().unwrap();
    assert!((5540.0..=5560.0).contains(&km), "unexpected distance {km}");
    assert_eq!(body["carriers"].as_array().unwrap().len(), 2);
    assert!(body["carriers"][0]["planes"].is_array());
}

#[tokio::test]
async fn test_route_distance_without_route_is_not_found() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/distance")
        .add_query_param("departure", "LHR")
        .add_query_param("arrival", "LAX")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["detail"],
        "No routes found for the given airports"
    );
}

#[tokio::test]
async fn test_route_distance_missing_coordinates_is_data_integrity() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/distance")
        .add_query_param("departure", "LHR")
        .add_query_param("arrival", "NWF")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_problem(&response.json::<Value>(), 500, "/problems/data-integrity");
}

#[tokio::test]
async fn test_route_distance_rejects_short_code() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/distance")
        .add_query_param("departure", "JF")
        .add_query_param("arrival", "LHR")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_arrivals_from_departure() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/arrival")
        .add_query_param("departure", "lhr")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["departure"], "LHR");
    assert_eq!(body["arrivals"], json!(["CDG", "JFK", "NWF"]));
}

#[tokio::test]
async fn test_departures_into_arrival() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/arrivalto")
        .add_query_param("arrival", "JFK")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["arrival"], "JFK");
    let mut departures = names(&body["departures"], "departure");
    departures.sort();
    assert_eq!(departures, ["CDG", "LAX", "LHR"]);
}

#[tokio::test]
async fn test_arrival_details_from_departure() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/arrivaldetails")
        .add_query_param("departure", "JFK")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let arrivals = response.json::<Value>()["arrivals"].clone();
    assert_eq!(arrivals.as_array().unwrap().len(), 3);
    assert!(arrivals[0]["planes"].is_array());
}

#[tokio::test]
async fn test_route_search_exact_does_not_match_longer_tokens() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/search")
        .add_query_param("airline", "aa")
        .add_query_param("aircraft", "a32")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["airline"], "AA");
    assert_eq!(body["aircraft"], "A32");
    assert_eq!(body["routes"], json!([{ "departure": "LAX", "arrival": "JFK" }]));
}

#[tokio::test]
async fn test_route_search_substring_mode_matches_longer_tokens() {
    let (_dir, server) = server(PlaneMatch::Substring);
    let response = server
        .get("/routes/search")
        .add_query_param("airline", "AA")
        .add_query_param("aircraft", "A32")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["routes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_route_validates_references() {
    let (_dir, server) = server(PlaneMatch::Exact);

    let created = server
        .post("/routes")
        .json(&json!({ "airline": "af", "departure": "cdg", "arrival": "lhr", "planes": "320 321" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(created.json::<Value>()["message"], "Route added successfully");

    let duplicate = server
        .post("/routes")
        .json(&json!({ "airline": "AF", "departure": "CDG", "arrival": "LHR", "planes": "320" }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    assert_problem(&duplicate.json::<Value>(), 400, "/problems/conflict");

    let unknown_plane = server
        .post("/routes")
        .json(&json!({ "airline": "AF", "departure": "CDG", "arrival": "LAX", "planes": "999" }))
        .await;
    assert_eq!(unknown_plane.status_code(), StatusCode::BAD_REQUEST);

    let unknown_airline = server
        .post("/routes")
        .json(&json!({ "airline": "ZZ", "departure": "CDG", "arrival": "LAX", "planes": "320" }))
        .await;
    assert_eq!(unknown_airline.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        unknown_airline.json::<Value>()["detail"],
        "Invalid airline code. Airline not found"
    );
}

#[tokio::test]
async fn test_update_route_planes_is_idempotent() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let update = json!({
        "airline": "BA",
        "departure": "LHR",
        "arrival": "JFK",
        "newPlanes": "738 777"
    });

    let first = server.put("/routes/toUpdate").json(&update).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let body = first.json::<Value>();
    assert_eq!(body["message"], "Route updated successfully");
    assert_eq!(body["added"], 1);
    assert_eq!(body["planes"], json!(["744", "777", "738"]));

    let second = server.put("/routes/toUpdate").json(&update).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let body = second.json::<Value>();
    assert_eq!(body["message"], "No new aircraft types to add");
    assert_eq!(body["added"], 0);
    assert_eq!(body["planes"], json!(["744", "777", "738"]));
}

#[tokio::test]
async fn test_update_missing_route_is_not_found() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .put("/routes/toUpdate")
        .json(&json!({ "airline": "AF", "departure": "CDG", "arrival": "HND", "newPlanes": "777" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_route_then_missing_is_not_found() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let key = json!({ "airline": "BA", "departure": "LHR", "arrival": "NWF" });

    let deleted = server.delete("/routes/toDelete").json(&key).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    let body = deleted.json::<Value>();
    assert_eq!(body["message"], "Route deleted successfully");
    assert_eq!(body["deleted"].as_array().unwrap().len(), 1);

    let again = server.delete("/routes/toDelete").json(&key).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Planes and distance
// =============================================================================

#[tokio::test]
async fn test_plane_catalog() {
    let (_dir, server) = server(PlaneMatch::Exact);

    let all = server.get("/planes").await;
    assert_eq!(all.status_code(), StatusCode::OK);
    assert_eq!(all.json::<Value>()["planes"].as_array().unwrap().len(), 7);

    let distinct = server.get("/distinctplanes").await;
    assert_eq!(distinct.status_code(), StatusCode::OK);
    assert_eq!(distinct.json::<Value>()["planes"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_routes_by_plane() {
    let (_dir, server) = server(PlaneMatch::Exact);

    let found = server.get("/routes-by-plane/777").await;
    assert_eq!(found.status_code(), StatusCode::OK);
    let body = found.json::<Value>();
    assert_eq!(body["code"], "777");
    assert_eq!(body["routes"].as_array().unwrap().len(), 4);

    let missing = server.get("/routes-by-plane/999").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_distance_accepts_mixed_code_kinds() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/distance")
        .add_query_param("from", "kjfk")
        .add_query_param("to", "LHR")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["from"]["kind"], "ICAO");
    assert_eq!(body["to"]["kind"], "IATA");
    let km = body["distance_km"].as_f64().unwrap();
    assert!((5540.0..=5560.0).contains(&km));
}

#[tokio::test]
async fn test_distance_requires_both_codes() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server.get("/distance").add_query_param("from", "JFK").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["detail"], "Missing airport codes");
}

// =============================================================================
// Ambient endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let (_dir, server) = server(PlaneMatch::Exact);

    let live = server.get("/health/live").await;
    assert_eq!(live.status_code(), StatusCode::OK);
    assert_eq!(live.json::<Value>()["status"], "ok");

    let ready = server.get("/health/ready").await;
    assert_eq!(ready.status_code(), StatusCode::OK);
    assert_eq!(ready.json::<Value>()["database"], "reachable");
}

#[tokio::test]
async fn test_health_reports_service_identity() {
    let (_dir, state) = seeded_state(PlaneMatch::Exact);
    let state = state.with_identity(ServiceIdentity::new("skylane-service", "0.1.0"));
    let server = TestServer::new(skylane_service::router(state, "/metrics")).unwrap();

    for path in ["/health/live", "/health/ready"] {
        let body = server.get(path).await.json::<Value>();
        assert_eq!(body["service"], "skylane-service", "{path}");
        assert_eq!(body["version"], "0.1.0", "{path}");
    }
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains('#') || response.text().is_empty());
}

#[tokio::test]
async fn test_problem_instance_carries_request_id() {
    let (_dir, server) = server(PlaneMatch::Exact);
    let response = server
        .get("/routes/distance")
        .add_header("x-request-id", "req-trace-42")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.header("x-request-id"), "req-trace-42");
    assert_eq!(response.json::<Value>()["instance"], "req-trace-42");
}
