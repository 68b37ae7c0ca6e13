mod common;

use std::sync::Barrier;
use std::thread;

use skylane_lib::repo::{airlines, airports, countries, planes, routes};
use skylane_lib::{CodeFilter, Error, NewAirline, NewAirport, NewRoute, PlaneMatch, PlaneUpdate, RouteKey};

use common::seeded_db;

fn route_key(airline: &str, departure: &str, arrival: &str) -> RouteKey {
    RouteKey {
        airline: Some(airline.into()),
        departure: Some(departure.into()),
        arrival: Some(arrival.into()),
    }
}

#[test]
fn countries_are_name_ordered() {
    let (_dir, db) = seeded_db();
    let names: Vec<String> = countries::list_all(&db)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["France", "Japan", "United Kingdom", "United States"]);
}

#[test]
fn airlines_by_country_normalizes_code() {
    let (_dir, db) = seeded_db();
    let airlines = airlines::by_country(&db, Some(" gb ")).unwrap();
    assert_eq!(airlines.len(), 1);
    assert_eq!(airlines[0].iata.as_deref(), Some("BA"));
}

#[test]
fn airlines_by_country_distinguishes_missing_and_empty() {
    let (_dir, db) = seeded_db();
    assert!(matches!(
        airlines::by_country(&db, None),
        Err(Error::Validation { .. })
    ));
    assert!(matches!(
        airlines::by_country(&db, Some("ZZ")),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn airline_lookup_is_case_insensitive() {
    let (_dir, db) = seeded_db();
    let found = airlines::find_by_code(&db, &CodeFilter::new(Some("afr"), None)).unwrap();
    assert_eq!(found[0].name, "Air France");

    let both = airlines::find_by_code(&db, &CodeFilter::new(Some("BAW"), Some("aa"))).unwrap();
    assert_eq!(both.len(), 2);
}

#[test]
fn duplicate_airline_code_is_a_conflict() {
    let (_dir, db) = seeded_db();
    let draft = NewAirline {
        name: Some("Copy Airways".into()),
        iata: Some("ba".into()),
        icao: Some("CPY".into()),
        callsign: Some("COPY".into()),
        country: Some("United Kingdom".into()),
    };
    let err = airlines::insert(&db, &draft).unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert_eq!(airlines::list_all(&db).unwrap().len(), 3);
}

#[test]
fn concurrent_duplicate_airline_inserts_conflict_once() {
    let (_dir, db) = seeded_db();
    let barrier = Barrier::new(2);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = ["Northern Skies", "Northern Skyways"]
            .into_iter()
            .map(|name| {
                let db = &db;
                let barrier = &barrier;
                scope.spawn(move || {
                    let draft = NewAirline {
                        name: Some(name.into()),
                        iata: Some("NS".into()),
                        icao: Some("NSK".into()),
                        callsign: Some("NORTHERN".into()),
                        country: Some("United Kingdom".into()),
                    };
                    barrier.wait();
                    airlines::insert(db, &draft)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("insert thread"))
            .collect()
    });

    let inserted = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(Error::Conflict { .. })))
        .count();
    assert_eq!((inserted, conflicts), (1, 1));

    let filter = CodeFilter::new(None, Some("NS"));
    assert_eq!(airlines::find_by_code(&db, &filter).unwrap().len(), 1);
}

#[test]
fn airline_insert_then_delete_returns_rows() {
    let (_dir, db) = seeded_db();
    let draft = NewAirline {
        name: Some("Japan Airlines".into()),
        iata: Some("jl".into()),
        icao: Some("JAL".into()),
        callsign: Some("JAPANAIR".into()),
        country: Some("Japan".into()),
    };
    let created = airlines::insert(&db, &draft).unwrap();
    assert_eq!(created.iata.as_deref(), Some("JL"));

    let deleted = airlines::delete_by_code(&db, &CodeFilter::new(None, Some("jl"))).unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].name, "Japan Airlines");

    assert!(matches!(
        airlines::find_by_code(&db, &CodeFilter::new(None, Some("JL"))),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn deleting_unknown_airline_is_not_found() {
    let (_dir, db) = seeded_db();
    let err = airlines::delete_by_code(&db, &CodeFilter::new(Some("ZZZ"), None)).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn airlines_serving_airport_are_distinct() {
    let (_dir, db) = seeded_db();
    let serving = airlines::serving_airport(&db, Some("jfk")).unwrap();
    let names: Vec<&str> = serving.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Air France", "American Airlines", "British Airways"]);
}

#[test]
fn airport_lookup_normalizes_case() {
    let (_dir, db) = seeded_db();
    let found = airports::find_by_code(&db, &CodeFilter::new(Some("egll"), None)).unwrap();
    assert_eq!(found[0].iata.as_deref(), Some("LHR"));
}

#[test]
fn duplicate_airport_code_is_a_conflict() {
    let (_dir, db) = seeded_db();
    let draft = NewAirport {
        name: Some("Second Kennedy".into()),
        city: Some("New York".into()),
        country: Some("United States".into()),
        iata: Some("JFK".into()),
        icao: None,
        latitude: Some(40.0.into()),
        longitude: Some((-73.0).into()),
    };
    assert!(matches!(
        airports::insert(&db, &draft),
        Err(Error::Conflict { .. })
    ));
}

#[test]
fn deleting_unknown_airport_is_not_found() {
    let (_dir, db) = seeded_db();
    let err = airports::delete_by_code(&db, &CodeFilter::new(None, Some("QQQ"))).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn plane_catalog_listings() {
    let (_dir, db) = seeded_db();
    assert_eq!(planes::list_all(&db).unwrap().len(), 7);

    let distinct = planes::list_distinct(&db).unwrap();
    assert_eq!(distinct.len(), 6);
    assert!(distinct.iter().all(|p| p.code.is_some()));
    assert_eq!(distinct[0].name, "Airbus A320");
}

#[test]
fn routes_by_airline_are_ordered_legs() {
    let (_dir, db) = seeded_db();
    let legs = routes::by_airline(&db, Some("ba")).unwrap();
    let pairs: Vec<(&str, &str)> = legs
        .iter()
        .map(|l| (l.departure.as_str(), l.arrival.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [("JFK", "LHR"), ("LHR", "CDG"), ("LHR", "JFK"), ("LHR", "NWF")]
    );
}

#[test]
fn routes_by_airline_rejects_bad_length() {
    let (_dir, db) = seeded_db();
    let err = routes::by_airline(&db, Some("BAW")).unwrap_err();
    assert!(err.to_string().contains("Must be 2 characters"));
}

#[test]
fn arrivals_from_departure_are_distinct() {
    let (_dir, db) = seeded_db();
    assert_eq!(
        routes::arrivals_from(&db, Some("lhr")).unwrap(),
        ["CDG", "JFK", "NWF"]
    );
    assert!(matches!(
        routes::arrivals_from(&db, Some("HND")),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn departures_into_arrival_include_planes() {
    let (_dir, db) = seeded_db();
    let details = routes::departures_into(&db, Some("JFK")).unwrap();
    assert_eq!(details.len(), 3);
    let from_cdg = details.iter().find(|d| d.departure == "CDG").unwrap();
    assert_eq!(from_cdg.airline, "AF");
    assert_eq!(from_cdg.planes.to_token_string(), "320 777");
}

#[test]
fn aircraft_search_exact_does_not_match_longer_tokens() {
    let (_dir, db) = seeded_db();
    let legs =
        routes::search_by_airline_and_aircraft(&db, Some("AA"), Some("a32"), PlaneMatch::Exact)
            .unwrap();
    assert_eq!(legs.len(), 1);
    assert_eq!(legs[0].departure, "LAX");
}

#[test]
fn aircraft_search_substring_keeps_legacy_matches() {
    let (_dir, db) = seeded_db();
    let legs = routes::search_by_airline_and_aircraft(
        &db,
        Some("AA"),
        Some("A32"),
        PlaneMatch::Substring,
    )
    .unwrap();
    assert_eq!(legs.len(), 2);
}

#[test]
fn routes_by_plane_matches_tokens() {
    let (_dir, db) = seeded_db();
    assert_eq!(routes::by_plane(&db, "777", PlaneMatch::Exact).unwrap().len(), 4);
    assert!(matches!(
        routes::by_plane(&db, "999", PlaneMatch::Exact),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn route_insert_checks_references() {
    let (_dir, db) = seeded_db();
    let mut draft = NewRoute {
        airline: Some("ZZ".into()),
        departure: Some("LHR".into()),
        arrival: Some("LAX".into()),
        planes: Some("777".into()),
    };
    let err = routes::insert(&db, &draft).unwrap_err();
    assert!(err.to_string().contains("Airline not found"));

    draft.airline = Some("BA".into());
    draft.arrival = Some("QQQ".into());
    let err = routes::insert(&db, &draft).unwrap_err();
    assert!(err.to_string().contains("airport not found"));

    draft.arrival = Some("LAX".into());
    draft.planes = Some("777 999".into());
    let err = routes::insert(&db, &draft).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(err.to_string().contains("999"));

    draft.planes = Some("777".into());
    let route = routes::insert(&db, &draft).unwrap();
    assert_eq!(route.planes.to_token_string(), "777");
    assert_eq!(routes::between(&db, "lhr", "lax").unwrap().len(), 1);
}

#[test]
fn duplicate_route_is_a_conflict() {
    let (_dir, db) = seeded_db();
    let draft = NewRoute {
        airline: Some("ba".into()),
        departure: Some("lhr".into()),
        arrival: Some("jfk".into()),
        planes: Some("777".into()),
    };
    assert!(matches!(
        routes::insert(&db, &draft),
        Err(Error::Conflict { .. })
    ));
}

#[test]
fn plane_union_update_is_idempotent() {
    let (_dir, db) = seeded_db();
    let update = PlaneUpdate {
        airline: Some("BA".into()),
        departure: Some("LHR".into()),
        arrival: Some("JFK".into()),
        new_planes: Some("738 777".into()),
    };

    let first = routes::add_planes(&db, &update).unwrap();
    assert_eq!(first.added, 1);
    assert_eq!(first.planes.to_token_string(), "744 777 738");

    let second = routes::add_planes(&db, &update).unwrap();
    assert_eq!(second.added, 0);
    assert_eq!(second.planes, first.planes);

    let stored = routes::between(&db, "LHR", "JFK").unwrap();
    assert_eq!(stored[0].planes.to_token_string(), "744 777 738");
}

fn add_to_lhr_cdg(new_planes: &str) -> PlaneUpdate {
    PlaneUpdate {
        airline: Some("BA".into()),
        departure: Some("LHR".into()),
        arrival: Some("CDG".into()),
        new_planes: Some(new_planes.into()),
    }
}

#[test]
fn plane_update_keeps_repeated_stored_tokens() {
    let (_dir, db) = seeded_db();
    db.execute_batch(
        "UPDATE routes SET planes = '320 320 321' \
         WHERE airline = 'BA' AND departure = 'LHR' AND arrival = 'CDG';",
    )
    .unwrap();

    let outcome = routes::add_planes(&db, &add_to_lhr_cdg("744 320")).unwrap();
    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.planes.to_token_string(), "320 320 321 744");

    let stored = routes::between(&db, "LHR", "CDG").unwrap();
    assert_eq!(stored[0].planes.to_token_string(), "320 320 321 744");
}

#[test]
fn plane_update_matches_lower_case_stored_tokens() {
    let (_dir, db) = seeded_db();
    db.execute_batch(
        "INSERT INTO planes (name, code) VALUES ('Canadair Regional Jet', 'CRJ'); \
         UPDATE routes SET planes = '320 crj' \
         WHERE airline = 'BA' AND departure = 'LHR' AND arrival = 'CDG';",
    )
    .unwrap();

    let outcome = routes::add_planes(&db, &add_to_lhr_cdg("crj")).unwrap();
    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.planes.to_token_string(), "320 crj");

    let stored = routes::between(&db, "LHR", "CDG").unwrap();
    assert_eq!(stored[0].planes.to_token_string(), "320 crj");
}

#[test]
fn plane_update_on_missing_route_is_not_found() {
    let (_dir, db) = seeded_db();
    let update = PlaneUpdate {
        airline: Some("AF".into()),
        departure: Some("HND".into()),
        arrival: Some("LAX".into()),
        new_planes: Some("777".into()),
    };
    assert!(matches!(
        routes::add_planes(&db, &update),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn route_delete_reports_missing_route() {
    let (_dir, db) = seeded_db();
    let deleted = routes::delete(&db, &route_key("BA", "LHR", "NWF")).unwrap();
    assert_eq!(deleted.len(), 1);

    assert!(matches!(
        routes::delete(&db, &route_key("BA", "LHR", "NWF")),
        Err(Error::NotFound { .. })
    ));
}
