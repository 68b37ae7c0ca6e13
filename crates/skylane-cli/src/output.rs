//! Text and JSON rendering of command results.

use anyhow::Result;
use serde::Serialize;

use skylane_lib::{AirportDistance, NearbyAirport, RouteDistance};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn airport_distance(result: &AirportDistance, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }

    println!(
        "{} ({}, {}) -> {} ({}, {}): {:.2} km",
        result.from.code,
        result.from.kind,
        result.from.name,
        result.to.code,
        result.to.kind,
        result.to.name,
        result.distance_km
    );
    Ok(())
}

pub fn route_distance(result: &RouteDistance, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }

    println!(
        "{} -> {}: {:.2} km",
        result.departure, result.arrival, result.distance_km
    );
    for carrier in &result.carriers {
        println!("- {}: {}", carrier.airline, carrier.planes);
    }
    Ok(())
}

pub fn nearest(airports: &[NearbyAirport], json: bool) -> Result<()> {
    if json {
        return print_json(airports);
    }

    if airports.is_empty() {
        println!("No airports with coordinates found");
        return Ok(());
    }
    for (rank, nearby) in airports.iter().enumerate() {
        println!(
            "{}. {} {} ({:.2} km)",
            rank + 1,
            nearby.airport.display_code(),
            nearby.airport.name,
            nearby.distance_km
        );
    }
    Ok(())
}
