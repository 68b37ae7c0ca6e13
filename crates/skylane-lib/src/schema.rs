/// Five-table relational schema: countries, airlines, airports, planes, routes.
///
/// `routes.planes` holds the space-delimited plane-code token string.
pub const SCHEMA: &str = r#"

CREATE TABLE IF NOT EXISTS countries (
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS airlines (
    name TEXT NOT NULL,
    iata TEXT,
    icao TEXT,
    callsign TEXT,
    country TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS airports (
    name TEXT NOT NULL,
    city TEXT,
    country TEXT NOT NULL,
    iata TEXT,
    icao TEXT,
    latitude REAL,
    longitude REAL
);

CREATE TABLE IF NOT EXISTS planes (
    name TEXT NOT NULL,
    code TEXT
);

CREATE TABLE IF NOT EXISTS routes (
    airline TEXT NOT NULL,
    departure TEXT NOT NULL,
    arrival TEXT NOT NULL,
    planes TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_airlines_iata ON airlines (iata);
CREATE INDEX IF NOT EXISTS idx_airports_iata ON airports (iata);
CREATE INDEX IF NOT EXISTS idx_airports_icao ON airports (icao);
CREATE INDEX IF NOT EXISTS idx_routes_airline ON routes (airline);
CREATE INDEX IF NOT EXISTS idx_routes_departure ON routes (departure);
CREATE INDEX IF NOT EXISTS idx_routes_arrival ON routes (arrival);

"#;
