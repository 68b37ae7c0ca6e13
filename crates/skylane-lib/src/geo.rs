//! Great-circle and planar distance helpers.
//!
//! Two flavours are provided:
//!
//! - [`distance_km`] / [`Coordinates::distance_km`]: Haversine great-circle
//!   distance in kilometres on a sphere of radius [`EARTH_RADIUS_KM`].
//! - [`quick_distance`]: Euclidean distance on raw degree values. The result
//!   has no physical unit and is only meaningful for ranking candidates
//!   against the same origin (see [`rank_nearest`]).
//!
//! Inputs are not range-checked; callers validate coordinates before calling.

use serde::{Deserialize, Serialize};

/// Earth radius used by the Haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components lie within [-90, 90] and [-180, 180].
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to another point in kilometres.
    pub fn distance_km(&self, other: &Self) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Planar approximation for relative ranking only.
    pub fn quick_distance(&self, other: &Self) -> f64 {
        quick_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine great-circle distance between two points, in kilometres.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Euclidean distance over raw degree values. Not a physical distance.
pub fn quick_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;
    (d_lat * d_lat + d_lon * d_lon).sqrt()
}

/// Round a kilometre value to two decimals for presentation.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Rank candidates by [`quick_distance`] from `origin` and keep the closest `k`.
///
/// Returns `(item, score)` pairs sorted by ascending score. Ties keep input order.
pub fn rank_nearest<T>(
    origin: Coordinates,
    candidates: impl IntoIterator<Item = (T, Coordinates)>,
    k: usize,
) -> Vec<(T, f64)> {
    if k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(T, f64)> = candidates
        .into_iter()
        .map(|(item, coords)| {
            let score = origin.quick_distance(&coords);
            (item, score)
        })
        .collect();

    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}
