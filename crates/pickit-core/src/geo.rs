//! Coordinates and the Seoul service area.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lng_min..=self.lng_max).contains(&lng)
    }
}

/// Rough bounding box of the city of Seoul.
pub const SEOUL_BOUNDS: Bounds = Bounds {
    lat_min: 37.413,
    lat_max: 37.715,
    lng_min: 126.734,
    lng_max: 127.269,
};

#[must_use]
pub fn is_within_seoul(lat: f64, lng: f64) -> bool {
    SEOUL_BOUNDS.contains(lat, lng)
}
