use clap::Args;
use pickit_core::{is_within_seoul, Coordinate};

/// Where to look for restaurants: a coordinate pair or a curated area id.
#[derive(Debug, Clone, Args)]
pub struct LocationArgs {
    /// Latitude of the search center
    #[arg(long, requires = "lng")]
    pub lat: Option<f64>,
    /// Longitude of the search center
    #[arg(long, requires = "lat")]
    pub lng: Option<f64>,
    /// Curated area id instead of coordinates (see `pickit areas`)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub area: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates(Coordinate),
    Area(String),
}

impl LocationArgs {
    /// # Errors
    ///
    /// Returns an error if neither form was given, or if the coordinate lies
    /// outside Seoul.
    pub fn resolve(&self) -> anyhow::Result<Location> {
        if let Some(area) = &self.area {
            return Ok(Location::Area(area.clone()));
        }
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            anyhow::bail!("pass --lat and --lng, or --area <id>");
        };
        if !is_within_seoul(lat, lng) {
            anyhow::bail!("({lat}, {lng}) is outside Seoul; only Seoul locations are supported");
        }
        Ok(Location::Coordinates(Coordinate::new(lat, lng)))
    }
}
