//! The restaurant catalog: the offline fallback dataset and the curated
//! neighborhoods, loaded from YAML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::category::FoodCategory;
use crate::error::ConfigError;
use crate::fallback::FallbackCatalog;
use crate::geo::is_within_seoul;

/// A restaurant from the offline dataset, tagged with a dish label rather
/// than a cuisine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRestaurant {
    pub id: String,
    pub district: String,
    pub name: String,
    /// Dish label such as `한우` or `스시`; see [`FoodCategory::from_dish_label`].
    pub category: String,
    pub rating: f64,
    pub review_count: u32,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// A hand-picked restaurant in a curated area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedRestaurant {
    pub id: String,
    pub name: String,
    pub category: FoodCategory,
    pub rating: f64,
    pub review_count: u32,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,
}

impl CuratedRestaurant {
    #[must_use]
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            id: self.id.clone(),
            place_id: None,
            name: self.name.clone(),
            category: self.category,
            category_label: self.category.label().to_string(),
            rating: self.rating,
            review_count: self.review_count,
            lat: self.lat,
            lng: self.lng,
            address: Some(self.address.clone()).filter(|a| !a.is_empty()),
            photo_url: self.photo_url.clone().filter(|u| !u.is_empty()),
            photo_urls: self.photo_urls.clone(),
            score: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedArea {
    pub id: String,
    pub label: String,
    pub lat: f64,
    pub lng: f64,
    pub restaurants: Vec<CuratedRestaurant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Bumped whenever the curated seed data changes; stale admin edits
    /// recorded against an older version are ignored.
    pub version: u32,
    /// Generic food photos for places the provider has no photos of.
    #[serde(default)]
    pub stock_photos: Vec<String>,
    pub fallback: Vec<FallbackRestaurant>,
    #[serde(default)]
    pub areas: Vec<CuratedArea>,
}

impl Catalog {
    #[must_use]
    pub fn area(&self, id: &str) -> Option<&CuratedArea> {
        self.areas.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn fallback_catalog(&self) -> FallbackCatalog {
        FallbackCatalog::new(self.fallback.clone())
    }
}

/// Load and validate the catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse and validate catalog YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    let mut check = |id: &str, name: &str, rating: f64, coords: Option<(f64, f64)>| {
        if id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "restaurant '{name}' has an empty id"
            )));
        }
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "restaurant '{id}' has an empty name"
            )));
        }
        if !(0.0..=5.0).contains(&rating) {
            return Err(ConfigError::Validation(format!(
                "restaurant '{id}' has rating {rating}; must be within 0..=5"
            )));
        }
        if let Some((lat, lng)) = coords {
            if !is_within_seoul(lat, lng) {
                return Err(ConfigError::Validation(format!(
                    "restaurant '{id}' at {lat},{lng} lies outside Seoul"
                )));
            }
        }
        if !seen_ids.insert(id.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate restaurant id: '{id}'"
            )));
        }
        Ok(())
    };

    for r in &catalog.fallback {
        let coords = r.lat.zip(r.lng);
        if r.lat.is_some() != r.lng.is_some() {
            return Err(ConfigError::Validation(format!(
                "restaurant '{}' must set both lat and lng or neither",
                r.id
            )));
        }
        check(&r.id, &r.name, r.rating, coords)?;
    }

    if let Some(url) = catalog
        .stock_photos
        .iter()
        .find(|u| !u.starts_with("https://") && !u.starts_with("http://"))
    {
        return Err(ConfigError::Validation(format!(
            "stock photo '{url}' is not an http(s) URL"
        )));
    }

    let mut seen_areas = HashSet::new();
    for area in &catalog.areas {
        if !seen_areas.insert(area.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate area id: '{}'",
                area.id
            )));
        }
        if !is_within_seoul(area.lat, area.lng) {
            return Err(ConfigError::Validation(format!(
                "area '{}' is centred outside Seoul",
                area.id
            )));
        }
        for r in &area.restaurants {
            check(&r.id, &r.name, r.rating, Some((r.lat, r.lng)))?;
        }
    }

    Ok(())
}
