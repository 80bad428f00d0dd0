//! Admin edits to curated areas, persisted next to the image overrides.
//!
//! Edits are stamped with the catalog version they were made against. When
//! the bundled catalog moves to a new version, older edits are ignored and
//! the seed data wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::catalog::{Catalog, CuratedArea, CuratedRestaurant};
use crate::error::StoreError;
use crate::overrides::{write_json, ImageOverrides};
use crate::scoring::{bayesian_score, global_mean};
use crate::selection::BRACKET_SIZE;
use crate::shuffle::shuffle_with;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CuratedEdits {
    version: u32,
    #[serde(default)]
    areas: BTreeMap<String, Vec<CuratedRestaurant>>,
}

/// Snapshot of every curated area with edits merged in, as exported for
/// re-bundling into the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CuratedExport {
    pub version: u32,
    pub exported_at: chrono::DateTime<chrono::Utc>,
    pub areas: Vec<CuratedArea>,
}

#[derive(Debug, Clone)]
pub struct CuratedStore {
    path: PathBuf,
}

impl CuratedStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restaurants of `area_id`, taking stored edits over the seed data when
    /// they match the catalog version and are non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownArea`] for an area not in the catalog, or
    /// an I/O / JSON error if the edits file is unreadable.
    pub fn restaurants(
        &self,
        catalog: &Catalog,
        area_id: &str,
    ) -> Result<Vec<CuratedRestaurant>, StoreError> {
        let area = find_area(catalog, area_id)?;
        let edits = self.read()?;
        if edits.version == catalog.version {
            if let Some(stored) = edits.areas.get(area_id).filter(|r| !r.is_empty()) {
                return Ok(stored.clone());
            }
        } else if !edits.areas.is_empty() {
            tracing::debug!(
                stored = edits.version,
                current = catalog.version,
                "ignoring curated edits from an older catalog version"
            );
        }
        Ok(area.restaurants.clone())
    }

    /// Replace the stored list for `area_id`.
    ///
    /// Saving against a new catalog version discards edits to other areas
    /// that were recorded under the old version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the area is unknown or the file cannot be
    /// read or written.
    pub fn save_area(
        &self,
        catalog: &Catalog,
        area_id: &str,
        restaurants: Vec<CuratedRestaurant>,
    ) -> Result<(), StoreError> {
        find_area(catalog, area_id)?;
        let mut edits = self.read()?;
        if edits.version != catalog.version {
            edits = CuratedEdits {
                version: catalog.version,
                areas: BTreeMap::new(),
            };
        }
        edits.areas.insert(area_id.to_string(), restaurants);
        write_json(&self.path, &edits)
    }

    /// Remove one restaurant from an area. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// See [`CuratedStore::save_area`].
    pub fn remove(
        &self,
        catalog: &Catalog,
        area_id: &str,
        restaurant_id: &str,
    ) -> Result<bool, StoreError> {
        let mut restaurants = self.restaurants(catalog, area_id)?;
        let before = restaurants.len();
        restaurants.retain(|r| r.id != restaurant_id);
        if restaurants.len() == before {
            return Ok(false);
        }
        self.save_area(catalog, area_id, restaurants)?;
        Ok(true)
    }

    /// Insert a restaurant, or replace the one with the same id in place.
    ///
    /// # Errors
    ///
    /// See [`CuratedStore::save_area`].
    pub fn upsert(
        &self,
        catalog: &Catalog,
        area_id: &str,
        restaurant: CuratedRestaurant,
    ) -> Result<(), StoreError> {
        let mut restaurants = self.restaurants(catalog, area_id)?;
        match restaurants.iter_mut().find(|r| r.id == restaurant.id) {
            Some(existing) => *existing = restaurant,
            None => restaurants.push(restaurant),
        }
        self.save_area(catalog, area_id, restaurants)
    }

    /// Every curated area with edits merged, ready to serialize.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the edits file is unreadable.
    pub fn export(&self, catalog: &Catalog) -> Result<CuratedExport, StoreError> {
        let areas = catalog
            .areas
            .iter()
            .map(|area| {
                Ok(CuratedArea {
                    restaurants: self.restaurants(catalog, &area.id)?,
                    ..area.clone()
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok(CuratedExport {
            version: catalog.version,
            exported_at: chrono::Utc::now(),
            areas,
        })
    }

    fn read(&self) -> Result<CuratedEdits, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CuratedEdits::default())
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Json {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

fn find_area<'a>(catalog: &'a Catalog, area_id: &str) -> Result<&'a CuratedArea, StoreError> {
    catalog
        .area(area_id)
        .ok_or_else(|| StoreError::UnknownArea(area_id.to_string()))
}

/// Eight random restaurants from a curated area.
///
/// The draw ignores ratings, but each entrant is scored against the mean
/// rating of the whole area so the bracket can still compare them.
pub fn curated_candidates<R: Rng + ?Sized>(
    restaurants: &[CuratedRestaurant],
    overrides: &ImageOverrides,
    rng: &mut R,
) -> Vec<Candidate> {
    let all: Vec<Candidate> = restaurants
        .iter()
        .map(CuratedRestaurant::to_candidate)
        .collect();
    let mean = global_mean(&all);

    let mut picked: Vec<Candidate> = shuffle_with(&all, rng);
    picked.truncate(BRACKET_SIZE);
    for candidate in &mut picked {
        candidate.score = bayesian_score(candidate.rating, candidate.review_count, mean);
    }
    overrides.apply_all(picked)
}
