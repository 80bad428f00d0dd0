//! Offline candidate source used when live search is unavailable.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::candidate::Candidate;
use crate::catalog::FallbackRestaurant;
use crate::category::FoodCategory;
use crate::geo::Coordinate;
use crate::selection::{FallbackSource, BRACKET_SIZE, PER_CATEGORY_QUOTA};
use crate::shuffle::shuffle_with;

/// Half-width, in degrees, of the box a restaurant without coordinates is
/// scattered into around the query point.
const JITTER_DEGREES: f64 = 0.005;

#[derive(Debug, Clone, Default)]
pub struct FallbackCatalog {
    restaurants: Vec<FallbackRestaurant>,
}

impl FallbackCatalog {
    #[must_use]
    pub fn new(restaurants: Vec<FallbackRestaurant>) -> Self {
        Self { restaurants }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Pick up to eight restaurants in random order, at most two per cuisine
    /// on the first pass, then any remaining ones to fill the bracket.
    pub fn candidates_near_with<R: Rng + ?Sized>(
        &self,
        origin: Coordinate,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let pool: Vec<Candidate> = shuffle_with(&self.restaurants, rng)
            .into_iter()
            .map(|r| to_candidate(r, origin, rng))
            .collect();

        let mut result: Vec<Candidate> = Vec::with_capacity(BRACKET_SIZE);
        let mut used: HashSet<String> = HashSet::new();
        let mut per_category: HashMap<FoodCategory, usize> = HashMap::new();

        for candidate in &pool {
            if result.len() >= BRACKET_SIZE {
                break;
            }
            let count = per_category.entry(candidate.category).or_default();
            if *count < PER_CATEGORY_QUOTA && used.insert(candidate.id.clone()) {
                *count += 1;
                result.push(candidate.clone());
            }
        }

        for candidate in pool {
            if result.len() >= BRACKET_SIZE {
                break;
            }
            if used.insert(candidate.id.clone()) {
                result.push(candidate);
            }
        }

        result
    }
}

impl FallbackSource for FallbackCatalog {
    fn fallback_candidates(&self, origin: Coordinate) -> Vec<Candidate> {
        self.candidates_near_with(origin, &mut rand::rng())
    }
}

fn to_candidate<R: Rng + ?Sized>(r: FallbackRestaurant, origin: Coordinate, rng: &mut R) -> Candidate {
    let category = FoodCategory::from_dish_label(&r.category);
    let (lat, lng) = match r.lat.zip(r.lng) {
        Some(coords) => coords,
        None => (
            origin.lat + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES),
            origin.lng + rng.random_range(-JITTER_DEGREES..JITTER_DEGREES),
        ),
    };
    Candidate {
        place_id: Some(r.id.clone()),
        id: r.id,
        name: r.name,
        category,
        category_label: category.label().to_string(),
        rating: r.rating,
        review_count: r.review_count,
        lat,
        lng,
        address: Some(r.address).filter(|a| !a.is_empty()),
        photo_url: r.photo_url.filter(|u| !u.is_empty()),
        photo_urls: r.photo_urls,
        score: 0.0,
    }
}
