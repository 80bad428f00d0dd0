use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::category::FoodCategory;
use crate::geo::Coordinate;

/// A restaurant eligible for the bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable id, unique within one search batch.
    pub id: String,
    /// Provider place id when the candidate came from a live search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub name: String,
    pub category: FoodCategory,
    /// Human-facing category label, usually `category.label()`.
    pub category_label: String,
    /// Average rating in `[0, 5]`; `0.0` when the provider had none.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    /// Shrinkage-adjusted score, assigned during selection.
    #[serde(default)]
    pub score: f64,
}

impl Candidate {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    #[must_use]
    pub fn emoji(&self) -> &'static str {
        self.category.emoji()
    }
}

/// Search results grouped by cuisine, built once per search request.
pub type CategoryResults = HashMap<FoodCategory, Vec<Candidate>>;
