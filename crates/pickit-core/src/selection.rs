//! Reduce per-category search results to the eight bracket entrants.

use std::collections::HashSet;

use crate::candidate::{Candidate, CategoryResults};
use crate::category::FoodCategory;
use crate::geo::Coordinate;
use crate::overrides::ImageOverrides;
use crate::scoring::{bayesian_score, global_mean};

/// Number of entrants in a bracket.
pub const BRACKET_SIZE: usize = 8;

/// Top-scored members each category is guaranteed before leftovers compete.
pub const PER_CATEGORY_QUOTA: usize = 2;

/// Local dataset consulted when live search returns nothing or too little.
pub trait FallbackSource {
    /// Up to eight category-balanced candidates for the given location.
    fn fallback_candidates(&self, origin: Coordinate) -> Vec<Candidate>;
}

/// Select eight scored, category-balanced candidates.
///
/// 1. Score every candidate against the mean rating of the whole batch.
/// 2. Walk categories in [`FoodCategory::ALL`] order, taking each one's top
///    [`PER_CATEGORY_QUOTA`] by score.
/// 3. Fill remaining slots from the leftovers of every category, best score
///    first (ties keep input order).
/// 4. Top up from `fallback` when the search was too sparse.
/// 5. Apply `overrides` to the display fields.
///
/// Never fails. If both the search and the fallback run dry the result has
/// fewer than [`BRACKET_SIZE`] entries, and callers must not seed a bracket
/// with it.
#[must_use]
pub fn select_eight(
    mut results: CategoryResults,
    fallback: &dyn FallbackSource,
    origin: Coordinate,
    overrides: &ImageOverrides,
) -> Vec<Candidate> {
    let total: usize = results.values().map(Vec::len).sum();
    if total == 0 {
        tracing::debug!(%origin, "no search results, using fallback catalog");
        let mut picked = fallback.fallback_candidates(origin);
        picked.truncate(BRACKET_SIZE);
        return overrides.apply_all(picked);
    }

    let mean = global_mean(results.values().flatten());
    for candidate in results.values_mut().flatten() {
        candidate.score = bayesian_score(candidate.rating, candidate.review_count, mean);
    }

    let mut selected: Vec<Candidate> = Vec::with_capacity(BRACKET_SIZE);
    let mut used: HashSet<String> = HashSet::new();
    let mut leftovers: Vec<Candidate> = Vec::new();

    for category in FoodCategory::ALL {
        let Some(mut list) = results.remove(&category) else {
            continue;
        };
        list.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut picked = 0;
        for candidate in list {
            if picked < PER_CATEGORY_QUOTA {
                if used.insert(candidate.id.clone()) {
                    selected.push(candidate);
                    picked += 1;
                }
            } else {
                leftovers.push(candidate);
            }
        }
    }

    leftovers.sort_by(|a, b| b.score.total_cmp(&a.score));
    fill_unique(&mut selected, &mut used, leftovers);

    if selected.len() < BRACKET_SIZE {
        tracing::debug!(
            %origin,
            have = selected.len(),
            "search too sparse, topping up from fallback catalog"
        );
        fill_unique(&mut selected, &mut used, fallback.fallback_candidates(origin));
    }

    selected.truncate(BRACKET_SIZE);
    tracing::debug!(
        count = selected.len(),
        global_mean = mean,
        "selected bracket candidates"
    );
    overrides.apply_all(selected)
}

fn fill_unique(
    selected: &mut Vec<Candidate>,
    used: &mut HashSet<String>,
    pool: impl IntoIterator<Item = Candidate>,
) {
    for candidate in pool {
        if selected.len() >= BRACKET_SIZE {
            break;
        }
        if used.insert(candidate.id.clone()) {
            selected.push(candidate);
        }
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
