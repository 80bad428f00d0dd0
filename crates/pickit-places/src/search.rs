//! Per-cuisine search fan-out feeding the eight-entrant selector.

use std::future::Future;

use futures::future::join_all;
use pickit_core::{
    select_eight, Candidate, CategoryResults, Coordinate, FallbackSource, FoodCategory,
    ImageOverrides, PlacesApiShape,
};

use crate::client::PlacesClient;
use crate::error::PlacesError;

/// Anything that can list restaurants of one cuisine around a point.
pub trait CategorySearch {
    fn search_category(
        &self,
        origin: Coordinate,
        category: FoodCategory,
    ) -> impl Future<Output = Result<Vec<Candidate>, PlacesError>> + Send;
}

impl CategorySearch for PlacesClient {
    async fn search_category(
        &self,
        origin: Coordinate,
        category: FoodCategory,
    ) -> Result<Vec<Candidate>, PlacesError> {
        match self.shape() {
            PlacesApiShape::Modern => self.search_nearby(origin, category).await,
            PlacesApiShape::Legacy => self.text_search(origin, category).await,
        }
    }
}

/// Search every cuisine concurrently. A cuisine whose search fails is logged
/// and left empty so the others still count.
pub async fn search_all_categories<S: CategorySearch>(
    search: &S,
    origin: Coordinate,
) -> CategoryResults {
    let results = join_all(
        FoodCategory::ALL
            .into_iter()
            .map(|category| search.search_category(origin, category)),
    )
    .await;

    FoodCategory::ALL
        .into_iter()
        .zip(results)
        .map(|(category, result)| {
            let candidates = result.unwrap_or_else(|e| {
                tracing::warn!(
                    category = category.key(),
                    error = %e,
                    "category search failed, treating as empty"
                );
                Vec::new()
            });
            (category, candidates)
        })
        .collect()
}

/// Eight bracket entrants for `origin`.
///
/// Without a search backend (no API key configured) the fallback catalog
/// supplies them directly.
pub async fn fetch_restaurants<S: CategorySearch>(
    search: Option<&S>,
    fallback: &dyn FallbackSource,
    overrides: &ImageOverrides,
    origin: Coordinate,
) -> Vec<Candidate> {
    let Some(search) = search else {
        tracing::info!(%origin, "no Places API key configured, using fallback catalog");
        return select_eight(CategoryResults::new(), fallback, origin, overrides);
    };
    let results = search_all_categories(search, origin).await;
    let found: usize = results.values().map(Vec::len).sum();
    tracing::info!(%origin, found, "category searches complete");
    select_eight(results, fallback, origin, overrides)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct StubSearch {
        failing: Option<FoodCategory>,
        per_category: usize,
    }

    impl CategorySearch for StubSearch {
        async fn search_category(
            &self,
            origin: Coordinate,
            category: FoodCategory,
        ) -> Result<Vec<Candidate>, PlacesError> {
            if self.failing == Some(category) {
                return Err(PlacesError::ApiError {
                    status: "REQUEST_DENIED".to_string(),
                    message: None,
                });
            }
            Ok((0..self.per_category)
                .map(|i| candidate(&format!("{}_{i}", category.key()), category, origin))
                .collect())
        }
    }

    struct StubFallback;

    impl FallbackSource for StubFallback {
        fn fallback_candidates(&self, origin: Coordinate) -> Vec<Candidate> {
            (0..8)
                .map(|i| candidate(&format!("fb_{i}"), FoodCategory::Korean, origin))
                .collect()
        }
    }

    fn candidate(id: &str, category: FoodCategory, origin: Coordinate) -> Candidate {
        Candidate {
            id: id.to_string(),
            place_id: Some(id.to_string()),
            name: id.to_string(),
            category,
            category_label: category.label().to_string(),
            rating: 4.2,
            review_count: 300,
            lat: origin.lat,
            lng: origin.lng,
            address: None,
            photo_url: None,
            photo_urls: vec![],
            score: 0.0,
        }
    }

    fn origin() -> Coordinate {
        Coordinate::new(37.5665, 126.978)
    }

    #[tokio::test]
    async fn failed_category_is_empty_not_fatal() {
        let search = StubSearch {
            failing: Some(FoodCategory::Japanese),
            per_category: 3,
        };
        let results = search_all_categories(&search, origin()).await;
        assert_eq!(results.len(), 4);
        assert!(results[&FoodCategory::Japanese].is_empty());
        assert_eq!(results[&FoodCategory::Korean].len(), 3);
    }

    #[tokio::test]
    async fn fetch_without_search_uses_fallback() {
        let picked = fetch_restaurants::<StubSearch>(
            None,
            &StubFallback,
            &ImageOverrides::new(),
            origin(),
        )
        .await;
        assert_eq!(picked.len(), 8);
        assert!(picked.iter().all(|c| c.id.starts_with("fb_")));
    }

    #[tokio::test]
    async fn fetch_balances_live_results() {
        let search = StubSearch {
            failing: None,
            per_category: 5,
        };
        let picked = fetch_restaurants(
            Some(&search),
            &StubFallback,
            &ImageOverrides::new(),
            origin(),
        )
        .await;
        assert_eq!(picked.len(), 8);
        let categories: HashSet<FoodCategory> = picked.iter().map(|c| c.category).collect();
        assert_eq!(categories.len(), 4);
        assert!(picked.iter().all(|c| !c.id.starts_with("fb_")));
    }

    #[tokio::test]
    async fn fetch_tops_up_when_a_category_fails() {
        let search = StubSearch {
            failing: Some(FoodCategory::Western),
            per_category: 1,
        };
        let picked = fetch_restaurants(
            Some(&search),
            &StubFallback,
            &ImageOverrides::new(),
            origin(),
        )
        .await;
        assert_eq!(picked.len(), 8);
        assert_eq!(picked.iter().filter(|c| c.id.starts_with("fb_")).count(), 5);
    }
}
