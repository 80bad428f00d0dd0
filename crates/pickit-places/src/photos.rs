//! Photo lookup for the admin restaurant editor.
//!
//! The editor shows [`POOL_SIZE`] photos at a time out of everything the
//! provider returned for a place, and can ask for a different set.

use std::collections::HashSet;

use pickit_core::{shuffle_with, Coordinate};
use rand::Rng;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::types::Photo;

/// Photos shown at once in the editor.
pub const POOL_SIZE: usize = 15;

/// Gallery length stored on a restaurant.
pub const MAX_GALLERY_PHOTOS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoPool {
    /// The photos currently on screen, at most [`POOL_SIZE`].
    pub display: Vec<String>,
    /// Every photo URL known for the place.
    pub full: Vec<String>,
}

impl PhotoPool {
    fn from_urls(urls: Vec<String>) -> Self {
        Self {
            display: urls.iter().take(POOL_SIZE).cloned().collect(),
            full: urls,
        }
    }
}

/// Fresh rating, review count and photos for one restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantData {
    pub rating: f64,
    pub review_count: u32,
    pub photo_url: Option<String>,
    pub photo_urls: Vec<String>,
}

impl PlacesClient {
    /// All photos of the place matching `name` near `origin`, review photos
    /// first. Empty when no place matches.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the lookup or details request fails.
    pub async fn fetch_photos(
        &self,
        name: &str,
        origin: Coordinate,
    ) -> Result<PhotoPool, PlacesError> {
        let Some(found) = self.find_place(name, origin).await? else {
            tracing::debug!(restaurant = name, %origin, "no place matched");
            return Ok(PhotoPool::default());
        };
        let urls = self
            .place_details(&found.id)
            .await?
            .map(|d| d.photo_urls)
            .unwrap_or_default();
        Ok(PhotoPool::from_urls(urls))
    }

    /// A different set of photos for the editor.
    ///
    /// A pool larger than [`POOL_SIZE`] is reshuffled locally. A smaller one
    /// is re-fetched first and merged, since the provider may return photos
    /// it did not return last time. A failed re-fetch keeps the existing pool.
    /// If the place still has no photos, a random set of `stock_photos` is
    /// displayed instead; `full` stays empty.
    pub async fn refresh_photos(
        &self,
        name: &str,
        origin: Coordinate,
        pool: &PhotoPool,
        stock_photos: &[String],
    ) -> PhotoPool {
        if pool.full.len() > POOL_SIZE {
            let display = pick_display(&pool.full, &pool.display, &mut rand::rng());
            return PhotoPool {
                display,
                full: pool.full.clone(),
            };
        }

        let mut full = pool.full.clone();
        match self.fetch_photos(name, origin).await {
            Ok(fetched) => {
                let mut seen: HashSet<String> = full.iter().cloned().collect();
                for url in fetched.full {
                    if seen.insert(url.clone()) {
                        full.push(url);
                    }
                }
            }
            Err(e) => tracing::warn!(restaurant = name, error = %e, "photo refresh fetch failed"),
        }

        let display = shuffled_display(&full, stock_photos, &mut rand::rng());
        PhotoPool { display, full }
    }

    /// Rating, review count and the first [`MAX_GALLERY_PHOTOS`] photos of
    /// the place matching `name`, in one lookup.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the lookup or details request fails.
    pub async fn fetch_restaurant_data(
        &self,
        name: &str,
        origin: Coordinate,
    ) -> Result<Option<RestaurantData>, PlacesError> {
        let Some(found) = self.find_place(name, origin).await? else {
            return Ok(None);
        };
        Ok(self.place_details(&found.id).await?.map(|details| {
            let photo_urls: Vec<String> = details
                .photo_urls
                .into_iter()
                .take(MAX_GALLERY_PHOTOS)
                .collect();
            RestaurantData {
                rating: details.rating,
                review_count: details.review_count,
                photo_url: photo_urls.first().cloned(),
                photo_urls,
            }
        }))
    }
}

/// A random [`POOL_SIZE`] slice of `full`, or of `stock` when `full` is empty.
fn shuffled_display<R: Rng + ?Sized>(
    full: &[String],
    stock: &[String],
    rng: &mut R,
) -> Vec<String> {
    let source = if full.is_empty() { stock } else { full };
    let mut display = shuffle_with(source, rng);
    display.truncate(POOL_SIZE);
    display
}

/// Pick [`POOL_SIZE`] photos for display, preferring ones not on screen now.
/// When too few unseen photos remain, draw from the whole pool.
pub fn pick_display<R: Rng + ?Sized>(
    pool: &[String],
    current: &[String],
    rng: &mut R,
) -> Vec<String> {
    let on_screen: HashSet<&str> = current.iter().map(String::as_str).collect();
    let unseen: Vec<String> = pool
        .iter()
        .filter(|url| !on_screen.contains(url.as_str()))
        .cloned()
        .collect();
    let source = if unseen.len() >= POOL_SIZE {
        unseen
    } else {
        pool.to_vec()
    };
    shuffle_with(&source, rng)
        .into_iter()
        .take(POOL_SIZE)
        .collect()
}

/// Reviewer uploads first, then editorial photos, each group in API order.
pub(crate) fn review_photos_first(photos: &[Photo]) -> Vec<&Photo> {
    let (review, editorial): (Vec<&Photo>, Vec<&Photo>) =
        photos.iter().partition(|p| p.is_review_photo());
    review.into_iter().chain(editorial).collect()
}

/// Move the first element to the end. The legacy API's first photo is
/// usually the storefront.
pub(crate) fn rotate_first_to_end<T>(mut items: Vec<T>) -> Vec<T> {
    if items.len() > 1 {
        items.rotate_left(1);
    }
    items
}

/// Drop repeated URLs, keeping first occurrences in order.
pub(crate) fn dedupe(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
