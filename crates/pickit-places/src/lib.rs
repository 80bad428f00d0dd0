//! Places API integration: live restaurant search by cuisine and the photo
//! lookups behind the admin editor.

pub mod client;
pub mod error;
pub mod photos;
pub(crate) mod retry;
pub mod search;
pub mod types;

pub use client::{FoundPlace, PlaceDetails, PlacesClient};
pub use error::PlacesError;
pub use photos::{pick_display, PhotoPool, RestaurantData, MAX_GALLERY_PHOTOS, POOL_SIZE};
pub use search::{fetch_restaurants, search_all_categories, CategorySearch};
