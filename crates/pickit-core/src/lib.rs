//! Restaurant selection and bracket resolution for the Seoul food World Cup.
//!
//! The crate is pure: it scores and balances search results into eight
//! entrants, seeds a single-elimination bracket and drives it to a champion.
//! Network search lives in `pickit-places`; this crate only consumes resolved
//! results through the [`FallbackSource`] seam and plain data.

pub mod app_config;
pub mod bracket;
pub mod catalog;
pub mod category;
pub mod config;
pub mod curated;
pub mod error;
pub mod fallback;
pub mod geo;
pub mod overrides;
pub mod scoring;
pub mod selection;
pub mod share;
pub mod shuffle;

mod candidate;

pub use app_config::{AppConfig, Environment, PlacesApiShape};
pub use bracket::{round_label, Bracket, BracketStatus, Pairing, Progress, TOTAL_MATCHES};
pub use candidate::{Candidate, CategoryResults};
pub use catalog::{load_catalog, Catalog, CuratedArea, CuratedRestaurant, FallbackRestaurant};
pub use category::FoodCategory;
pub use config::{load_app_config, load_app_config_from_env};
pub use curated::{curated_candidates, CuratedExport, CuratedStore};
pub use error::{BracketError, ConfigError, StoreError};
pub use fallback::FallbackCatalog;
pub use geo::{is_within_seoul, Coordinate, SEOUL_BOUNDS};
pub use overrides::{ImageOverride, ImageOverrides};
pub use scoring::{bayesian_score, global_mean, PRIOR_WEIGHT};
pub use selection::{select_eight, FallbackSource, BRACKET_SIZE, PER_CATEGORY_QUOTA};
pub use share::share_text;
pub use shuffle::{shuffle, shuffle_with};
