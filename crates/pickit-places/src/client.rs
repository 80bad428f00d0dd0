//! HTTP client for the Places web API.
//!
//! Speaks both API generations: the `v1` JSON API on `places.googleapis.com`
//! (POST with an `X-Goog-Api-Key` header and a field mask) and the legacy
//! JSON API on `maps.googleapis.com` (GET with a `key` query parameter and a
//! `status` envelope). [`PlacesApiShape`] picks which one searches go to.

use std::time::Duration;

use pickit_core::{AppConfig, Candidate, Coordinate, FoodCategory, PlacesApiShape};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::PlacesError;
use crate::photos::{dedupe, review_photos_first, rotate_first_to_end};
use crate::retry::retry_with_backoff;
use crate::types::{
    LegacyDetailsResponse, LegacyFindPlaceResponse, LegacyPlace, LegacySearchResponse, Place,
    PlacesResponse,
};

const PLACES_BASE_URL: &str = "https://places.googleapis.com/";
const MAPS_BASE_URL: &str = "https://maps.googleapis.com/";
const DEFAULT_USER_AGENT: &str = "pickit/0.1 (seoul-food-worldcup)";

const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.location,places.rating,\
places.userRatingCount,places.formattedAddress,places.photos,places.businessStatus";
const FIND_FIELD_MASK: &str = "places.id,places.displayName";
const DETAILS_FIELD_MASK: &str = "rating,userRatingCount,photos";

/// Photos attached to a search result.
const MAX_CANDIDATE_PHOTOS: usize = 5;

/// Radius of the circle an admin name lookup is biased towards.
const FIND_PLACE_BIAS_RADIUS_M: f64 = 300.0;

/// Rating assumed for a legacy text-search hit that has none.
const LEGACY_DEFAULT_RATING: f64 = 4.0;

/// First hit of a name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPlace {
    pub id: String,
    pub name: Option<String>,
}

/// Rating and photos of one place, photos already ordered for display and
/// de-duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetails {
    pub rating: f64,
    pub review_count: u32,
    pub photo_urls: Vec<String>,
}

/// Client for the Places web API.
///
/// Use [`PlacesClient::new`] or [`PlacesClient::from_config`] for production
/// or [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    shape: PlacesApiShape,
    places_base: Url,
    maps_base: Url,
    radius_m: u32,
    max_results: u32,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("shape", &self.shape)
            .field("places_base", &self.places_base.as_str())
            .field("maps_base", &self.maps_base.as_str())
            .field("radius_m", &self.radius_m)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production API hosts.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        shape: PlacesApiShape,
        timeout_secs: u64,
    ) -> Result<Self, PlacesError> {
        Self::build(
            api_key,
            shape,
            timeout_secs,
            DEFAULT_USER_AGENT,
            PLACES_BASE_URL,
            MAPS_BASE_URL,
        )
    }

    /// Creates a client that sends both API generations to `base_url`
    /// (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        shape: PlacesApiShape,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Self::build(
            api_key,
            shape,
            timeout_secs,
            DEFAULT_USER_AGENT,
            base_url,
            base_url,
        )
    }

    /// Builds a client from application config. Returns `Ok(None)` when no
    /// API key is configured, in which case callers use the fallback catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, PlacesError> {
        let Some(api_key) = config.places_api_key.as_deref() else {
            return Ok(None);
        };
        let client = Self::build(
            api_key,
            config.places_api_shape,
            config.request_timeout_secs,
            &config.user_agent,
            PLACES_BASE_URL,
            MAPS_BASE_URL,
        )?
        .with_search_radius(config.search_radius_m)
        .with_max_results(config.search_max_results)
        .with_retry_policy(config.max_retries, config.retry_backoff_base_ms);
        Ok(Some(client))
    }

    fn build(
        api_key: &str,
        shape: PlacesApiShape,
        timeout_secs: u64,
        user_agent: &str,
        places_base: &str,
        maps_base: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            shape,
            places_base: parse_base_url(places_base)?,
            maps_base: parse_base_url(maps_base)?,
            radius_m: 1000,
            max_results: 20,
            max_retries: 2,
            backoff_base_ms: 500,
        })
    }

    #[must_use]
    pub fn with_search_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn shape(&self) -> PlacesApiShape {
        self.shape
    }

    /// Nearby search for one cuisine through the `v1` API.
    ///
    /// Keeps only operational places that have a rating.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status,
    ///   after retries.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected
    ///   shape.
    pub async fn search_nearby(
        &self,
        origin: Coordinate,
        category: FoodCategory,
    ) -> Result<Vec<Candidate>, PlacesError> {
        let url = endpoint(&self.places_base, "v1/places:searchNearby")?;
        let body = json!({
            "includedTypes": category.included_types(),
            "maxResultCount": self.max_results,
            "languageCode": "ko",
            "locationRestriction": {
                "circle": {
                    "center": { "latitude": origin.lat, "longitude": origin.lng },
                    "radius": f64::from(self.radius_m),
                }
            }
        });
        let response: PlacesResponse = self.post_json(&url, SEARCH_FIELD_MASK, &body).await?;

        let candidates: Vec<Candidate> = response
            .places
            .into_iter()
            .filter_map(|place| self.candidate_from_place(place, category))
            .collect();
        tracing::debug!(
            category = category.key(),
            count = candidates.len(),
            "nearby search complete"
        );
        Ok(candidates)
    }

    /// Text search for one cuisine through the legacy API.
    ///
    /// A status other than `OK` yields an empty list; `OVER_QUERY_LIMIT` is
    /// retried first.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status,
    ///   after retries.
    /// - [`PlacesError::ApiError`] if the quota is still exhausted after
    ///   retries.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected
    ///   shape.
    pub async fn text_search(
        &self,
        origin: Coordinate,
        category: FoodCategory,
    ) -> Result<Vec<Candidate>, PlacesError> {
        let url = self.legacy_url(
            "maps/api/place/textsearch/json",
            &[
                ("query", category.search_query()),
                ("location", &format!("{},{}", origin.lat, origin.lng)),
                ("radius", &self.radius_m.to_string()),
                ("type", "restaurant"),
                ("language", "ko"),
            ],
        )?;
        let response: LegacySearchResponse = self.get_legacy(&url).await?;
        if response.status != "OK" {
            log_legacy_status(
                "textsearch",
                &response.status,
                response.error_message.as_deref(),
            );
            return Ok(Vec::new());
        }

        let max = usize::try_from(self.max_results).unwrap_or(usize::MAX);
        let candidates: Vec<Candidate> = response
            .results
            .into_iter()
            .filter_map(|place| self.candidate_from_legacy(place, category))
            .take(max)
            .collect();
        tracing::debug!(
            category = category.key(),
            count = candidates.len(),
            "text search complete"
        );
        Ok(candidates)
    }

    /// Public media URL for a photo reference.
    ///
    /// For the `v1` shape `photo_ref` is a photo resource name; for the legacy
    /// shape it is a `photo_reference` token. An empty reference has no URL.
    #[must_use]
    pub fn resolve_photo_url(&self, photo_ref: &str, shape: PlacesApiShape) -> Option<String> {
        if photo_ref.trim().is_empty() {
            return None;
        }
        let url = match shape {
            PlacesApiShape::Modern => {
                let mut url = self
                    .places_base
                    .join(&format!("v1/{}/media", photo_ref.trim_start_matches('/')))
                    .ok()?;
                url.query_pairs_mut()
                    .append_pair("maxHeightPx", "800")
                    .append_pair("key", &self.api_key);
                url
            }
            PlacesApiShape::Legacy => {
                let mut url = self.maps_base.join("maps/api/place/photo").ok()?;
                url.query_pairs_mut()
                    .append_pair("maxwidth", "800")
                    .append_pair("maxheight", "600")
                    .append_pair("photo_reference", photo_ref)
                    .append_pair("key", &self.api_key);
                url
            }
        };
        Some(url.into())
    }

    /// Look up a restaurant by name near `origin`, returning the first hit.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search_nearby`].
    pub async fn find_place(
        &self,
        name: &str,
        origin: Coordinate,
    ) -> Result<Option<FoundPlace>, PlacesError> {
        match self.shape {
            PlacesApiShape::Modern => {
                let url = endpoint(&self.places_base, "v1/places:searchText")?;
                let body = json!({
                    "textQuery": name,
                    "maxResultCount": 1,
                    "languageCode": "ko",
                    "locationBias": {
                        "circle": {
                            "center": { "latitude": origin.lat, "longitude": origin.lng },
                            "radius": FIND_PLACE_BIAS_RADIUS_M,
                        }
                    }
                });
                let response: PlacesResponse = self.post_json(&url, FIND_FIELD_MASK, &body).await?;
                Ok(response
                    .places
                    .into_iter()
                    .find(|p| !p.id.is_empty())
                    .map(|p| FoundPlace {
                        id: p.id,
                        name: p.display_name.map(|n| n.text),
                    }))
            }
            PlacesApiShape::Legacy => {
                let url = self.legacy_url(
                    "maps/api/place/findplacefromtext/json",
                    &[
                        ("input", name),
                        ("inputtype", "textquery"),
                        ("fields", "place_id,name"),
                        (
                            "locationbias",
                            &format!(
                                "circle:{FIND_PLACE_BIAS_RADIUS_M}@{},{}",
                                origin.lat, origin.lng
                            ),
                        ),
                    ],
                )?;
                let response: LegacyFindPlaceResponse = self.get_legacy(&url).await?;
                if response.status != "OK" {
                    log_legacy_status(
                        "findplacefromtext",
                        &response.status,
                        response.error_message.as_deref(),
                    );
                    return Ok(None);
                }
                Ok(response.candidates.into_iter().find_map(|p| {
                    p.place_id.map(|id| FoundPlace { id, name: p.name })
                }))
            }
        }
    }

    /// Rating, review count and ordered photo URLs for a place id.
    ///
    /// `v1` photos uploaded by reviewers come before editorial ones. The
    /// legacy API has no attribution data, so its first photo (usually the
    /// storefront) is moved to the end instead.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search_nearby`].
    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        match self.shape {
            PlacesApiShape::Modern => {
                let url = endpoint(&self.places_base, &format!("v1/places/{place_id}"))?;
                let place: Place = self.get_json(&url, DETAILS_FIELD_MASK).await?;
                let urls = review_photos_first(&place.photos)
                    .into_iter()
                    .filter_map(|p| self.resolve_photo_url(&p.name, PlacesApiShape::Modern))
                    .collect();
                Ok(Some(PlaceDetails {
                    rating: place.rating.unwrap_or(0.0),
                    review_count: place.user_rating_count.unwrap_or(0),
                    photo_urls: dedupe(urls),
                }))
            }
            PlacesApiShape::Legacy => {
                let url = self.legacy_url(
                    "maps/api/place/details/json",
                    &[
                        ("place_id", place_id),
                        ("fields", "rating,user_ratings_total,photos"),
                    ],
                )?;
                let response: LegacyDetailsResponse = self.get_legacy(&url).await?;
                let Some(place) = response.result.filter(|_| response.status == "OK") else {
                    log_legacy_status(
                        "details",
                        &response.status,
                        response.error_message.as_deref(),
                    );
                    return Ok(None);
                };
                let urls: Vec<String> = place
                    .photos
                    .iter()
                    .filter_map(|p| {
                        self.resolve_photo_url(&p.photo_reference, PlacesApiShape::Legacy)
                    })
                    .collect();
                Ok(Some(PlaceDetails {
                    rating: place.rating.unwrap_or(0.0),
                    review_count: place.user_ratings_total.unwrap_or(0),
                    photo_urls: dedupe(rotate_first_to_end(urls)),
                }))
            }
        }
    }

    fn candidate_from_place(&self, place: Place, category: FoodCategory) -> Option<Candidate> {
        if place.business_status.as_deref() != Some("OPERATIONAL") {
            return None;
        }
        let rating = place.rating?;
        let location = place.location?;
        let name = place.display_name.map(|n| n.text)?;

        let photo_urls: Vec<String> = place
            .photos
            .iter()
            .take(MAX_CANDIDATE_PHOTOS)
            .filter_map(|p| self.resolve_photo_url(&p.name, PlacesApiShape::Modern))
            .collect();

        Some(Candidate {
            id: place.id.clone(),
            place_id: Some(place.id),
            name,
            category,
            category_label: category.label().to_string(),
            rating,
            review_count: place.user_rating_count.unwrap_or(0),
            lat: location.latitude,
            lng: location.longitude,
            address: place.formatted_address.filter(|a| !a.is_empty()),
            photo_url: photo_urls.first().cloned(),
            photo_urls,
            score: 0.0,
        })
    }

    fn candidate_from_legacy(
        &self,
        place: LegacyPlace,
        category: FoodCategory,
    ) -> Option<Candidate> {
        let id = place.place_id?;
        let name = place.name?;
        let location = place.geometry?.location;

        let photo_urls: Vec<String> = place
            .photos
            .iter()
            .take(MAX_CANDIDATE_PHOTOS)
            .filter_map(|p| self.resolve_photo_url(&p.photo_reference, PlacesApiShape::Legacy))
            .collect();

        Some(Candidate {
            id: id.clone(),
            place_id: Some(id),
            name,
            category,
            category_label: category.label().to_string(),
            rating: place.rating.unwrap_or(LEGACY_DEFAULT_RATING),
            review_count: place.user_ratings_total.unwrap_or(0),
            lat: location.lat,
            lng: location.lng,
            address: place
                .formatted_address
                .or(place.vicinity)
                .filter(|a| !a.is_empty()),
            photo_url: photo_urls.first().cloned(),
            photo_urls,
            score: 0.0,
        })
    }

    /// Builds a legacy endpoint URL with percent-encoded query parameters,
    /// appending the API key last.
    fn legacy_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = endpoint(&self.maps_base, path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        field_mask: &str,
        body: &serde_json::Value,
    ) -> Result<T, PlacesError> {
        let text = retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .post(url.clone())
                .header("X-Goog-Api-Key", self.api_key.as_str())
                .header("X-Goog-FieldMask", field_mask)
                .json(body)
                .send()
                .await?
                .error_for_status()?;
            Ok(response.text().await?)
        })
        .await?;
        parse_body(&text, url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        field_mask: &str,
    ) -> Result<T, PlacesError> {
        let text = retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(url.clone())
                .header("X-Goog-Api-Key", self.api_key.as_str())
                .header("X-Goog-FieldMask", field_mask)
                .send()
                .await?
                .error_for_status()?;
            Ok(response.text().await?)
        })
        .await?;
        parse_body(&text, url)
    }

    /// Sends a legacy GET, retrying transport failures and `OVER_QUERY_LIMIT`.
    async fn get_legacy<T: DeserializeOwned>(&self, url: &Url) -> Result<T, PlacesError> {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?;
            let text = response.text().await?;
            let body: serde_json::Value = parse_body(&text, url)?;
            Self::check_quota(&body)?;
            Ok(body)
        })
        .await?;
        serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Surfaces `OVER_QUERY_LIMIT` as an error so the retry loop backs off.
    /// Other statuses are left for the caller to interpret.
    fn check_quota(body: &serde_json::Value) -> Result<(), PlacesError> {
        if body.get("status").and_then(serde_json::Value::as_str) == Some("OVER_QUERY_LIMIT") {
            let message = body
                .get("error_message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
            return Err(PlacesError::ApiError {
                status: "OVER_QUERY_LIMIT".to_string(),
                message,
            });
        }
        Ok(())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, PlacesError> {
    // Exactly one trailing slash, so `Url::join` appends instead of replacing
    // the last path segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

fn endpoint(base: &Url, path: &str) -> Result<Url, PlacesError> {
    base.join(path).map_err(|e| PlacesError::InvalidBaseUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

fn parse_body<T: DeserializeOwned>(text: &str, url: &Url) -> Result<T, PlacesError> {
    serde_json::from_str(text).map_err(|e| PlacesError::Deserialize {
        context: url.path().to_string(),
        source: e,
    })
}

fn log_legacy_status(operation: &str, status: &str, message: Option<&str>) {
    if status == "ZERO_RESULTS" {
        tracing::debug!(operation, "legacy Places API returned no results");
    } else {
        tracing::warn!(
            operation,
            status,
            message = message.unwrap_or_default(),
            "legacy Places API returned a non-OK status"
        );
    }
}
