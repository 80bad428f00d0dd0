//! Places API response types, for both the `v1` and the legacy JSON shapes.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// v1 (places.googleapis.com)
// ---------------------------------------------------------------------------

/// Body of `places:searchNearby` and `places:searchText`. An empty result is
/// returned as `{}`.
#[derive(Debug, Default, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Absent when the field mask does not ask for it (place details).
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<u32>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub business_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Resource name, `places/{place}/photos/{photo}`.
    pub name: String,
    #[serde(default)]
    pub author_attributions: Vec<AuthorAttribution>,
}

impl Photo {
    /// Photos uploaded by reviewers link back to a contributor profile.
    #[must_use]
    pub fn is_review_photo(&self) -> bool {
        self.author_attributions
            .iter()
            .any(|a| a.uri.as_deref().is_some_and(|u| u.contains("maps/contrib")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

// ---------------------------------------------------------------------------
// legacy (maps.googleapis.com/maps/api/place)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LegacySearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<LegacyPlace>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyFindPlaceResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub candidates: Vec<LegacyPlace>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<LegacyPlace>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<LegacyGeometry>,
    #[serde(default)]
    pub photos: Vec<LegacyPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyGeometry {
    pub location: LegacyLatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LegacyLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct LegacyPhoto {
    pub photo_reference: String,
}
