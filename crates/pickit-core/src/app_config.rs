use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which generation of the Places web API to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacesApiShape {
    /// `places.googleapis.com/v1` (nearby search, photo media by name).
    Modern,
    /// `maps.googleapis.com/maps/api/place` (text search, photo references).
    Legacy,
}

impl std::fmt::Display for PlacesApiShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacesApiShape::Modern => write!(f, "modern"),
            PlacesApiShape::Legacy => write!(f, "legacy"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub state_dir: PathBuf,
    /// Without a key live search is unavailable and every lookup uses the
    /// fallback catalog.
    pub places_api_key: Option<String>,
    pub places_api_shape: PlacesApiShape,
    pub search_radius_m: u32,
    pub search_max_results: u32,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub user_agent: String,
}

impl AppConfig {
    #[must_use]
    pub fn image_overrides_path(&self) -> PathBuf {
        self.state_dir.join("images.json")
    }

    #[must_use]
    pub fn curated_edits_path(&self) -> PathBuf {
        self.state_dir.join("curated.json")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("state_dir", &self.state_dir)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_api_shape", &self.places_api_shape)
            .field("search_radius_m", &self.search_radius_m)
            .field("search_max_results", &self.search_max_results)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
