use crate::app_config::{AppConfig, Environment, PlacesApiShape};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so tests can drive it from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PICKIT_ENV", "development"))?;
    let log_level = or_default("PICKIT_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default("PICKIT_CATALOG_PATH", "./config/catalog.yaml"));
    let state_dir = PathBuf::from(or_default("PICKIT_STATE_DIR", "./.pickit"));

    let places_api_key = lookup("PICKIT_PLACES_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let places_api_shape = parse_api_shape(&or_default("PICKIT_PLACES_API_SHAPE", "modern"))?;

    let search_radius_m = parse_u32("PICKIT_SEARCH_RADIUS_M", "1000")?;
    if search_radius_m == 0 {
        return Err(invalid("PICKIT_SEARCH_RADIUS_M", "must be positive".to_string()));
    }
    let search_max_results = parse_u32("PICKIT_SEARCH_MAX_RESULTS", "20")?;
    if !(1..=20).contains(&search_max_results) {
        return Err(invalid(
            "PICKIT_SEARCH_MAX_RESULTS",
            format!("must be between 1 and 20, got {search_max_results}"),
        ));
    }

    let request_timeout_secs = parse_u64("PICKIT_REQUEST_TIMEOUT_SECS", "8")?;
    let max_retries = parse_u32("PICKIT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("PICKIT_RETRY_BACKOFF_BASE_MS", "500")?;
    let user_agent = or_default("PICKIT_USER_AGENT", "pickit/0.1 (seoul-food-worldcup)");

    Ok(AppConfig {
        env,
        log_level,
        catalog_path,
        state_dir,
        places_api_key,
        places_api_shape,
        search_radius_m,
        search_max_results,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        user_agent,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PICKIT_ENV".to_string(),
            reason: format!(
                "unknown environment {other:?}; expected development, test, or production"
            ),
        }),
    }
}

fn parse_api_shape(s: &str) -> Result<PlacesApiShape, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "modern" | "new" | "v1" => Ok(PlacesApiShape::Modern),
        "legacy" => Ok(PlacesApiShape::Legacy),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PICKIT_PLACES_API_SHAPE".to_string(),
            reason: format!("unknown API shape {other:?}; expected modern or legacy"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
