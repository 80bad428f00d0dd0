use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn assert_invalid(map: &HashMap<&str, &str>, expected_var: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PICKIT_ENV"));
}

#[test]
fn parse_api_shape_accepts_aliases() {
    assert_eq!(parse_api_shape("modern").unwrap(), PlacesApiShape::Modern);
    assert_eq!(parse_api_shape("V1").unwrap(), PlacesApiShape::Modern);
    assert_eq!(parse_api_shape("Legacy").unwrap(), PlacesApiShape::Legacy);
    assert!(parse_api_shape("soap").is_err());
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.catalog_path, Path::new("./config/catalog.yaml"));
    assert_eq!(cfg.state_dir, Path::new("./.pickit"));
    assert!(cfg.places_api_key.is_none());
    assert_eq!(cfg.places_api_shape, PlacesApiShape::Modern);
    assert_eq!(cfg.search_radius_m, 1000);
    assert_eq!(cfg.search_max_results, 20);
    assert_eq!(cfg.request_timeout_secs, 8);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.user_agent, "pickit/0.1 (seoul-food-worldcup)");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("PICKIT_ENV", "production");
    map.insert("PICKIT_STATE_DIR", "/var/lib/pickit");
    map.insert("PICKIT_PLACES_API_KEY", "test-key");
    map.insert("PICKIT_PLACES_API_SHAPE", "legacy");
    map.insert("PICKIT_SEARCH_RADIUS_M", "1500");
    map.insert("PICKIT_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.places_api_key.as_deref(), Some("test-key"));
    assert_eq!(cfg.places_api_shape, PlacesApiShape::Legacy);
    assert_eq!(cfg.search_radius_m, 1500);
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(
        cfg.image_overrides_path(),
        Path::new("/var/lib/pickit/images.json")
    );
    assert_eq!(
        cfg.curated_edits_path(),
        Path::new("/var/lib/pickit/curated.json")
    );
}

#[test]
fn blank_api_key_counts_as_missing() {
    let mut map = HashMap::new();
    map.insert("PICKIT_PLACES_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.places_api_key.is_none());
}

#[test]
fn invalid_numbers_are_rejected() {
    for var in [
        "PICKIT_SEARCH_RADIUS_M",
        "PICKIT_SEARCH_MAX_RESULTS",
        "PICKIT_REQUEST_TIMEOUT_SECS",
        "PICKIT_MAX_RETRIES",
        "PICKIT_RETRY_BACKOFF_BASE_MS",
    ] {
        let mut map = HashMap::new();
        map.insert(var, "not-a-number");
        assert_invalid(&map, var);
    }
}

#[test]
fn zero_radius_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PICKIT_SEARCH_RADIUS_M", "0");
    assert_invalid(&map, "PICKIT_SEARCH_RADIUS_M");
}

#[test]
fn max_results_above_api_limit_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PICKIT_SEARCH_MAX_RESULTS", "21");
    assert_invalid(&map, "PICKIT_SEARCH_MAX_RESULTS");
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("PICKIT_PLACES_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("[redacted]"));
}
