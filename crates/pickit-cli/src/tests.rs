use std::io::Cursor;
use std::path::Path;

use pickit_core::{
    AppConfig, Bracket, Candidate, Catalog, Coordinate, Environment, FoodCategory, ImageOverrides,
    PlacesApiShape,
};

use super::*;
use crate::admin::{CuratedCommands, ImagesCommands};
use crate::location::Location;
use crate::play::play_bracket;

fn candidate(id: &str, score: f64) -> Candidate {
    Candidate {
        id: id.to_string(),
        place_id: None,
        name: format!("식당 {id}"),
        category: FoodCategory::Korean,
        category_label: "한식".to_string(),
        rating: 4.0,
        review_count: 50,
        lat: 37.48,
        lng: 126.95,
        address: None,
        photo_url: None,
        photo_urls: vec![],
        score,
    }
}

fn seeded_bracket() -> Bracket {
    let seeds = ["A", "B", "C", "D", "E", "F", "G", "H"]
        .iter()
        .zip(1_u32..)
        .map(|(id, n)| candidate(id, f64::from(n)))
        .collect();
    Bracket::from_seeds(seeds).expect("eight unique seeds")
}

fn test_config(state_dir: &Path) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        catalog_path: state_dir.join("catalog.yaml"),
        state_dir: state_dir.to_path_buf(),
        places_api_key: None,
        places_api_shape: PlacesApiShape::Modern,
        search_radius_m: 1000,
        search_max_results: 20,
        request_timeout_secs: 8,
        max_retries: 0,
        retry_backoff_base_ms: 1,
        user_agent: "pickit-test".to_string(),
    }
}

fn empty_catalog() -> Catalog {
    Catalog {
        version: 1,
        stock_photos: vec![],
        fallback: vec![],
        areas: vec![],
    }
}

#[test]
fn parses_select_with_coordinates() {
    let cli = Cli::try_parse_from(["pickit", "select", "--lat", "37.48", "--lng", "126.95"])
        .expect("expected valid cli args");

    let Some(Commands::Select { location, json }) = cli.command else {
        panic!("expected select command");
    };
    assert!(!json);
    assert_eq!(
        location.resolve().unwrap(),
        Location::Coordinates(Coordinate::new(37.48, 126.95))
    );
}

#[test]
fn parses_select_with_area_and_json() {
    let cli = Cli::try_parse_from(["pickit", "select", "--area", "snu", "--json"])
        .expect("expected valid cli args");

    let Some(Commands::Select { location, json }) = cli.command else {
        panic!("expected select command");
    };
    assert!(json);
    assert_eq!(location.resolve().unwrap(), Location::Area("snu".to_string()));
}

#[test]
fn area_conflicts_with_coordinates() {
    let result = Cli::try_parse_from([
        "pickit", "select", "--area", "snu", "--lat", "37.48", "--lng", "126.95",
    ]);
    assert!(result.is_err());
}

#[test]
fn lat_requires_lng() {
    let result = Cli::try_parse_from(["pickit", "play", "--lat", "37.48"]);
    assert!(result.is_err());
}

#[test]
fn missing_location_fails_to_resolve() {
    let cli = Cli::try_parse_from(["pickit", "select"]).expect("expected valid cli args");
    let Some(Commands::Select { location, .. }) = cli.command else {
        panic!("expected select command");
    };
    assert!(location.resolve().is_err());
}

#[test]
fn coordinates_outside_seoul_are_rejected() {
    let cli = Cli::try_parse_from(["pickit", "select", "--lat", "35.18", "--lng", "129.07"])
        .expect("expected valid cli args");
    let Some(Commands::Select { location, .. }) = cli.command else {
        panic!("expected select command");
    };
    let err = location.resolve().unwrap_err();
    assert!(err.to_string().contains("outside Seoul"));
}

#[test]
fn parses_play_auto() {
    let cli = Cli::try_parse_from(["pickit", "play", "--area", "konkuk", "--auto"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Play { auto: true, .. })));
}

#[test]
fn parses_areas_command() {
    let cli = Cli::try_parse_from(["pickit", "areas"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Areas)));
}

#[test]
fn parses_admin_images_set() {
    let cli = Cli::try_parse_from([
        "pickit",
        "admin",
        "images",
        "set",
        "snu_k01",
        "https://img/1.jpg",
        "https://img/2.jpg",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Admin {
        command:
            AdminCommands::Images {
                command: ImagesCommands::Set { id, urls },
            },
    }) = cli.command
    else {
        panic!("expected admin images set");
    };
    assert_eq!(id, "snu_k01");
    assert_eq!(urls, vec!["https://img/1.jpg", "https://img/2.jpg"]);
}

#[test]
fn admin_images_set_requires_a_url() {
    let result = Cli::try_parse_from(["pickit", "admin", "images", "set", "snu_k01"]);
    assert!(result.is_err());
}

#[test]
fn parses_admin_curated_export_with_out() {
    let cli = Cli::try_parse_from(["pickit", "admin", "curated", "export", "--out", "dump.json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Admin {
            command: AdminCommands::Curated {
                command: CuratedCommands::Export { out: Some(_) }
            }
        })
    ));
}

#[test]
fn parses_admin_photos_refresh() {
    let cli = Cli::try_parse_from([
        "pickit", "admin", "photos", "--name", "샤로수길 국밥", "--lat", "37.48", "--lng",
        "126.95", "--refresh",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Admin {
            command: AdminCommands::Photos { refresh: true, .. }
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["pickit"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn auto_play_crowns_the_highest_score() {
    let mut out = Vec::new();
    let finished = play_bracket(seeded_bracket(), true, &mut Cursor::new(""), &mut out)
        .unwrap()
        .expect("auto play never quits");

    assert_eq!(finished.champion().unwrap().id, "H");
    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("[8강] match 1/7"));
    assert!(transcript.contains("[결승] match 7/7"));
}

#[test]
fn always_picking_left_crowns_the_first_seed() {
    let mut out = Vec::new();
    let input = "1\n".repeat(7);
    let finished = play_bracket(seeded_bracket(), false, &mut Cursor::new(input), &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(finished.champion().unwrap().id, "A");
}

#[test]
fn invalid_answers_reprompt() {
    let mut out = Vec::new();
    let input = format!("x\n\n3\n{}", "2\n".repeat(7));
    let finished = play_bracket(seeded_bracket(), false, &mut Cursor::new(input), &mut out)
        .unwrap()
        .unwrap();

    // B beats A, D beats C, ...; then D over B, H over F; then H.
    assert_eq!(finished.champion().unwrap().id, "H");
    let transcript = String::from_utf8(out).unwrap();
    assert_eq!(transcript.matches("please answer 1 or 2").count(), 3);
}

#[test]
fn quitting_returns_none() {
    let mut out = Vec::new();
    let result = play_bracket(seeded_bracket(), false, &mut Cursor::new("1\nq\n"), &mut out)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn closed_input_is_an_error() {
    let mut out = Vec::new();
    let result = play_bracket(seeded_bracket(), false, &mut Cursor::new("1\n1\n"), &mut out);
    assert!(result.is_err());
}

#[tokio::test]
async fn admin_images_set_then_clear() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let catalog = empty_catalog();

    let set = AdminCommands::Images {
        command: ImagesCommands::Set {
            id: "snu_k01".to_string(),
            urls: vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()],
        },
    };
    admin::run_admin(&config, &catalog, set).await.unwrap();

    let stored = ImageOverrides::load(&config.image_overrides_path()).unwrap();
    let image = stored.get("snu_k01").expect("override stored");
    assert_eq!(image.photo_url.as_deref(), Some("https://img/1.jpg"));
    assert_eq!(image.photo_urls.len(), 2);

    let clear = AdminCommands::Images {
        command: ImagesCommands::Clear {
            id: "snu_k01".to_string(),
        },
    };
    admin::run_admin(&config, &catalog, clear).await.unwrap();
    assert!(ImageOverrides::load(&config.image_overrides_path())
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn curated_refresh_without_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let command = AdminCommands::Curated {
        command: CuratedCommands::Refresh {
            area: "snu".to_string(),
            id: "snu_k01".to_string(),
        },
    };

    let err = admin::run_admin(&config, &empty_catalog(), command)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("PICKIT_PLACES_API_KEY"));
}

#[tokio::test]
async fn unknown_area_selection_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let result =
        play::select_candidates(&config, &empty_catalog(), &Location::Area("nowhere".into())).await;
    assert!(result.is_err());
}
