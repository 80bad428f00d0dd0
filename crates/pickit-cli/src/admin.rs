//! Curation command handlers: image overrides, curated area edits and
//! Places photo lookup.

use std::path::PathBuf;

use clap::Subcommand;
use pickit_core::{AppConfig, Catalog, Coordinate, CuratedStore, ImageOverride, ImageOverrides};
use pickit_places::{PhotoPool, PlacesClient};

/// Sub-commands available under `admin`.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Manage per-restaurant photo overrides
    Images {
        #[command(subcommand)]
        command: ImagesCommands,
    },
    /// Manage edits to the curated areas
    Curated {
        #[command(subcommand)]
        command: CuratedCommands,
    },
    /// Look up photos for a restaurant through the Places API
    Photos {
        /// Restaurant name as it appears on the map
        #[arg(long)]
        name: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        /// Show a second, different set after the first
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ImagesCommands {
    /// Set photos for a restaurant; the first URL becomes the main photo
    Set {
        id: String,
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Remove the photo override for a restaurant
    Clear { id: String },
}

#[derive(Debug, Subcommand)]
pub enum CuratedCommands {
    /// Print every curated area with edits applied, as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Remove a restaurant from a curated area
    Remove { area: String, id: String },
    /// Refresh rating, review count and photos of a curated restaurant
    Refresh { area: String, id: String },
}

/// # Errors
///
/// Returns an error if a state file cannot be read or written, or a Places
/// request fails.
pub(crate) async fn run_admin(
    config: &AppConfig,
    catalog: &Catalog,
    command: AdminCommands,
) -> anyhow::Result<()> {
    match command {
        AdminCommands::Images { command } => run_images(config, command),
        AdminCommands::Curated { command } => run_curated(config, catalog, command).await,
        AdminCommands::Photos {
            name,
            lat,
            lng,
            refresh,
        } => run_photos(config, catalog, &name, Coordinate::new(lat, lng), refresh).await,
    }
}

fn run_images(config: &AppConfig, command: ImagesCommands) -> anyhow::Result<()> {
    let path = config.image_overrides_path();
    let mut overrides = ImageOverrides::load(&path)?;
    match command {
        ImagesCommands::Set { id, urls } => {
            let image = ImageOverride {
                photo_url: urls.first().cloned(),
                photo_urls: urls,
            };
            overrides.set(id.clone(), image);
            overrides.save(&path)?;
            println!("photos set for {id} ({} overrides total)", overrides.len());
        }
        ImagesCommands::Clear { id } => {
            if overrides.remove(&id).is_some() {
                overrides.save(&path)?;
                println!("override for {id} removed");
            } else {
                println!("no override for {id}");
            }
        }
    }
    Ok(())
}

async fn run_curated(
    config: &AppConfig,
    catalog: &Catalog,
    command: CuratedCommands,
) -> anyhow::Result<()> {
    let store = CuratedStore::new(config.curated_edits_path());
    match command {
        CuratedCommands::Export { out } => {
            let json = serde_json::to_string_pretty(&store.export(catalog)?)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        CuratedCommands::Remove { area, id } => {
            if store.remove(catalog, &area, &id)? {
                println!("removed {id} from {area}");
            } else {
                println!("{id} is not in {area}");
            }
        }
        CuratedCommands::Refresh { area, id } => {
            let client = require_client(config)?;
            let mut restaurant = store
                .restaurants(catalog, &area)?
                .into_iter()
                .find(|r| r.id == id)
                .ok_or_else(|| anyhow::anyhow!("restaurant '{id}' not found in area '{area}'"))?;

            let origin = Coordinate::new(restaurant.lat, restaurant.lng);
            let Some(data) = client.fetch_restaurant_data(&restaurant.name, origin).await? else {
                println!("no Places match for {}", restaurant.name);
                return Ok(());
            };
            restaurant.rating = data.rating;
            restaurant.review_count = data.review_count;
            if !data.photo_urls.is_empty() {
                restaurant.photo_url = data.photo_url;
                restaurant.photo_urls = data.photo_urls;
            }
            println!(
                "{}: ★{} · {} reviews · {} photos",
                restaurant.name,
                restaurant.rating,
                restaurant.review_count,
                restaurant.photo_urls.len()
            );
            store.upsert(catalog, &area, restaurant)?;
        }
    }
    Ok(())
}

async fn run_photos(
    config: &AppConfig,
    catalog: &Catalog,
    name: &str,
    origin: Coordinate,
    refresh: bool,
) -> anyhow::Result<()> {
    let client = require_client(config)?;
    let pool = client.fetch_photos(name, origin).await?;
    if pool.full.is_empty() {
        println!("no photos found for {name}");
    } else {
        print_pool(&pool);
    }
    if refresh {
        println!();
        let refreshed = client
            .refresh_photos(name, origin, &pool, &catalog.stock_photos)
            .await;
        print_pool(&refreshed);
    }
    Ok(())
}

fn print_pool(pool: &PhotoPool) {
    println!("showing {} of {} photos", pool.display.len(), pool.full.len());
    for url in &pool.display {
        println!("{url}");
    }
}

fn require_client(config: &AppConfig) -> anyhow::Result<PlacesClient> {
    PlacesClient::from_config(config)?
        .ok_or_else(|| anyhow::anyhow!("PICKIT_PLACES_API_KEY is not set"))
}
