//! `select`, `play` and `areas` command handlers.

use std::io::{BufRead, Write};

use pickit_core::{
    curated_candidates, round_label, share_text, AppConfig, Bracket, Candidate, Catalog,
    CuratedStore, ImageOverrides, BRACKET_SIZE,
};
use pickit_places::{fetch_restaurants, PlacesClient};

use crate::location::Location;

/// Eight entrants for `location`: a shuffled draw from a curated area, or a
/// scored and balanced pick from live search (fallback catalog without a key).
///
/// # Errors
///
/// Returns an error if the area is unknown, the curated edits file is
/// unreadable, or the HTTP client cannot be built.
pub(crate) async fn select_candidates(
    config: &AppConfig,
    catalog: &Catalog,
    location: &Location,
) -> anyhow::Result<Vec<Candidate>> {
    let overrides = ImageOverrides::load_or_default(&config.image_overrides_path());
    match location {
        Location::Area(area_id) => {
            let store = CuratedStore::new(config.curated_edits_path());
            let restaurants = store.restaurants(catalog, area_id)?;
            Ok(curated_candidates(
                &restaurants,
                &overrides,
                &mut rand::rng(),
            ))
        }
        Location::Coordinates(origin) => {
            let client = PlacesClient::from_config(config)?;
            let fallback = catalog.fallback_catalog();
            Ok(fetch_restaurants(client.as_ref(), &fallback, &overrides, *origin).await)
        }
    }
}

/// # Errors
///
/// Returns an error if selection fails or the output cannot be serialized.
pub(crate) async fn run_select(
    config: &AppConfig,
    catalog: &Catalog,
    location: &Location,
    json: bool,
) -> anyhow::Result<()> {
    let selected = select_candidates(config, catalog, location).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("no restaurants found");
        return Ok(());
    }
    println!(
        "{:<4}{:<8}{:<8}{:<8}{:<9}NAME",
        "#", "CAT", "SCORE", "RATING", "REVIEWS"
    );
    for (i, c) in selected.iter().enumerate() {
        println!(
            "{:<4}{:<6}{:<8.3}{:<8.1}{:<9}{}",
            i + 1,
            c.category_label,
            c.score,
            c.rating,
            c.review_count,
            c.name
        );
    }
    if selected.len() < BRACKET_SIZE {
        println!(
            "only {} of {BRACKET_SIZE} slots filled; not enough for a bracket",
            selected.len()
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if selection yields fewer than eight restaurants, or on
/// terminal I/O failure.
pub(crate) async fn run_play(
    config: &AppConfig,
    catalog: &Catalog,
    location: &Location,
    auto: bool,
) -> anyhow::Result<()> {
    let selected = select_candidates(config, catalog, location).await?;
    if selected.len() < BRACKET_SIZE {
        anyhow::bail!(
            "only {} restaurants found, a bracket needs {BRACKET_SIZE}",
            selected.len()
        );
    }

    let bracket = Bracket::new(&selected)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let finished = play_bracket(bracket, auto, &mut stdin.lock(), &mut stdout.lock())?;

    match finished.as_ref().and_then(Bracket::champion) {
        Some(champion) => {
            tracing::info!(champion = %champion.id, "bracket finished");
            println!();
            println!("{}", share_text(champion));
        }
        None => println!("game abandoned"),
    }
    Ok(())
}

/// Drive `bracket` to completion, reading `1`/`2` choices from `input`.
///
/// With `auto` the higher-scored side wins (left on ties) and `input` is not
/// read. Returns `None` if the player quits with `q`.
///
/// # Errors
///
/// Returns an error if `input` closes before the final, or on write failure.
pub(crate) fn play_bracket<R: BufRead, W: Write>(
    mut bracket: Bracket,
    auto: bool,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<Option<Bracket>> {
    while let Some((left, right)) = bracket.current_pairing().cloned() {
        let progress = bracket.progress();
        writeln!(
            out,
            "\n[{}] match {}/{}",
            round_label(bracket.current_round()),
            progress.completed_matches + 1,
            progress.total_matches
        )?;
        writeln!(out, "  1) {}", describe(&left))?;
        writeln!(out, "  2) {}", describe(&right))?;

        let winner = if auto {
            if right.score > left.score {
                right
            } else {
                left
            }
        } else {
            match prompt(input, out)? {
                Choice::Left => left,
                Choice::Right => right,
                Choice::Quit => return Ok(None),
            }
        };
        writeln!(out, "  -> {}", winner.name)?;
        bracket = bracket.decide(&winner)?;
    }

    if let Some(champion) = bracket.champion() {
        writeln!(out, "\n🏆 {} {}", champion.emoji(), champion.name)?;
    }
    Ok(Some(bracket))
}

enum Choice {
    Left,
    Right,
    Quit,
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<Choice> {
    loop {
        write!(out, "pick 1 or 2 (q to quit): ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("input closed before the bracket finished");
        }
        match line.trim() {
            "1" => return Ok(Choice::Left),
            "2" => return Ok(Choice::Right),
            "q" | "Q" => return Ok(Choice::Quit),
            _ => writeln!(out, "please answer 1 or 2")?,
        }
    }
}

fn describe(c: &Candidate) -> String {
    format!(
        "{} {} ({}) ★{} · {} reviews",
        c.emoji(),
        c.name,
        c.category_label,
        c.rating,
        c.review_count
    )
}

/// # Errors
///
/// Returns an error if the curated edits file is unreadable.
pub(crate) fn run_areas(config: &AppConfig, catalog: &Catalog) -> anyhow::Result<()> {
    if catalog.areas.is_empty() {
        println!("no curated areas in {}", config.catalog_path.display());
        return Ok(());
    }
    let store = CuratedStore::new(config.curated_edits_path());
    println!("{:<10}{:<20}{:<20}RESTAURANTS", "ID", "LABEL", "CENTER");
    for area in &catalog.areas {
        let count = store.restaurants(catalog, &area.id)?.len();
        println!(
            "{:<10}{:<20}{:<20}{count}",
            area.id,
            area.label,
            format!("{:.4},{:.4}", area.lat, area.lng)
        );
    }
    Ok(())
}
