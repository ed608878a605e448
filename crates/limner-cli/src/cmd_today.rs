use limner_catalog::SqliteCatalog;
use limner_core::date::today_date_key;
use limner_core::{GameConfig, GameError};
use limner_store::{LimnerPaths, SessionStore};

/// `limner today`: the public view of today's puzzle plus local progress.
pub fn execute(paths: &LimnerPaths) -> anyhow::Result<()> {
    let config = GameConfig::load(&paths.config_json)?;
    let catalog = SqliteCatalog::open(&paths.catalog_db)?;
    let date = today_date_key();
    let puzzle = catalog
        .get_puzzle(&date)?
        .ok_or_else(|| GameError::PuzzleNotFound(date.clone()))?;

    println!("Puzzle {}", puzzle.date);
    if let Some(image) = puzzle.display_image() {
        println!("  image:  {image}");
    }
    if let Some(museum) = &puzzle.museum {
        println!("  museum: {museum}");
    }
    if let Some(year) = &puzzle.year {
        println!("  year:   {year}");
    }

    match SessionStore::new(paths.clone()).load_or_discard(&date) {
        Some(saved) => {
            let state = saved.to_state();
            if state.finished {
                let verdict = if state.success { "solved" } else { "not solved" };
                println!("  status: {verdict} in {} attempts", state.attempts_used);
            } else {
                println!(
                    "  status: in progress, {} of {} attempts left",
                    state.attempts_left(),
                    state.max_attempts
                );
            }
        }
        None => println!("  status: not started, {} attempts", config.max_attempts),
    }
    Ok(())
}
