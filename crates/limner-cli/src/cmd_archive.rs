use limner_catalog::SqliteCatalog;
use limner_core::date::today_date_key;
use limner_store::{LimnerPaths, SessionStore};

/// `limner archive`: playable dates up to today, newest first.
pub fn execute(paths: &LimnerPaths, limit: usize) -> anyhow::Result<()> {
    let catalog = SqliteCatalog::open(&paths.catalog_db)?;
    let dates = catalog.puzzle_dates_until(&today_date_key(), limit)?;
    if dates.is_empty() {
        println!("(no puzzles yet)");
        return Ok(());
    }
    let sessions = SessionStore::new(paths.clone());
    for date in dates {
        let mark = match sessions.load_or_discard(&date).map(|s| s.to_state()) {
            Some(state) if state.finished && state.success => "solved",
            Some(state) if state.finished => "missed",
            Some(_) => "started",
            None => "",
        };
        println!("{date}  {mark}");
    }
    Ok(())
}
