use std::path::Path;

use limner_catalog::{import_catalog, SqliteCatalog};
use limner_store::LimnerPaths;

/// `limner import <file>`
pub fn execute(paths: &LimnerPaths, file: &Path) -> anyhow::Result<()> {
    paths.ensure_layout()?;
    let catalog = SqliteCatalog::open_or_create(&paths.catalog_db)?;
    let report = import_catalog(&catalog, file)?;

    println!(
        "Imported {} artists, {} puzzles into {}",
        report.artists,
        report.puzzles,
        paths.catalog_db.display()
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} rows:", report.skipped.len());
        for (row, reason) in &report.skipped {
            println!("  {row}: {reason}");
        }
    }
    println!(
        "Catalog now holds {} artists, {} puzzles",
        catalog.artist_count()?,
        catalog.puzzle_count()?
    );
    Ok(())
}
