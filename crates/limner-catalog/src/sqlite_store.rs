//! SQLite-backed reference catalog.
//!
//! One `catalog.db` file in WAL mode holding the artist profiles and the
//! daily puzzle records. The interactive game only reads it; `limner import`
//! is the only writer.

use std::path::Path;
use std::sync::{Arc, Mutex};

use limner_core::date::{is_plausible_year, today_utc};
use limner_core::normalize::normalize_name;
use limner_core::{ArtistLookup, ArtistProfile, PuzzleRecord};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SCHEMA_SQL: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS artists (
    name TEXT PRIMARY KEY,
    name_key TEXT UNIQUE NOT NULL,
    movement TEXT,
    country TEXT,
    birth_year INTEGER,
    death_year INTEGER,
    popularity_score REAL
);

CREATE INDEX IF NOT EXISTS idx_artists_popularity ON artists(popularity_score DESC);

CREATE TABLE IF NOT EXISTS puzzles (
    date TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    artist TEXT NOT NULL,
    year TEXT,
    museum TEXT,
    image_url TEXT,
    cached_image_url TEXT,
    wiki_summary_url TEXT,
    wiki_artist_summary_url TEXT
);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

const SCHEMA_VERSION: u32 = 1;

const ARTIST_COLUMNS: &str =
    "name, movement, country, birth_year, death_year, popularity_score";

const PUZZLE_COLUMNS: &str = "date, title, artist, year, museum, image_url, cached_image_url,
     wiki_summary_url, wiki_artist_summary_url";

/// SQLite-backed catalog.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open an existing catalog.db.
    pub fn open(db_path: &Path) -> anyhow::Result<Self> {
        if !db_path.is_file() {
            anyhow::bail!(
                "no catalog at {} (run `limner import <file>` first)",
                db_path.display()
            );
        }
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.apply_pragmas()?;
        Ok(store)
    }

    /// Open or create catalog.db with full schema.
    pub fn open_or_create(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.apply_pragmas()?;
        store.apply_schema()?;
        Ok(store)
    }

    /// Fresh in-memory catalog (tests, throwaway servers).
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.apply_schema()?;
        Ok(store)
    }

    fn apply_pragmas(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    fn apply_schema(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;
        Ok(())
    }

    pub fn schema_version(&self) -> anyhow::Result<u32> {
        let version: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    // ── Artists ─────────────────────────────────────────────────────

    pub fn upsert_artist(&self, artist: &ArtistProfile) -> anyhow::Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_artist(&tx, artist)?;
        tx.commit()?;
        Ok(())
    }

    /// Exact (normalized) name match, else the most popular artist whose
    /// name contains the query.
    pub fn find_artist(&self, name: &str) -> anyhow::Result<Option<ArtistProfile>> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Ok(None);
        }
        let exact = self
            .conn
            .query_row(
                &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE name_key = ?1"),
                params![key],
                row_to_artist,
            )
            .optional()?;
        if exact.is_some() {
            return Ok(exact);
        }

        let pattern = format!("%{}%", escape_like(&key));
        let fuzzy = self
            .conn
            .query_row(
                &format!(
                    "SELECT {ARTIST_COLUMNS} FROM artists
                     WHERE name_key LIKE ?1 ESCAPE '\\'
                     ORDER BY popularity_score IS NULL, popularity_score DESC, name
                     LIMIT 1"
                ),
                params![pattern],
                row_to_artist,
            )
            .optional()?;
        Ok(fuzzy)
    }

    /// Display names, most popular first.
    pub fn artist_names(&self, limit: usize) -> anyhow::Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM artists
             ORDER BY popularity_score IS NULL, popularity_score DESC, name
             LIMIT ?1",
        )?;
        let names = stmt
            .query_map(params![limit as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    pub fn artist_count(&self) -> anyhow::Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM artists", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    // ── Puzzles ─────────────────────────────────────────────────────

    pub fn upsert_puzzle(&self, puzzle: &PuzzleRecord) -> anyhow::Result<()> {
        write_puzzle(&self.conn, puzzle)
    }

    pub fn get_puzzle(&self, date: &str) -> anyhow::Result<Option<PuzzleRecord>> {
        let puzzle = self
            .conn
            .query_row(
                &format!("SELECT {PUZZLE_COLUMNS} FROM puzzles WHERE date = ?1"),
                params![date],
                row_to_puzzle,
            )
            .optional()?;
        Ok(puzzle)
    }

    /// Puzzle dates on or before `until`, newest first.
    pub fn puzzle_dates_until(&self, until: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM puzzles WHERE date <= ?1 ORDER BY date DESC LIMIT ?2",
        )?;
        let dates = stmt
            .query_map(params![until, limit as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(dates)
    }

    pub fn puzzle_count(&self) -> anyhow::Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM puzzles", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub(crate) fn transaction(&self) -> anyhow::Result<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

// ── Writers ─────────────────────────────────────────────────────────

/// Insert or replace one artist. Runs inside the caller's transaction.
pub(crate) fn write_artist(conn: &Connection, artist: &ArtistProfile) -> anyhow::Result<()> {
    let key = normalize_name(&artist.name);
    if key.is_empty() {
        anyhow::bail!("artist name is empty");
    }
    // A re-import may change the display spelling of an existing key.
    conn.execute(
        "DELETE FROM artists WHERE name_key = ?1 AND name <> ?2",
        params![key, artist.name],
    )?;
    conn.execute(
        "INSERT INTO artists (name, name_key, movement, country, birth_year, death_year, popularity_score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(name) DO UPDATE SET
            name_key = excluded.name_key,
            movement = excluded.movement,
            country = excluded.country,
            birth_year = excluded.birth_year,
            death_year = excluded.death_year,
            popularity_score = excluded.popularity_score",
        params![
            artist.name,
            key,
            artist.movement,
            artist.country,
            artist.birth_year,
            artist.death_year,
            artist.popularity_score,
        ],
    )?;
    Ok(())
}

pub(crate) fn write_puzzle(conn: &Connection, puzzle: &PuzzleRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO puzzles (
            date, title, artist, year, museum, image_url, cached_image_url,
            wiki_summary_url, wiki_artist_summary_url
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            puzzle.date,
            puzzle.title,
            puzzle.artist,
            puzzle.year,
            puzzle.museum,
            puzzle.image_url,
            puzzle.cached_image_url,
            puzzle.wiki_summary_url,
            puzzle.wiki_artist_summary_url,
        ],
    )?;
    Ok(())
}

/// [`ArtistLookup`] over a shared catalog connection.
///
/// Queries run on the blocking pool so a busy database never stalls the
/// async runtime and the caller's lookup timeout can still fire.
pub struct CatalogLookup {
    catalog: Arc<Mutex<SqliteCatalog>>,
}

impl CatalogLookup {
    pub fn new(catalog: SqliteCatalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Run `f` against the wrapped catalog.
    pub fn with_catalog<T>(
        &self,
        f: impl FnOnce(&SqliteCatalog) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let catalog = self
            .catalog
            .lock()
            .map_err(|_| anyhow::anyhow!("catalog lock poisoned"))?;
        f(&catalog)
    }
}

#[async_trait::async_trait]
impl ArtistLookup for CatalogLookup {
    async fn get_profile(&self, name: &str) -> anyhow::Result<Option<ArtistProfile>> {
        let catalog = Arc::clone(&self.catalog);
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let catalog = catalog
                .lock()
                .map_err(|_| anyhow::anyhow!("catalog lock poisoned"))?;
            catalog.find_artist(&name)
        })
        .await?
    }
}

// ── Row decoding ────────────────────────────────────────────────────

fn row_to_artist(row: &Row<'_>) -> rusqlite::Result<ArtistProfile> {
    Ok(ArtistProfile {
        name: row.get(0)?,
        movement: opt_text(row, 1)?,
        country: opt_text(row, 2)?,
        birth_year: opt_year(row, 3)?,
        death_year: opt_year(row, 4)?,
        popularity_score: opt_score(row, 5)?,
    })
}

fn row_to_puzzle(row: &Row<'_>) -> rusqlite::Result<PuzzleRecord> {
    Ok(PuzzleRecord {
        date: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        year: opt_text(row, 3)?,
        museum: opt_text(row, 4)?,
        image_url: opt_text(row, 5)?,
        cached_image_url: opt_text(row, 6)?,
        wiki_summary_url: opt_text(row, 7)?,
        wiki_artist_summary_url: opt_text(row, 8)?,
    })
}

/// SQLite columns are loosely typed; coerce what we can and drop the rest
/// instead of failing the whole row.
fn opt_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(t) => {
            let s = String::from_utf8_lossy(t).trim().to_string();
            (!s.is_empty()).then_some(s)
        }
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

/// Years outside the plausible range are dropped like any other bad value.
fn opt_year(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i32>> {
    let year = match row.get_ref(idx)? {
        ValueRef::Integer(i) => i32::try_from(i).ok(),
        ValueRef::Real(f) if f.is_finite() => i32::try_from(f.trunc() as i64).ok(),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<i32>().ok()),
        _ => None,
    };
    Ok(year.filter(|y| is_plausible_year(*y, today_utc())))
}

fn opt_score(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    let score = match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok()),
        _ => None,
    };
    Ok(score.filter(|s| s.is_finite() && (0.0..=100.0).contains(s)))
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
