//! Catalog import: the boundary where loosely shaped enrichment output
//! becomes typed [`ArtistProfile`] / [`PuzzleRecord`] rows.
//!
//! Input is a single JSON document:
//!
//! ```json
//! { "artists": [{ "name": "Claude Monet", "birth_year": 1840, ... }],
//!   "puzzles": [{ "date": "2024-06-15", "title": "...", "artist": "...", ... }] }
//! ```
//!
//! Numbers may arrive as strings and blanks as `""`; both are tolerated.
//! Rows that cannot be made valid are skipped and reported, never imported
//! half-formed.

use std::path::Path;

use limner_core::date::{is_plausible_year, parse_date_key, today_utc};
use limner_core::{ArtistProfile, PuzzleRecord};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::sqlite_store::{write_artist, write_puzzle, SqliteCatalog};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("`{field}` is not a valid year: {value}")]
    BadYear { field: &'static str, value: String },
    #[error("popularity_score {0} is outside 0..=100")]
    ScoreOutOfRange(f64),
    #[error("`{0}` is not a YYYY-MM-DD date")]
    BadDate(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub artists: Vec<RawArtist>,
    #[serde(default)]
    pub puzzles: Vec<RawPuzzle>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub movement: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub birth_year: Option<Value>,
    #[serde(default)]
    pub death_year: Option<Value>,
    #[serde(default)]
    pub popularity_score: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPuzzle {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub museum: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub cached_image_url: Option<String>,
    #[serde(default)]
    pub wiki_summary_url: Option<String>,
    #[serde(default)]
    pub wiki_artist_summary_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub artists: usize,
    pub puzzles: usize,
    /// `(row description, reason)` for every skipped row.
    pub skipped: Vec<(String, RecordError)>,
}

impl TryFrom<RawArtist> for ArtistProfile {
    type Error = RecordError;

    fn try_from(raw: RawArtist) -> Result<Self, Self::Error> {
        let name = clean(raw.name).ok_or(RecordError::MissingField("name"))?;
        let popularity_score = match number(raw.popularity_score.as_ref()) {
            Some(s) if !(0.0..=100.0).contains(&s) => return Err(RecordError::ScoreOutOfRange(s)),
            other => other,
        };
        Ok(ArtistProfile {
            name,
            movement: clean(raw.movement),
            country: clean(raw.country),
            birth_year: year(raw.birth_year.as_ref(), "birth_year")?,
            death_year: year(raw.death_year.as_ref(), "death_year")?,
            popularity_score,
        })
    }
}

impl TryFrom<RawPuzzle> for PuzzleRecord {
    type Error = RecordError;

    fn try_from(raw: RawPuzzle) -> Result<Self, Self::Error> {
        let date_raw = clean(raw.date).ok_or(RecordError::MissingField("date"))?;
        let date = parse_date_key(&date_raw)
            .map(limner_core::date::format_date_key)
            .ok_or(RecordError::BadDate(date_raw))?;
        Ok(PuzzleRecord {
            date,
            title: clean(raw.title).ok_or(RecordError::MissingField("title"))?,
            artist: clean(raw.artist).ok_or(RecordError::MissingField("artist"))?,
            year: raw.year.as_ref().and_then(text),
            museum: clean(raw.museum),
            image_url: clean(raw.image_url),
            cached_image_url: clean(raw.cached_image_url),
            wiki_summary_url: clean(raw.wiki_summary_url),
            wiki_artist_summary_url: clean(raw.wiki_artist_summary_url),
        })
    }
}

/// Read `path` and upsert every valid row in one transaction.
pub fn import_catalog(catalog: &SqliteCatalog, path: &Path) -> anyhow::Result<ImportReport> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
    let file: CatalogFile = serde_json::from_str(&content)?;
    import_file(catalog, file)
}

pub fn import_file(catalog: &SqliteCatalog, file: CatalogFile) -> anyhow::Result<ImportReport> {
    let mut report = ImportReport::default();
    let tx = catalog.transaction()?;

    for (i, raw) in file.artists.into_iter().enumerate() {
        let label = raw
            .name
            .clone()
            .unwrap_or_else(|| format!("artists[{i}]"));
        match ArtistProfile::try_from(raw) {
            Ok(artist) => {
                write_artist(&tx, &artist)?;
                report.artists += 1;
            }
            Err(e) => {
                tracing::warn!(row = %label, error = %e, "skipping artist");
                report.skipped.push((label, e));
            }
        }
    }

    for (i, raw) in file.puzzles.into_iter().enumerate() {
        let label = raw
            .date
            .clone()
            .unwrap_or_else(|| format!("puzzles[{i}]"));
        match PuzzleRecord::try_from(raw) {
            Ok(puzzle) => {
                write_puzzle(&tx, &puzzle)?;
                report.puzzles += 1;
            }
            Err(e) => {
                tracing::warn!(row = %label, error = %e, "skipping puzzle");
                report.skipped.push((label, e));
            }
        }
    }

    tx.commit()?;
    tracing::info!(
        artists = report.artists,
        puzzles = report.puzzles,
        skipped = report.skipped.len(),
        "catalog import finished"
    );
    Ok(report)
}

fn clean(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => clean(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn year(v: Option<&Value>, field: &'static str) -> Result<Option<i32>, RecordError> {
    let Some(v) = v else { return Ok(None) };
    let parsed = match v {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    match parsed {
        Some(y) if is_plausible_year(y, today_utc()) => Ok(Some(y)),
        _ => Err(RecordError::BadYear {
            field,
            value: match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }),
    }
}
