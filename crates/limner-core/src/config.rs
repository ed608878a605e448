use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default attempt budget per puzzle.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Lifespan assumed when a guessed artist has a birth year but no death year.
/// A heuristic ceiling, not a fact about any painter.
pub const ASSUMED_MAX_ARTIST_AGE: i32 = 85;

/// Popularity delta (0-100 scale) still considered "similar fame".
pub const FAME_SIMILARITY_THRESHOLD: f64 = 7.0;

/// Zoom factor shown before any guess.
pub const MAX_ZOOM: f64 = 4.8;

/// Exponent applied to remaining reveal progress; below 1.0 keeps early
/// attempts tight and opens up the image faster near the end.
pub const REVEAL_EASING_EXPONENT: f64 = 0.6;

pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 3_000;

/// Every tunable the game rules depend on.
///
/// Stored as `config.json` in the data dir; absent keys take the defaults
/// above, unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub max_attempts: u32,
    pub assumed_max_artist_age: i32,
    pub fame_similarity_threshold: f64,
    pub max_zoom: f64,
    pub reveal_easing_exponent: f64,
    pub lookup_timeout_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            assumed_max_artist_age: ASSUMED_MAX_ARTIST_AGE,
            fame_similarity_threshold: FAME_SIMILARITY_THRESHOLD,
            max_zoom: MAX_ZOOM,
            reveal_easing_exponent: REVEAL_EASING_EXPONENT,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
        }
    }
}

impl GameConfig {
    /// Read config from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_attempts == 0 {
            anyhow::bail!("max_attempts must be at least 1");
        }
        if self.assumed_max_artist_age <= 0 {
            anyhow::bail!("assumed_max_artist_age must be positive");
        }
        if !(self.fame_similarity_threshold >= 0.0) {
            anyhow::bail!("fame_similarity_threshold must be >= 0");
        }
        if !(self.max_zoom >= 1.0) {
            anyhow::bail!("max_zoom must be >= 1.0");
        }
        if !(self.reveal_easing_exponent > 0.0) {
            anyhow::bail!("reveal_easing_exponent must be > 0");
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}
