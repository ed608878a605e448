use std::path::{Path, PathBuf};

/// All well-known paths under the data dir.
#[derive(Debug, Clone)]
pub struct LimnerPaths {
    pub root: PathBuf,
    pub catalog_db: PathBuf,
    pub config_json: PathBuf,
    pub sessions_dir: PathBuf,
    pub locks_dir: PathBuf,
}

impl LimnerPaths {
    /// Derive all paths from a data dir. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            catalog_db: root.join("catalog.db"),
            config_json: root.join("config.json"),
            sessions_dir: root.join("sessions"),
            locks_dir: root.join("locks"),
            root,
        }
    }

    /// Paths under `--data-dir` if given, else [`crate::store_root`].
    pub fn resolve(data_dir: Option<&Path>) -> Self {
        match data_dir {
            Some(dir) => Self::discover(dir),
            None => Self::discover(crate::store_root()),
        }
    }

    /// Create all required directories. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        for dir in [&self.root, &self.sessions_dir, &self.locks_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog_db.is_file()
    }

    /// Saved session for one puzzle, `sessions/<puzzle_id>.json`.
    pub fn session_file(&self, puzzle_id: &str) -> PathBuf {
        self.sessions_dir.join(format!("{}.json", sanitize(puzzle_id)))
    }

    /// Lock held while a terminal client plays `puzzle_id`.
    pub fn play_lock(&self, puzzle_id: &str) -> PathBuf {
        self.locks_dir.join(format!("{}.lock", sanitize(puzzle_id)))
    }
}

/// Keep puzzle ids usable as file names.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_builds_correct_paths() {
        let p = LimnerPaths::discover("/tmp/limner");
        assert_eq!(p.catalog_db, PathBuf::from("/tmp/limner/catalog.db"));
        assert_eq!(p.config_json, PathBuf::from("/tmp/limner/config.json"));
        assert_eq!(
            p.session_file("2024-06-15"),
            PathBuf::from("/tmp/limner/sessions/2024-06-15.json")
        );
        assert_eq!(
            p.play_lock("2024-06-15"),
            PathBuf::from("/tmp/limner/locks/2024-06-15.lock")
        );
    }

    #[test]
    fn puzzle_id_cannot_escape_sessions_dir() {
        let p = LimnerPaths::discover("/tmp/limner");
        assert_eq!(
            p.session_file("../../etc/passwd"),
            PathBuf::from("/tmp/limner/sessions/______etc_passwd.json")
        );
    }

    #[test]
    fn ensure_layout_creates_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let p = LimnerPaths::discover(tmp.path().join("data"));
        assert!(!p.is_initialized());
        p.ensure_layout().unwrap();
        assert!(p.sessions_dir.is_dir());
        assert!(p.locks_dir.is_dir());
    }
}
