pub mod paths;
pub mod saved;

pub use paths::LimnerPaths;
pub use saved::{SavedSession, SessionStore};

use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data dir.
pub const HOME_ENV: &str = "LIMNER_HOME";

/// Return the per-user data root.
///
/// `$LIMNER_HOME` when set, else `<platform data dir>/limner`
/// (falls back to `~/.limner`, then `./.limner`).
pub fn store_root() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("limner")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".limner")
    } else {
        PathBuf::from(".limner")
    }
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// File-based exclusive lock guard.
pub struct LockGuard {
    _file: fs::File,
}

/// Try to take an exclusive lock without blocking.
/// Fails if another process holds it.
pub fn try_lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open lock file {}: {}", path.display(), e))?;
    file.try_lock_exclusive()
        .map_err(|_| anyhow::anyhow!("{} is locked by another process", path.display()))?;
    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_root_is_not_empty() {
        let root = store_root();
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn write_atomic_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("test.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn write_atomic_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn second_lock_fails_while_held() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join("play.lock");
        let guard = try_lock_file(&lock_path).unwrap();
        assert!(lock_path.exists());
        assert!(try_lock_file(&lock_path).is_err());
        drop(guard);
        assert!(try_lock_file(&lock_path).is_ok());
    }
}
