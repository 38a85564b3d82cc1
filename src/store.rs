//! Persistence of the clone store.
//!
//! The store lives in a single pretty-printed JSON file. The collector
//! loads it leniently (a broken file means starting over), the
//! visualizer requires it to exist and parse.

use crate::models::Store;
use chrono::Local;
use std::fs::Permissions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while reading or writing the store file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{} not found. Run `clonetrack collect` first.", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Store {
    /// Load the store, falling back to an empty one when there is nothing
    /// usable to load.
    ///
    /// A missing file or content that is not a valid store yields a fresh
    /// store. Any other read failure is returned so a later save cannot
    /// replace a file that was never read.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match Self::open_existing(path) {
            Ok(store) => {
                info!(
                    "Loaded {} repositories from {}",
                    store.repositories.len(),
                    path.display()
                );
                Ok(store)
            }
            Err(StoreError::Missing(_)) => {
                debug!("No data file at {}, starting fresh", path.display());
                Ok(Self::default())
            }
            Err(e @ StoreError::Parse { .. }) => Ok(Self::fresh_after(e)),
            Err(StoreError::Read { source, .. }) if source.kind() == ErrorKind::InvalidData => {
                Ok(Self::fresh_after(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                }))
            }
            Err(e) => Err(e),
        }
    }

    fn fresh_after(error: StoreError) -> Self {
        warn!("{}; starting with an empty store", error);
        println!("⚠️  Warning: Could not parse existing data file, starting fresh");
        Self::default()
    }

    /// Load the store, failing if the file is absent or invalid.
    pub fn open_existing(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Stamp `last_updated` and write the whole store to `path`.
    ///
    /// The content goes to a temporary file in the same directory which then
    /// replaces the target, so readers never observe a half-written file.
    pub fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        self.last_updated = Some(Local::now().naive_local());

        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');

        let write_err = |source: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        if let Some(permissions) = target_permissions(path) {
            tmp.as_file().set_permissions(permissions).map_err(write_err)?;
        }
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

/// Permissions the saved file should end up with: those of the file being
/// replaced, or world-readable for a new one. Temp files start owner-only.
fn target_permissions(path: &Path) -> Option<Permissions> {
    match std::fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CloneObservation;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_load_missing_file_returns_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = Store::load(&dir.path().join("clone_data.json")).unwrap();
        assert_eq!(store, Store::default());
    }

    #[test]
    fn test_load_invalid_content_returns_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone_data.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = Store::load(&path).unwrap();
        assert!(store.repositories.is_empty());
        assert!(store.cumulative.is_empty());
        assert!(store.last_updated.is_none());
    }

    #[test]
    fn test_open_existing_reports_missing_and_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone_data.json");

        assert!(matches!(
            Store::open_existing(&path),
            Err(StoreError::Missing(_))
        ));

        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            Store::open_existing(&path),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_then_load_keeps_repositories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone_data.json");

        let mut store = Store::default();
        store.record_mut("a").merge_daily_clones(&[
            CloneObservation::new(date("2024-01-01"), 5, 3),
            CloneObservation::new(date("2024-01-02"), 3, 2),
        ]);
        store.save(&path).unwrap();

        assert!(store.last_updated.is_some());
        let loaded = Store::load(&path).unwrap();
        assert_eq!(loaded.repositories, store.repositories);
        assert_eq!(loaded.last_updated, store.last_updated);
    }

    #[test]
    fn test_save_creates_parent_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("clone_data.json");

        let mut first = Store::default();
        first
            .record_mut("old")
            .merge_daily_clones(&[CloneObservation::new(date("2024-01-01"), 1, 1)]);
        first.save(&path).unwrap();

        let mut second = Store::default();
        second.save(&path).unwrap();

        let loaded = Store::open_existing(&path).unwrap();
        assert!(loaded.repositories.is_empty());
    }

    #[test]
    fn test_save_writes_indented_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone_data.json");

        let mut store = Store::default();
        store.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n  \"repositories\""));
        assert!(content.contains("\"last_updated\""));
    }

    #[test]
    fn test_load_non_utf8_content_returns_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone_data.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let store = Store::load(&path).unwrap();
        assert_eq!(store, Store::default());
    }

    #[test]
    fn test_load_propagates_read_errors() {
        let dir = TempDir::new().unwrap();
        // A directory at the data path cannot be read as a file.
        let path = dir.path().join("clone_data.json");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(Store::load(&path), Err(StoreError::Read { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone_data.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        Store::default().save(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone_data.json");

        Store::default().save(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
