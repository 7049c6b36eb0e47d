//! Snapshot storage backends

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, TimerError},
    state::Snapshot,
};

/// Load, save and clear the persisted session snapshot
pub trait SnapshotStore: Send {
    /// `Ok(None)` when nothing is stored
    fn load(&self) -> Result<Option<Snapshot>>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Load a snapshot, treating any failure as "nothing stored"
pub fn load_or_default(store: &dyn SnapshotStore) -> Option<Snapshot> {
    match store.load() {
        Ok(Some(snapshot)) if !snapshot.is_empty() => Some(snapshot),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring unreadable snapshot: {}", e);
            None
        }
    }
}

/// Default location of the snapshot file
pub fn default_state_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("standup-timer")
        .join("session.json")
}

/// Snapshot stored as a JSON object in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        info!("Loaded snapshot from {}", self.path.display());
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target then rename, so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&tmp, &self.path)?;

        info!("Saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared snapshot at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TimerError::Io(e)),
        }
    }
}

/// Snapshot kept in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .map_err(|_| TimerError::StatePoisoned)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut stored = self.snapshot.lock().map_err(|_| TimerError::StatePoisoned)?;
        *stored = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut stored = self.snapshot.lock().map_err(|_| TimerError::StatePoisoned)?;
        *stored = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Snapshot {
        Snapshot {
            remaining_individual_seconds: Some(44),
            remaining_meeting_seconds: Some(410),
            starting_individual_seconds: Some(150),
            completed_participants: Some(1),
            total_participants: Some(4),
            saved_at: None,
        }
        .stamped()
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("session.json"));

        let snapshot = sample();
        store.save(&snapshot).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Some(snapshot));

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(TimerError::Snapshot(_))));
        assert_eq!(load_or_default(&store), None);
    }

    #[test]
    fn test_empty_object_counts_as_nothing_stored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(load_or_default(&JsonFileStore::new(&path)), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(&sample()).unwrap();
        assert_eq!(load_or_default(&store).unwrap().total_participants, Some(4));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
