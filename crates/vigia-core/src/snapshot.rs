//! Snapshot persistence — the repository seam for [`MonitorState`].
//!
//! One snapshot, replaced wholesale on every save. Loading applies two
//! gates: the payload must parse, and its `version` must equal
//! [`SCHEMA_VERSION`]; anything else behaves exactly like having no
//! snapshot at all. Callers treat persistence as best-effort — a failed
//! read or write is logged and never interrupts rendering or fetching.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::state::{MonitorState, SCHEMA_VERSION};

/// File name of the persisted snapshot.
pub const SNAPSHOT_FILE: &str = "monitor_state.json";

/// Storage seam for the persisted dashboard snapshot.
///
/// `Ok(None)` from `load` means "start from defaults": the snapshot is
/// absent, unparsable, or version-rejected. `Err` is reserved for the
/// store itself misbehaving (unreadable file, full disk); callers log it
/// and continue as if `Ok(None)` / no-op.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<MonitorState>, CoreError>;
    fn save(&self, state: &MonitorState) -> Result<(), CoreError>;
}

/// Parse and version-gate a raw snapshot payload.
fn decode(raw: &str) -> Option<MonitorState> {
    let state: MonitorState = match serde_json::from_str(raw) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "discarding unparsable snapshot");
            return None;
        }
    };
    if state.version != SCHEMA_VERSION {
        warn!(
            found = state.version,
            expected = SCHEMA_VERSION,
            "discarding snapshot with mismatched schema version"
        );
        return None;
    }
    Some(state)
}

/// JSON-file-backed snapshot store.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<MonitorState>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::Io(e)),
        };
        Ok(decode(&raw))
    }

    fn save(&self, state: &MonitorState) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec(state)?;
        std::fs::write(&self.path, payload)?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}

/// In-memory snapshot store, the test fake for the repository seam.
///
/// Holds the serialized payload (not the struct) so version gating and
/// defaults-merge take the same path as the file store.
#[derive(Default)]
pub struct MemorySnapshotStore {
    slot: std::sync::Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been saved.
    pub fn is_empty(&self) -> bool {
        self.slot.lock().expect("snapshot slot poisoned").is_none()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<MonitorState>, CoreError> {
        let slot = self.slot.lock().expect("snapshot slot poisoned");
        Ok(slot.as_deref().and_then(decode))
    }

    fn save(&self, state: &MonitorState) -> Result<(), CoreError> {
        let raw = serde_json::to_string(state)?;
        *self.slot.lock().expect("snapshot slot poisoned") = Some(raw);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::StatusRecord;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join(SNAPSHOT_FILE));

        let mut state = MonitorState::default();
        state.record_status(
            "A",
            StatusRecord {
                status: "UP".into(),
                checked_at: Some("2024-01-01 00:00:00".into()),
            },
        );
        state.last_updated = Some(Utc::now());
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.status_of("A").unwrap().status, "UP");
        assert_eq!(loaded.last_updated, state.last_updated);
    }

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested/dir").join(SNAPSHOT_FILE));
        store.save(&MonitorState::default()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn garbage_payload_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileSnapshotStore::new(path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn version_mismatch_behaves_like_no_snapshot() {
        let store = MemorySnapshotStore::new();
        let mut state = MonitorState::default();
        state.version = SCHEMA_VERSION - 1;
        state.detail_anchor = "#should-not-survive".into();
        store.save(&state).unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn untagged_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        // A pre-versioning snapshot: parsable, but carries no tag.
        std::fs::write(&path, r##"{"detail_anchor":"#x"}"##).unwrap();
        let store = FileSnapshotStore::new(path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySnapshotStore::new();
        assert!(store.is_empty());
        assert!(store.load().unwrap().is_none());

        store.save(&MonitorState::default()).unwrap();
        assert!(!store.is_empty());
        assert!(store.load().unwrap().is_some());
    }
}
