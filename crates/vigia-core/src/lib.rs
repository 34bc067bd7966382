//! State, persistence, scheduling, and the refresh cycle for the vigia
//! dashboard.
//!
//! This crate owns everything between `vigia-api` and the UI:
//!
//! - **[`MonitorState`]** — the single state object: servers grouped by
//!   name, the status cache, summary counters, downtime chart data, and
//!   the refresh bookkeeping (`next_refresh_at` / `last_updated`). Mutated
//!   in place by every fetch cycle, serialized after every mutation.
//!
//! - **[`SnapshotStore`]** — repository seam for the versioned on-disk
//!   snapshot. [`FileSnapshotStore`] persists JSON under the platform
//!   cache dir; [`MemorySnapshotStore`] is the in-memory test fake. A
//!   snapshot whose `version` differs from [`SCHEMA_VERSION`] is rejected
//!   wholesale — never partially migrated.
//!
//! - **[`schedule`]** — the refresh [`Phase`] machine plus the pure
//!   countdown math the UI ticks against every second.
//!
//! - **[`Monitor`]** — central facade. [`run()`](Monitor::run) restores
//!   the snapshot, resumes or starts the refresh cadence, executes fetch
//!   cycles (list → concurrent per-system checks → summary → reschedule),
//!   and publishes immutable `Arc<MonitorState>` snapshots over `watch`
//!   channels for reactive rendering.

pub mod error;
pub mod model;
pub mod monitor;
pub mod schedule;
pub mod snapshot;
pub mod state;

pub use error::CoreError;
pub use model::{
    DowntimeEntry, ERROR_STATUS, FALLBACK_CLASS, StatusKind, StatusRecord, SummaryCounts, System,
    card_class, safe_id, status_class,
};
pub use monitor::{Monitor, MonitorConfig};
pub use schedule::{COUNTDOWN_PLACEHOLDER, Phase, REFRESH_INTERVAL};
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SNAPSHOT_FILE, SnapshotStore};
pub use state::{DEFAULT_DETAIL_ANCHOR, MonitorState, SCHEMA_VERSION};
