//! The single dashboard state object.
//!
//! Created at startup (from the persisted snapshot or defaults), mutated
//! in place by every fetch cycle, and serialized after every mutation.
//! Every field carries a serde default so a sparse snapshot merges onto
//! defaults instead of failing — except `version`, which defaults to an
//! invalid tag so that untagged snapshots are rejected wholesale.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vigia_api::{DashboardSummary, ServerMap};

use crate::model::{DowntimeEntry, StatusRecord, SummaryCounts, System};

/// Schema tag written into every snapshot. Bumped whenever the snapshot
/// layout changes; mismatched snapshots are discarded, never migrated.
pub const SCHEMA_VERSION: u32 = 2;

/// Link target the detail link falls back to.
pub const DEFAULT_DETAIL_ANCHOR: &str = "#main-container";

fn missing_version() -> u32 {
    0
}

/// Everything the dashboard renders from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorState {
    /// Snapshot schema tag; see [`SCHEMA_VERSION`].
    #[serde(default = "missing_version")]
    pub version: u32,
    /// Server name → ordered systems, in backend order.
    pub servers: IndexMap<String, Vec<System>>,
    /// System name → last known status. Never evicted within a session;
    /// a system dropped from a later list keeps its stale record.
    pub statuses: HashMap<String, StatusRecord>,
    /// Aggregate counters from the dashboard summary.
    pub counts: SummaryCounts,
    /// Downtime chart bars, in backend order.
    pub chart_data: Vec<DowntimeEntry>,
    /// Detail-link anchor.
    pub detail_anchor: String,
    /// Absolute instant of the next scheduled refresh; `None` means none
    /// is armed (fresh session, or the last cycle failed).
    pub next_refresh_at: Option<DateTime<Utc>>,
    /// Instant the last successful cycle completed.
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            servers: IndexMap::new(),
            statuses: HashMap::new(),
            counts: SummaryCounts::default(),
            chart_data: Vec::new(),
            detail_anchor: DEFAULT_DETAIL_ANCHOR.to_owned(),
            next_refresh_at: None,
            last_updated: None,
        }
    }
}

impl MonitorState {
    /// Replace the server map with a freshly fetched one and seed the
    /// status cache from any inline statuses it carries.
    ///
    /// This gives every card an immediate "last known" rendering before
    /// the live per-system checks land. Systems without an inline status
    /// leave the cache untouched.
    pub fn ingest_servers(&mut self, servers: ServerMap) {
        let mut mapped = IndexMap::with_capacity(servers.len());
        for (server, entries) in servers {
            let mut systems = Vec::with_capacity(entries.len());
            for entry in entries {
                if let Some(status) = entry.status.clone() {
                    self.statuses.insert(
                        entry.name.clone(),
                        StatusRecord {
                            status,
                            checked_at: entry.checked_at.clone(),
                        },
                    );
                }
                systems.push(System::from(entry));
            }
            mapped.insert(server, systems);
        }
        self.servers = mapped;
    }

    /// Overwrite the record for one system. Used after each live check;
    /// the later write always wins.
    pub fn record_status(&mut self, name: impl Into<String>, record: StatusRecord) {
        self.statuses.insert(name.into(), record);
    }

    /// Cached record for a system, if any.
    pub fn status_of(&self, name: &str) -> Option<&StatusRecord> {
        self.statuses.get(name)
    }

    /// Merge a dashboard summary: absent counts keep their prior values,
    /// an absent chart clears, an absent anchor resets to the default.
    pub fn apply_summary(&mut self, summary: DashboardSummary) {
        if let Some(counts) = summary.counts {
            self.counts = counts;
        }
        self.chart_data = summary.downtime_chart;
        self.detail_anchor = summary
            .detail_anchor
            .unwrap_or_else(|| DEFAULT_DETAIL_ANCHOR.to_owned());
    }

    /// Whether a refresh is due at `now`: no refresh armed, or the armed
    /// instant has passed.
    pub fn refresh_due(&self, now: DateTime<Utc>) -> bool {
        self.next_refresh_at.is_none_or(|at| at <= now)
    }

    /// Total number of systems across all server groups.
    pub fn system_count(&self) -> usize {
        self.servers.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use vigia_api::SystemEntry;

    use super::*;

    fn entry(name: &str, status: Option<&str>) -> SystemEntry {
        SystemEntry {
            name: name.to_owned(),
            url: format!("http://{name}"),
            status: status.map(str::to_owned),
            checked_at: status.map(|_| "2024-01-01 00:00:00".to_owned()),
        }
    }

    #[test]
    fn ingest_seeds_cache_only_from_inline_statuses() {
        let mut state = MonitorState::default();
        let mut servers = ServerMap::new();
        servers.insert("srv1".into(), vec![entry("A", Some("UP")), entry("B", None)]);

        state.ingest_servers(servers);

        assert_eq!(state.servers["srv1"].len(), 2);
        assert_eq!(state.status_of("A").unwrap().status, "UP");
        assert!(state.status_of("B").is_none());
    }

    #[test]
    fn record_status_later_write_wins_either_order() {
        let mut state = MonitorState::default();
        let mut servers = ServerMap::new();
        servers.insert("srv1".into(), vec![entry("A", Some("DOWN")), entry("B", Some("UP"))]);

        // ingest then record: record wins
        state.ingest_servers(servers.clone());
        state.record_status(
            "A",
            StatusRecord {
                status: "UP".into(),
                checked_at: Some("2024-01-01 00:05:00".into()),
            },
        );
        assert_eq!(state.status_of("A").unwrap().status, "UP");
        // sibling untouched
        assert_eq!(state.status_of("B").unwrap().status, "UP");
        assert_eq!(
            state.status_of("B").unwrap().checked_at.as_deref(),
            Some("2024-01-01 00:00:00")
        );

        // record then ingest: the (later) inline status wins
        state.record_status(
            "A",
            StatusRecord {
                status: "FORBIDDEN".into(),
                checked_at: None,
            },
        );
        state.ingest_servers(servers);
        assert_eq!(state.status_of("A").unwrap().status, "DOWN");
    }

    #[test]
    fn stale_records_survive_disappearing_systems() {
        let mut state = MonitorState::default();
        let mut first = ServerMap::new();
        first.insert("srv1".into(), vec![entry("A", Some("UP")), entry("B", Some("DOWN"))]);
        state.ingest_servers(first);

        let mut second = ServerMap::new();
        second.insert("srv1".into(), vec![entry("A", Some("UP"))]);
        state.ingest_servers(second);

        // B left the list but its record remains.
        assert_eq!(state.status_of("B").unwrap().status, "DOWN");
        assert_eq!(state.system_count(), 1);
    }

    #[test]
    fn apply_summary_merges_tolerantly() {
        let mut state = MonitorState::default();
        state.counts = SummaryCounts {
            active: 9,
            forbidden: 1,
            down: 2,
        };
        state.detail_anchor = "#downtime".into();

        state.apply_summary(DashboardSummary::default());

        // absent counts keep prior values; absent anchor resets
        assert_eq!(state.counts.active, 9);
        assert!(state.chart_data.is_empty());
        assert_eq!(state.detail_anchor, DEFAULT_DETAIL_ANCHOR);
    }

    #[test]
    fn refresh_due_semantics() {
        let now = Utc::now();
        let mut state = MonitorState::default();
        assert!(state.refresh_due(now));

        state.next_refresh_at = Some(now + TimeDelta::minutes(10));
        assert!(!state.refresh_due(now));

        state.next_refresh_at = Some(now - TimeDelta::seconds(1));
        assert!(state.refresh_due(now));
    }

    #[test]
    fn sparse_snapshot_merges_onto_defaults() {
        let raw = format!(r#"{{"version":{SCHEMA_VERSION},"counts":{{"active":5}}}}"#);
        let state: MonitorState = serde_json::from_str(&raw).unwrap();

        assert_eq!(state.version, SCHEMA_VERSION);
        assert_eq!(state.counts.active, 5);
        assert_eq!(state.counts.down, 0);
        assert_eq!(state.detail_anchor, DEFAULT_DETAIL_ANCHOR);
        assert!(state.servers.is_empty());
        assert!(state.next_refresh_at.is_none());
    }

    #[test]
    fn untagged_snapshot_gets_invalid_version() {
        let state: MonitorState = serde_json::from_str("{}").unwrap();
        assert_ne!(state.version, SCHEMA_VERSION);
    }
}
