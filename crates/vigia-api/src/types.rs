//! Wire types for the three backend endpoints.
//!
//! Shapes follow the backend's JSON exactly; optional fields are defaulted
//! so a sparse response never fails to parse. Extra fields (the status
//! endpoint echoes `name` and `url` back) are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Response of `GET /systems_list/`: server name → ordered list of systems.
///
/// An `IndexMap` because panel order on the dashboard follows the backend's
/// JSON object order.
pub type ServerMap = IndexMap<String, Vec<SystemEntry>>;

/// One monitored system as listed under a server group.
///
/// `status` / `checked_at` are inline last-known values the backend may
/// embed; when present they seed the status cache before live checks land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEntry {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<String>,
}

/// Response of `GET /system_status/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemStatus {
    pub status: String,
    #[serde(default)]
    pub checked_at: Option<String>,
}

/// Aggregate counters from the dashboard summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub forbidden: u64,
    #[serde(default)]
    pub down: u64,
}

/// One bar of the downtime chart: minutes of accumulated downtime per system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeEntry {
    pub name: String,
    pub total_minutes: f64,
}

/// Response of `GET /dashboard_summary/`.
///
/// Every field is optional on the wire; `vigia-core` keeps prior values for
/// absent counts/anchor and treats an absent chart as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub counts: Option<SummaryCounts>,
    #[serde(default)]
    pub downtime_chart: Vec<DowntimeEntry>,
    #[serde(default)]
    pub detail_anchor: Option<String>,
}
