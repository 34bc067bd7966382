//! Async HTTP client for the vigia status-monitor backend.
//!
//! The backend exposes three JSON-over-GET endpoints, consumed as external
//! collaborators:
//!
//! - `GET /systems_list/` — monitored systems grouped by server, optionally
//!   carrying inline last-known statuses.
//! - `GET /system_status/?url=<url>&name=<name>` — a live health check for
//!   one system.
//! - `GET /dashboard_summary/` — aggregate counts, downtime chart data, and
//!   the detail-link anchor.
//!
//! [`MonitorClient`] wraps a shared `reqwest::Client` with base-URL joining
//! and body-preserving JSON decoding. `vigia-core` drives it and maps
//! failures into per-card degradation; nothing in this crate retries.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::MonitorClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{
    DashboardSummary, DowntimeEntry, ServerMap, SummaryCounts, SystemEntry, SystemStatus,
};
