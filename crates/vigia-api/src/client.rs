// Monitor backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining and body-preserving JSON
// decoding. All three endpoints are plain GETs with no envelope; the
// response body is kept verbatim in deserialization errors.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{DashboardSummary, ServerMap, SystemStatus};

/// HTTP client for the status-monitor backend.
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MonitorClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://monitor.example.com`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Used by tests that point a plain client at a mock server.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the systems list grouped by server.
    ///
    /// `GET /systems_list/`
    pub async fn systems_list(&self) -> Result<ServerMap, Error> {
        debug!("fetching systems list");
        self.get_json(self.endpoint("systems_list/"), &[]).await
    }

    /// Run a live status check for one system.
    ///
    /// `GET /system_status/?url=<url>&name=<name>`
    pub async fn system_status(
        &self,
        system_url: &str,
        name: &str,
    ) -> Result<SystemStatus, Error> {
        debug!(name, "checking system status");
        self.get_json(
            self.endpoint("system_status/"),
            &[("url", system_url), ("name", name)],
        )
        .await
    }

    /// Fetch the dashboard summary (counts, downtime chart, detail anchor).
    ///
    /// `GET /dashboard_summary/`
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, Error> {
        debug!("fetching dashboard summary");
        self.get_json(self.endpoint("dashboard_summary/"), &[]).await
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Absolute URL for an endpoint path, regardless of whether the
    /// configured base carries a trailing slash.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// GET `url`, require a success status, decode the body as JSON.
    ///
    /// The raw body travels inside [`Error::Deserialization`] so a schema
    /// drift on the backend is diagnosable from logs alone.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(Error::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                endpoint: url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
