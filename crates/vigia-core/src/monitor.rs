// ── Monitor facade ──
//
// Full lifecycle for the dashboard's data: restores the persisted
// snapshot, resumes or starts the refresh cadence, executes fetch cycles,
// and publishes reactive state snapshots for the UI.

use std::sync::Arc;

use chrono::{Local, TimeDelta, Utc};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{Mutex, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use vigia_api::{MonitorClient, TransportConfig};

use crate::error::CoreError;
use crate::model::{ERROR_STATUS, StatusRecord};
use crate::schedule::{self, Phase};
use crate::snapshot::SnapshotStore;
use crate::state::MonitorState;

/// Manual refresh requests queue at most this deep; extras are dropped.
const REFRESH_CHANNEL_SIZE: usize = 4;

/// Monitor configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Backend base URL.
    pub base_url: Url,
    /// Interval between refresh cycles.
    pub refresh_interval: std::time::Duration,
    /// Per-request timeout.
    pub timeout: std::time::Duration,
    /// Accept invalid TLS certificates.
    pub danger_accept_invalid_certs: bool,
}

impl MonitorConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            refresh_interval: schedule::REFRESH_INTERVAL,
            timeout: std::time::Duration::from_secs(30),
            danger_accept_invalid_certs: false,
        }
    }
}

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. One task runs
/// [`run()`](Self::run); everyone else observes through the `watch`
/// subscriptions and nudges through [`request_refresh()`](Self::request_refresh).
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: MonitorClient,
    store: Arc<dyn SnapshotStore>,
    /// The one mutable state object. Touched only from the run loop;
    /// consumers see immutable snapshots via `snapshot_tx`.
    state: Mutex<MonitorState>,
    snapshot_tx: watch::Sender<Arc<MonitorState>>,
    phase_tx: watch::Sender<Phase>,
    refresh_tx: mpsc::Sender<()>,
    refresh_rx: Mutex<Option<mpsc::Receiver<()>>>,
    cancel: CancellationToken,
}

impl Monitor {
    /// Create a monitor with its own HTTP client. Does NOT start the
    /// loop — spawn [`run()`](Self::run) for that.
    pub fn new(config: MonitorConfig, store: Arc<dyn SnapshotStore>) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            danger_accept_invalid_certs: config.danger_accept_invalid_certs,
        };
        let client = MonitorClient::new(config.base_url.clone(), &transport)?;
        Ok(Self::with_client(config, client, store))
    }

    /// Create a monitor around a pre-built client (tests point this at a
    /// mock server).
    pub fn with_client(
        config: MonitorConfig,
        client: MonitorClient,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(MonitorState::default()));
        let (phase_tx, _) = watch::channel(Phase::Idle);
        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_CHANNEL_SIZE);

        Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                store,
                state: Mutex::new(MonitorState::default()),
                snapshot_tx,
                phase_tx,
                refresh_tx,
                refresh_rx: Mutex::new(Some(refresh_rx)),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Subscribe to state snapshots. The receiver always holds the latest.
    pub fn subscribe_state(&self) -> watch::Receiver<Arc<MonitorState>> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Subscribe to refresh phase transitions.
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.inner.phase_tx.subscribe()
    }

    /// Current state snapshot (cheap `Arc` clone).
    pub fn state_snapshot(&self) -> Arc<MonitorState> {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Current refresh phase.
    pub fn phase(&self) -> Phase {
        *self.inner.phase_tx.borrow()
    }

    /// Request an immediate refresh cycle. Queues behind an in-flight
    /// cycle; never runs two cycles at once.
    pub fn request_refresh(&self) {
        if self.inner.refresh_tx.try_send(()).is_err() {
            debug!("manual refresh already queued");
        }
    }

    /// Stop the run loop.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    /// Token cancelled when the monitor shuts down.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    /// Main loop. Restores the snapshot, then alternates between waiting
    /// (for the armed deadline or a manual trigger) and running cycles.
    ///
    /// After a failed cycle no deadline is armed — the loop waits for a
    /// manual trigger alone.
    pub async fn run(&self) {
        let mut refresh_rx = self
            .inner
            .refresh_rx
            .lock()
            .await
            .take()
            .expect("monitor run loop started twice");

        self.restore().await;

        loop {
            let deadline = self.next_deadline().await;

            tokio::select! {
                () = self.inner.cancel.cancelled() => break,

                cmd = refresh_rx.recv() => {
                    if cmd.is_none() {
                        break;
                    }
                    info!("manual refresh requested");
                    self.run_cycle().await;
                }

                () = async {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending().await,
                    }
                } => {
                    self.run_cycle().await;
                }
            }
        }

        info!("monitor loop stopped");
    }

    // ── Cycle internals ──────────────────────────────────────────────

    /// Load the persisted snapshot and publish the initial state. A valid
    /// snapshot with a future `next_refresh_at` resumes the countdown to
    /// the original instant instead of resetting the interval.
    async fn restore(&self) {
        match self.inner.store.load() {
            Ok(Some(saved)) => {
                info!("restored snapshot from previous session");
                *self.inner.state.lock().await = saved;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to load snapshot; starting from defaults"),
        }

        let state = self.inner.state.lock().await;
        if !state.refresh_due(Utc::now()) {
            info!("resuming countdown to persisted refresh instant");
            let _ = self.inner.phase_tx.send(Phase::Counting);
        }
        self.publish(&state);
    }

    /// Instant the next automatic cycle should start, or `None` when no
    /// timer may be armed (after a failed cycle).
    async fn next_deadline(&self) -> Option<tokio::time::Instant> {
        if *self.inner.phase_tx.borrow() == Phase::Failed {
            return None;
        }
        let next = self.inner.state.lock().await.next_refresh_at;
        let now = Utc::now();
        let delay = match next {
            Some(at) if at > now => (at - now).to_std().unwrap_or_default(),
            // Due immediately: nothing armed yet, or the instant passed
            // while we were gone.
            _ => std::time::Duration::ZERO,
        };
        Some(tokio::time::Instant::now() + delay)
    }

    /// One full refresh cycle: list → ingest → concurrent per-system
    /// checks → summary → reschedule. Only the list fetch is fatal.
    async fn run_cycle(&self) {
        let _ = self.inner.phase_tx.send(Phase::Fetching);
        info!("starting refresh cycle");

        let servers = match self.inner.client.systems_list().await {
            Ok(servers) => servers,
            Err(e) => {
                warn!(error = %e, "systems list fetch failed; cycle aborted");
                let mut state = self.inner.state.lock().await;
                state.next_refresh_at = None;
                self.publish(&state);
                drop(state);
                let _ = self.inner.phase_tx.send(Phase::Failed);
                return;
            }
        };

        let checks: Vec<(String, String)> = servers
            .values()
            .flatten()
            .map(|entry| (entry.name.clone(), entry.url.clone()))
            .collect();

        // Publish the list with any inline statuses before the live
        // checks land, so cards render a "last known" state immediately.
        {
            let mut state = self.inner.state.lock().await;
            state.ingest_servers(servers);
            self.publish(&state);
        }

        // All checks go out together; the cycle moves on only after every
        // one settles, so total latency is bounded by the slowest check.
        let total = checks.len();
        let mut pending: FuturesUnordered<_> = checks
            .iter()
            .map(|(name, url)| async move {
                let record = self.check_system(url, name).await;
                (name.clone(), record)
            })
            .collect();

        while let Some((name, record)) = pending.next().await {
            let mut state = self.inner.state.lock().await;
            state.record_status(name, record);
            self.publish(&state);
        }
        drop(pending);
        debug!(total, "all status checks settled");

        match self.inner.client.dashboard_summary().await {
            Ok(summary) => {
                let mut state = self.inner.state.lock().await;
                state.apply_summary(summary);
                self.publish(&state);
            }
            Err(e) => {
                warn!(error = %e, "dashboard summary fetch failed; keeping previous summary");
            }
        }

        {
            let now = Utc::now();
            let interval = TimeDelta::from_std(self.inner.config.refresh_interval)
                .unwrap_or_else(|_| TimeDelta::minutes(15));
            let mut state = self.inner.state.lock().await;
            state.last_updated = Some(now);
            state.next_refresh_at = Some(now + interval);
            self.publish(&state);
        }
        let _ = self.inner.phase_tx.send(Phase::Counting);
        info!("refresh cycle complete");
    }

    /// One live status check. Failure degrades to an ERRO record stamped
    /// with the current local time; it never fails the cycle.
    async fn check_system(&self, url: &str, name: &str) -> StatusRecord {
        match self.inner.client.system_status(url, name).await {
            Ok(status) => StatusRecord::from(status),
            Err(e) => {
                warn!(system = name, error = %e, "status check failed");
                StatusRecord {
                    status: ERROR_STATUS.to_owned(),
                    checked_at: Some(schedule::local_timestamp(Local::now())),
                }
            }
        }
    }

    /// Persist and broadcast after a mutation. Persistence failure is
    /// logged and never interrupts the cycle.
    fn publish(&self, state: &MonitorState) {
        if let Err(e) = self.inner.store.save(state) {
            warn!(error = %e, "failed to persist snapshot");
        }
        let _ = self.inner.snapshot_tx.send(Arc::new(state.clone()));
    }
}
