//! Data bridge — connects [`Monitor`] streams to TUI actions.
//!
//! Runs as a background task: subscribes to the monitor's state and
//! phase channels, forwarding every change as an [`Action`] through the
//! TUI's action channel. Shuts down cleanly on cancellation.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use vigia_core::Monitor;

use crate::action::Action;

/// Forward monitor state/phase changes into the TUI action loop.
///
/// Pushes the current snapshots first so the dashboard has data
/// immediately (the restored snapshot renders before the first cycle).
pub async fn spawn_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut state_rx = monitor.subscribe_state();
    let mut phase_rx = monitor.subscribe_phase();

    // Initial snapshots
    let _ = action_tx.send(Action::StateUpdated(state_rx.borrow_and_update().clone()));
    let _ = action_tx.send(Action::PhaseChanged(*phase_rx.borrow_and_update()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = state_rx.changed() => {
                debug!("dispatching StateUpdated");
                let state = state_rx.borrow_and_update().clone();
                if action_tx.send(Action::StateUpdated(state)).is_err() {
                    break;
                }
            }

            Ok(()) = phase_rx.changed() => {
                let phase = *phase_rx.borrow_and_update();
                debug!(?phase, "dispatching PhaseChanged");
                if action_tx.send(Action::PhaseChanged(phase)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge stopped");
}
