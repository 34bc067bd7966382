//! All possible UI actions. Actions are the sole mechanism for state
//! mutation in the app loop.

use std::sync::Arc;

use vigia_core::{MonitorState, Phase};

/// Status filter applied to a server panel's card grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Down,
    Forbidden,
}

impl StatusFilter {
    /// Presentation class this filter matches against.
    pub fn class(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Forbidden => "forbidden",
        }
    }
}

/// Actions dispatched through the app's action channel.
#[derive(Debug, Clone)]
pub enum Action {
    /// Exit the application.
    Quit,
    /// 1 Hz tick — countdown and spinner cadence.
    Tick,
    /// Redraw the frame.
    Render,
    /// Terminal resized to (cols, rows).
    Resize(u16, u16),
    /// A fresh state snapshot arrived from the monitor.
    StateUpdated(Arc<MonitorState>),
    /// The refresh phase changed.
    PhaseChanged(Phase),
    /// Manual refresh requested by the user.
    Refresh,
    /// Focus the next server panel.
    FocusNext,
    /// Focus the previous server panel.
    FocusPrev,
    /// Apply a status filter to the focused panel.
    Filter(StatusFilter),
    /// Clear search and status filter on the focused panel.
    ClearFilter,
}
