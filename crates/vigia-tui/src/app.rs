//! Application core — event loop, action dispatch, dashboard layout.
//!
//! Layout:
//! ```text
//! ┌ header: title · phase / countdown to next refresh ────────────┐
//! │ summary: Ativos · Forbidden · Down · Detalhes · Última atual. │
//! │ ┌ server panel (search + filters + card grid) ──────────────┐ │
//! │ │ ...one per server group, in backend order...              │ │
//! │ └───────────────────────────────────────────────────────────┘ │
//! │ ┌ downtime chart ───────────────────────────────────────────┐ │
//! │ └───────────────────────────────────────────────────────────┘ │
//! │ footer: key hints                                             │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is a pure function of the latest state snapshot — every
//! frame fully rebuilds from it, so redraws are idempotent.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use vigia_core::{Monitor, MonitorState, Phase, schedule};

use crate::action::{Action, StatusFilter};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::panels::PanelRegistry;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::downtime_chart::DowntimeChart;
use crate::widgets::summary::SummaryStrip;

/// The single full-width error card shown when the list fetch fails.
pub const LIST_ERROR_TEXT: &str = "Erro ao carregar a lista de servidores";

/// Top-level application state and event loop.
pub struct App {
    /// Data source; `None` only in tests that feed actions directly.
    monitor: Option<Monitor>,
    /// Latest published state snapshot.
    state: Arc<MonitorState>,
    /// Latest refresh phase.
    phase: Phase,
    /// Server panels keyed by normalized id.
    registry: PanelRegistry,
    /// The session's downtime chart — created once, updated in place.
    chart: Option<DowntimeChart>,
    /// Index of the focused panel.
    focused: usize,
    /// Whether the app should keep running.
    running: bool,
    /// Action sender — background tasks dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(monitor: Option<Monitor>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            monitor,
            state: Arc::new(MonitorState::default()),
            phase: Phase::Idle,
            registry: PanelRegistry::default(),
            chart: None,
            focused: 0,
            running: true,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        // Spawn the data bridge if we have a monitor
        if let Some(monitor) = self.monitor.clone() {
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(monitor, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_secs(1),    // countdown tick
            Duration::from_millis(100), // 10 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if matches!(action, Action::Render) {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Stop background tasks and restore the terminal
        self.data_cancel.cancel();
        if let Some(monitor) = &self.monitor {
            monitor.shutdown();
        }
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. An active search box swallows keys
    /// first; global keys are handled here; the rest goes to the focused
    /// panel.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(panel) = self.registry.panel_at_mut(self.focused) {
            if panel.search_active() {
                return panel.handle_key_event(key);
            }
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Ok(Some(Action::Quit))
            }
            KeyCode::Char('q') => Ok(Some(Action::Quit)),
            KeyCode::Char('r') => Ok(Some(Action::Refresh)),
            KeyCode::Tab => Ok(Some(Action::FocusNext)),
            KeyCode::BackTab => Ok(Some(Action::FocusPrev)),
            KeyCode::Char('d') => Ok(Some(Action::Filter(StatusFilter::Down))),
            KeyCode::Char('f') => Ok(Some(Action::Filter(StatusFilter::Forbidden))),
            KeyCode::Char('c') => Ok(Some(Action::ClearFilter)),
            _ => self
                .registry
                .panel_at_mut(self.focused)
                .map_or(Ok(None), |panel| panel.handle_key_event(key)),
        }
    }

    /// Process a dispatched action.
    pub fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}
            Action::Tick => {
                for panel in self.registry.iter_mut() {
                    panel.update(action)?;
                }
            }
            Action::StateUpdated(state) => self.apply_state(state),
            Action::PhaseChanged(phase) => self.phase = *phase,
            Action::Refresh => {
                if let Some(monitor) = &self.monitor {
                    monitor.request_refresh();
                }
            }
            Action::FocusNext => self.shift_focus(1),
            Action::FocusPrev => self.shift_focus(-1),
            Action::Filter(filter) => {
                if let Some(panel) = self.registry.panel_at_mut(self.focused) {
                    panel.set_filter(Some(*filter));
                }
            }
            Action::ClearFilter => {
                if let Some(panel) = self.registry.panel_at_mut(self.focused) {
                    panel.clear_filters();
                }
            }
        }
        Ok(())
    }

    /// Adopt a fresh state snapshot: re-sync panels and feed the chart.
    fn apply_state(&mut self, state: &Arc<MonitorState>) {
        self.state = Arc::clone(state);
        self.registry.sync(state);

        // The chart instance is created once and then only mutated.
        match &mut self.chart {
            Some(chart) => chart.update(&state.chart_data),
            None => self.chart = Some(DowntimeChart::new(&state.chart_data)),
        }

        if self.focused >= self.registry.len() {
            self.focused = 0;
        }
        self.refresh_focus_flags();
    }

    fn shift_focus(&mut self, delta: isize) {
        let len = self.registry.len();
        if len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
        {
            let len = len as isize;
            let next = ((self.focused as isize) + delta).rem_euclid(len);
            self.focused = next as usize;
        }
        self.refresh_focus_flags();
    }

    fn refresh_focus_flags(&mut self) {
        let focused = self.focused;
        for (index, panel) in self.registry.iter_mut().enumerate() {
            panel.set_focused(index == focused);
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full dashboard from the latest snapshot.
    pub fn render(&mut self, frame: &mut Frame) {
        let show_chart = self.chart.as_ref().is_some_and(|c| !c.is_empty());
        let chart_height = if show_chart { 10 } else { 0 };

        let [header, summary, body, chart_area, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(7),
            Constraint::Length(chart_height),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header);
        frame.render_widget(SummaryStrip { state: &self.state }, summary);
        self.render_body(frame, body);
        if let Some(chart) = self.chart.as_ref().filter(|chart| !chart.is_empty()) {
            chart.render(frame, chart_area);
        }
        Self::render_footer(frame, footer);
    }

    /// Header: title on the left, refresh phase / countdown on the right.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let [left, right] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(48)]).areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(" VIGIA — Monitor de Sistemas", theme::title_style())),
            left,
        );

        let status = match self.phase {
            Phase::Fetching => Span::styled("Atualizando...", theme::key_hint()),
            Phase::Failed => Span::styled(
                format!("Próxima atualização: {}", schedule::COUNTDOWN_PLACEHOLDER),
                Style::default().fg(theme::ERROR_RED),
            ),
            Phase::Idle | Phase::Counting => match self.state.next_refresh_at {
                Some(at) => {
                    let countdown = schedule::countdown_display(Some(at), Utc::now());
                    Span::styled(
                        format!(
                            "Próxima atualização em {countdown} (às {})",
                            schedule::wall_clock(at)
                        ),
                        theme::dim(),
                    )
                }
                None => Span::styled(
                    format!("Próxima atualização: {}", schedule::COUNTDOWN_PLACEHOLDER),
                    theme::dim(),
                ),
            },
        };
        frame.render_widget(Paragraph::new(status).right_aligned(), right);
    }

    /// Panels area. A failed list fetch replaces everything with exactly
    /// one error card; no partial render.
    fn render_body(&mut self, frame: &mut Frame, area: Rect) {
        if self.phase == Phase::Failed {
            Self::render_error_card(frame, area);
            return;
        }

        if self.registry.is_empty() {
            let waiting = Paragraph::new(Span::styled(
                " Aguardando dados do monitor...",
                theme::dim(),
            ));
            frame.render_widget(waiting, area);
            return;
        }

        let count = self.registry.len();
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let constraints = vec![Constraint::Ratio(1, count as u32); count];
        let slots = Layout::vertical(constraints).split(area);
        for (panel, slot) in self.registry.iter_mut().zip(slots.iter()) {
            panel.render(frame, *slot);
        }
    }

    fn render_error_card(frame: &mut Frame, area: Rect) {
        let card_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.min(3),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ERROR_RED));
        let card = Paragraph::new(Span::styled(
            LIST_ERROR_TEXT,
            Style::default().fg(theme::ERROR_RED),
        ))
        .block(block)
        .centered();
        frame.render_widget(card, card_area);
    }

    fn render_footer(frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled(" /", theme::key_hint()),
            Span::styled(" buscar  ", theme::dim()),
            Span::styled("d", theme::key_hint()),
            Span::styled(" DOWN  ", theme::dim()),
            Span::styled("f", theme::key_hint()),
            Span::styled(" FORBIDDEN  ", theme::dim()),
            Span::styled("c", theme::key_hint()),
            Span::styled(" Limpar  ", theme::dim()),
            Span::styled("Tab", theme::key_hint()),
            Span::styled(" painel  ", theme::dim()),
            Span::styled("r", theme::key_hint()),
            Span::styled(" atualizar  ", theme::dim()),
            Span::styled("q", theme::key_hint()),
            Span::styled(" sair", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }
}
