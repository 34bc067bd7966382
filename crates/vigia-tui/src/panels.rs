//! Server panels — one titled panel per server group, with a search box,
//! status filters, and a grid of system cards.
//!
//! Panels are tracked in a [`PanelRegistry`] keyed by the server name's
//! normalized id, so filter controls keep their handle across re-renders
//! instead of re-deriving it from the name at every call site. Two names
//! normalizing to the same id silently share one handle — a known
//! limitation, no dedup is attempted.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};
use tracing::debug;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use vigia_core::{MonitorState, System, safe_id};

use crate::action::{Action, StatusFilter};
use crate::component::Component;
use crate::theme;
use crate::widgets::system_card::{CARD_HEIGHT, CARD_WIDTH, SystemCard};

/// Search box placeholder.
pub const SEARCH_PLACEHOLDER: &str = "Buscar por nome...";

/// One server group's panel.
pub struct ServerPanel {
    /// Display name (the server name as sent by the backend).
    pub name: String,
    /// Stable normalized id — the registry key.
    pub id: String,
    systems: Vec<System>,
    /// Latest state snapshot, for card record lookups.
    state: Arc<MonitorState>,
    search: Input,
    search_active: bool,
    filter: Option<StatusFilter>,
    scroll: usize,
    focused: bool,
    tick: usize,
}

impl ServerPanel {
    pub fn new(name: String, id: String) -> Self {
        Self {
            name,
            id,
            systems: Vec::new(),
            state: Arc::new(MonitorState::default()),
            search: Input::default(),
            search_active: false,
            filter: None,
            scroll: 0,
            focused: false,
            tick: 0,
        }
    }

    /// Point the panel at a fresh snapshot and system list.
    fn refresh(&mut self, name: &str, systems: &[System], state: &Arc<MonitorState>) {
        self.name.clear();
        self.name.push_str(name);
        self.systems = systems.to_vec();
        self.state = Arc::clone(state);
    }

    /// Whether the search box currently captures keystrokes.
    pub fn search_active(&self) -> bool {
        self.search_active
    }

    pub fn set_filter(&mut self, filter: Option<StatusFilter>) {
        self.filter = filter;
        self.scroll = 0;
    }

    /// Clear both the search query and the status filter.
    pub fn clear_filters(&mut self) {
        self.search.reset();
        self.filter = None;
        self.scroll = 0;
    }

    /// Case-insensitive substring match over the name, then the status
    /// filter against the card's presentation class.
    fn matches(&self, system: &System) -> bool {
        let query = self.search.value().trim().to_lowercase();
        if !query.is_empty() && !system.name.to_lowercase().contains(&query) {
            return false;
        }
        self.filter.is_none_or(|filter| {
            let class = self
                .state
                .status_of(&system.name)
                .map_or_else(|| "loading".to_owned(), vigia_core::StatusRecord::class);
            class == filter.class()
        })
    }

    /// Systems that pass the current search and filter.
    pub fn visible_systems(&self) -> Vec<&System> {
        self.systems.iter().filter(|s| self.matches(s)).collect()
    }

    fn filter_badge(&self) -> Option<&'static str> {
        self.filter.map(|f| match f {
            StatusFilter::Down => "[DOWN]",
            StatusFilter::Forbidden => "[FORBIDDEN]",
        })
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = if self.search_active {
            (format!(" /{}█", self.search.value()), theme::search_active())
        } else if self.search.value().is_empty() {
            (format!(" {SEARCH_PLACEHOLDER}"), theme::dim())
        } else {
            (format!(" /{}", self.search.value()), theme::dim())
        };
        frame.render_widget(Paragraph::new(Span::styled(text, style)), area);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let visible = self.visible_systems();
        if visible.is_empty() {
            let empty = Paragraph::new(Span::styled(" nenhum sistema", theme::dim()));
            frame.render_widget(empty, area);
            return;
        }

        let columns = usize::from((area.width / CARD_WIDTH).max(1));
        let rows = usize::from((area.height / CARD_HEIGHT).max(1));
        let total_rows = visible.len().div_ceil(columns);
        let max_scroll = total_rows.saturating_sub(rows);
        let scroll = self.scroll.min(max_scroll);

        for (slot, system) in visible
            .into_iter()
            .skip(scroll * columns)
            .take(columns * rows)
            .enumerate()
        {
            let col = slot % columns;
            let row = slot / columns;
            #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
            let cell = Rect {
                x: area.x + (col as u16) * CARD_WIDTH,
                y: area.y + (row as u16) * CARD_HEIGHT,
                width: CARD_WIDTH.min(area.width),
                height: CARD_HEIGHT,
            };
            if cell.bottom() > area.bottom() {
                break;
            }
            let card = SystemCard {
                system,
                record: self.state.status_of(&system.name),
                tick: self.tick,
            };
            frame.render_widget(card, cell);
        }
    }
}

impl Component for ServerPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search_active {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.search_active = false,
                _ => {
                    let _ = self.search.handle_event(&CrosstermEvent::Key(key));
                    self.scroll = 0;
                }
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Esc => self.clear_filters(),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if matches!(action, Action::Tick) {
            self.tick = self.tick.wrapping_add(1);
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible = self.visible_systems().len();
        let mut title = vec![Span::styled(
            format!(" {} ({visible}/{}) ", self.name, self.systems.len()),
            theme::title_style(),
        )];
        if let Some(badge) = self.filter_badge() {
            title.push(Span::styled(format!("{badge} "), theme::key_hint()));
        }

        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        block.render(area, frame.buffer_mut());

        if inner.height < 2 || inner.width == 0 {
            return;
        }

        let search_area = Rect { height: 1, ..inner };
        let grid_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        self.render_search(frame, search_area);
        self.render_grid(frame, grid_area);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

/// Registry mapping normalized server ids to their panel handles.
///
/// Rebuilt from every fresh server map; a panel whose id persists keeps
/// its search/filter/scroll state across refreshes.
#[derive(Default)]
pub struct PanelRegistry {
    panels: IndexMap<String, ServerPanel>,
}

impl PanelRegistry {
    /// Rebuild the registry from a fresh snapshot, preserving existing
    /// handles by id. Backend panel order is kept.
    pub fn sync(&mut self, state: &Arc<MonitorState>) {
        let mut next = IndexMap::with_capacity(state.servers.len());
        for (name, systems) in &state.servers {
            let id = safe_id(name);
            let mut panel = self
                .panels
                .shift_remove(&id)
                .unwrap_or_else(|| ServerPanel::new(name.clone(), id.clone()));
            panel.refresh(name, systems, state);
            debug!(panel = %panel.id, systems = systems.len(), "panel synced");
            // Colliding ids collapse into one handle (last name wins).
            next.insert(id, panel);
        }
        self.panels = next;
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Look up a panel by its normalized id.
    #[allow(dead_code)]
    pub fn get(&self, id: &str) -> Option<&ServerPanel> {
        self.panels.get(id)
    }

    pub fn panel_at_mut(&mut self, index: usize) -> Option<&mut ServerPanel> {
        self.panels.get_index_mut(index).map(|(_, panel)| panel)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ServerPanel> {
        self.panels.values_mut()
    }
}
