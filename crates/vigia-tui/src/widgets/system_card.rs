//! System status card — one bordered card per monitored system.
//!
//! A card with a cached record shows the status word and its check
//! timestamp; a card still waiting for data renders the distinct loading
//! placeholder (spinner, no timestamp).

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget};
use throbber_widgets_tui::{Throbber, ThrobberState};

use vigia_core::{StatusKind, StatusRecord, System};

use crate::theme;

/// Status line of a card that has no cached record yet.
pub const LOADING_TEXT: &str = "CARREGANDO";

/// Status line of a record whose status string is empty.
pub const UNKNOWN_STATUS: &str = "DESCONHECIDO";

/// Prefix of the timestamp line.
pub const TIMESTAMP_PREFIX: &str = "Última verificação";

/// Card cell dimensions in the grid (wide enough for a full timestamp
/// line inside the borders).
pub const CARD_WIDTH: u16 = 44;
pub const CARD_HEIGHT: u16 = 5;

/// Visible status text for a card.
pub fn status_text(record: Option<&StatusRecord>) -> &str {
    match record {
        Some(record) if !record.status.is_empty() => &record.status,
        Some(_) => UNKNOWN_STATUS,
        None => LOADING_TEXT,
    }
}

/// Timestamp line, absent when there is no `checked_at`.
pub fn timestamp_text(record: Option<&StatusRecord>) -> Option<String> {
    record
        .and_then(|record| record.checked_at.as_deref())
        .map(|checked_at| format!("{TIMESTAMP_PREFIX}: {checked_at}"))
}

/// Presentation kind of a card — drives border and status colors.
pub fn card_kind(record: Option<&StatusRecord>) -> StatusKind {
    record.map_or(StatusKind::Loading, |record| {
        StatusKind::classify(&record.status)
    })
}

/// One system card.
pub struct SystemCard<'a> {
    pub system: &'a System,
    pub record: Option<&'a StatusRecord>,
    /// 1 Hz tick driving the loading spinner.
    pub tick: usize,
}

impl Widget for SystemCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = card_kind(self.record);
        let color = theme::status_color(&kind);

        let block = Block::default()
            .title(Line::from(Span::styled(
                format!(" {} ", self.system.name),
                theme::dim(),
            )))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                status_text(self.record).to_owned(),
                theme::status_style(&kind),
            )),
            Line::from(Span::styled(self.system.url.clone(), theme::dim())),
        ];
        if let Some(timestamp) = timestamp_text(self.record) {
            lines.push(Line::from(Span::styled(timestamp, theme::dim())));
        }
        Paragraph::new(lines).render(inner, buf);

        // Loading placeholder: a spinner row where the timestamp would be.
        if self.record.is_none() && inner.height >= 3 {
            let spin_area = Rect {
                x: inner.x,
                y: inner.y + 2,
                width: inner.width,
                height: 1,
            };
            let throbber = Throbber::default()
                .label("aguardando verificação")
                .style(theme::dim())
                .throbber_style(Style::default().fg(theme::BORDER_GRAY));
            let mut spin = ThrobberState::default();
            for _ in 0..(self.tick % 8) {
                spin.calc_next();
            }
            StatefulWidget::render(throbber, spin_area, buf, &mut spin);
        }
    }
}
