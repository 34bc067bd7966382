//! Summary strip — aggregate counters, detail anchor, last-updated line.
//!
//! Tolerant of missing data: counters default to zero and the timestamp
//! shows a dash until the first successful cycle.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use vigia_core::{MonitorState, schedule};

use crate::theme;

pub struct SummaryStrip<'a> {
    pub state: &'a MonitorState,
}

impl SummaryStrip<'_> {
    /// The "last updated" portion of the strip.
    fn last_updated(&self) -> String {
        self.state
            .last_updated
            .map_or_else(|| "—".to_owned(), schedule::last_updated_display)
    }
}

impl Widget for SummaryStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let counts = self.state.counts;
        let line = Line::from(vec![
            Span::styled(
                format!(" Ativos: {}", counts.active),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            Span::styled("  •  ", theme::dim()),
            Span::styled(
                format!("Forbidden: {}", counts.forbidden),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ),
            Span::styled("  •  ", theme::dim()),
            Span::styled(
                format!("Down: {}", counts.down),
                Style::default().fg(theme::ERROR_RED),
            ),
            Span::styled("  •  ", theme::dim()),
            Span::styled(format!("Detalhes: {}", self.state.detail_anchor), theme::dim()),
            Span::styled("  •  ", theme::dim()),
            Span::styled(
                format!("Última atualização: {}", self.last_updated()),
                theme::dim(),
            ),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}
