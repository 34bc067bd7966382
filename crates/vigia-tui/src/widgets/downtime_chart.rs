//! Downtime bar chart — accumulated downtime minutes per system.
//!
//! One chart instance lives for the whole session: [`DowntimeChart::update`]
//! replaces its data in place on every summary refresh, the instance is
//! never recreated.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders};

use vigia_core::DowntimeEntry;

use crate::theme;

/// Vertical axis label.
pub const AXIS_LABEL: &str = "Minutos";

/// Suffix shown on each bar's value.
pub const VALUE_SUFFIX: &str = "min";

/// The session's single downtime chart.
pub struct DowntimeChart {
    labels: Vec<String>,
    values: Vec<u64>,
    generation: u64,
}

impl DowntimeChart {
    pub fn new(entries: &[DowntimeEntry]) -> Self {
        let mut chart = Self {
            labels: Vec::new(),
            values: Vec::new(),
            generation: 0,
        };
        chart.update(entries);
        chart
    }

    /// Replace the chart's data in place.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    pub fn update(&mut self, entries: &[DowntimeEntry]) {
        self.labels = entries.iter().map(|e| e.name.clone()).collect();
        self.values = entries
            .iter()
            .map(|e| e.total_minutes.max(0.0).round() as u64)
            .collect();
        self.generation += 1;
    }

    /// Number of times this instance has received data.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let bars: Vec<Bar> = self
            .labels
            .iter()
            .zip(&self.values)
            .map(|(label, &value)| {
                Bar::default()
                    .label(Line::from(label.clone()))
                    .value(value)
                    .text_value(format!("{value} {VALUE_SUFFIX}"))
                    .style(Style::default().fg(theme::CHART_BAR))
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(format!(" Downtime ({AXIS_LABEL}) "))
                    .title_style(theme::title_style())
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(12)
            .bar_gap(1);

        frame.render_widget(chart, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, minutes: f64) -> DowntimeEntry {
        DowntimeEntry {
            name: name.to_owned(),
            total_minutes: minutes,
        }
    }

    #[test]
    fn update_mutates_the_same_instance() {
        let mut chart = DowntimeChart::new(&[entry("A", 10.0)]);
        assert_eq!(chart.generation(), 1);

        chart.update(&[entry("A", 12.0), entry("B", 3.4)]);

        // Same instance, new data.
        assert_eq!(chart.generation(), 2);
        assert_eq!(chart.labels, vec!["A", "B"]);
        assert_eq!(chart.values, vec![12, 3]);
    }

    #[test]
    fn values_round_and_clamp_non_negative() {
        let chart = DowntimeChart::new(&[entry("A", 2.6), entry("B", -1.0)]);
        assert_eq!(chart.values, vec![3, 0]);
    }

    #[test]
    fn empty_entries_make_an_empty_chart() {
        let chart = DowntimeChart::new(&[]);
        assert!(chart.is_empty());
        assert_eq!(chart.generation(), 1);
    }
}
