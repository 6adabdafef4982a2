//! Index stats panel (toggled with `s`).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use serde_json::{Map, Value};

use crate::common::text::truncate_with_ellipsis;

/// Panel height including borders.
pub const STATS_PANEL_HEIGHT: u16 = 8;

#[derive(Debug, Default, Clone)]
pub struct StatsPanel {
    pub visible: bool,
    /// `None` until the first load finishes.
    pub data: Option<Map<String, Value>>,
}

impl StatsPanel {
    /// Flips visibility; returns true when the panel just became visible.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

/// `key: value` lines in map order; scalars unquoted, containers as compact JSON.
pub fn stats_lines(stats: &Map<String, Value>) -> Vec<(String, String)> {
    stats
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => "-".to_string(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

pub fn render_stats(frame: &mut Frame, area: Rect, panel: &StatsPanel) {
    let block = Block::default().borders(Borders::ALL).title(" Index ");
    let dim = Style::default().fg(Color::DarkGray);

    let lines: Vec<Line> = match &panel.data {
        None => vec![Line::styled("Loading...", dim)],
        Some(stats) if stats.is_empty() => vec![Line::styled("No stats available", dim)],
        Some(stats) => {
            let width = area.width.saturating_sub(2) as usize;
            stats_lines(stats)
                .into_iter()
                .map(|(key, value)| {
                    let room = width.saturating_sub(key.chars().count() + 2);
                    Line::from(vec![
                        Span::styled(
                            format!("{key}: "),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(truncate_with_ellipsis(&value, room)),
                    ])
                })
                .collect()
        }
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_stats_lines_format_values() {
        let Value::Object(stats) = json!({
            "conversations": 12,
            "db_path": "/data/cass.db",
            "last_indexed": null,
            "agents": {"codex": 3},
        }) else {
            unreachable!()
        };

        let lines = stats_lines(&stats);
        let find = |key: &str| {
            lines
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(find("conversations"), Some("12"));
        assert_eq!(find("db_path"), Some("/data/cass.db"));
        assert_eq!(find("last_indexed"), Some("-"));
        assert_eq!(find("agents"), Some(r#"{"codex":3}"#));
    }

    #[test]
    fn test_toggle() {
        let mut panel = StatsPanel::default();
        assert!(panel.toggle());
        assert!(!panel.toggle());
    }
}
