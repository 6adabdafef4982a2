use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::{Notifications, Severity};
use crate::common::text::truncate_with_ellipsis;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// One-line notification bar; blank when nothing is pending.
pub fn render_notification(frame: &mut Frame, area: Rect, notifications: &Notifications) {
    let Some(note) = notifications.latest() else {
        return;
    };
    let color = severity_color(note.severity);
    let title = format!(" {} ", note.title);
    let room = (area.width as usize).saturating_sub(title.chars().count() + 1);
    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_with_ellipsis(&note.message, room),
            Style::default().fg(color),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
