//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::TaskKind;
use crate::features::notify::render_notification;
use crate::features::selection::{
    AGENT_LIST_MAX_ROWS, render_agent_list, render_detail, render_session_list,
};
use crate::features::stats::{STATS_PANEL_HEIGHT, render_stats};
use crate::state::AppState;
use crate::update::is_task_running;

/// Width of the agent/session sidebar.
const SIDEBAR_WIDTH: u16 = 35;

/// Spinner frames for background work.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const FOOTER_HINTS: &[(&str, &str)] = &[
    ("q", "quit"),
    ("r", "refresh"),
    ("i", "reindex"),
    ("space", "open"),
    ("tab", "pane"),
    ("s", "stats"),
    ("?", "help"),
];

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Main
            Constraint::Length(1), // Notification
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(app, frame, rows[0]);
    render_main(app, frame, rows[1]);
    render_notification(frame, rows[2], &app.notifications);
    render_footer(frame, rows[3]);
}

fn render_header(app: &AppState, frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " CASS Sessions ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  Workspace: {}", app.workspace.display()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_main(app: &AppState, frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(area);

    let agent_rows = app.snapshot().map_or(1, |snapshot| {
        u16::try_from(snapshot.agent_count())
            .unwrap_or(AGENT_LIST_MAX_ROWS)
            .clamp(1, AGENT_LIST_MAX_ROWS)
    });
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(agent_rows + 2), Constraint::Min(3)])
        .split(columns[0]);
    render_agent_list(
        frame,
        sidebar[0],
        app.snapshot(),
        &app.selection,
        app.focus,
    );
    render_session_list(frame, sidebar[1], &app.selection, app.focus);

    let stats_height = if app.stats.visible {
        STATS_PANEL_HEIGHT
    } else {
        0
    };
    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Status bar
            Constraint::Min(3),               // Detail
            Constraint::Length(stats_height), // Stats
        ])
        .split(columns[1]);
    render_status_bar(app, frame, detail[0]);
    render_detail(frame, detail[1], &app.selection);
    if app.stats.visible {
        render_stats(frame, detail[2], &app.stats);
    }
}

/// `CASS │ N agents │ M sessions`, or `Loading...` before the first refresh.
pub fn status_text(app: &AppState) -> String {
    let mut text = match app.snapshot() {
        None => "Loading...".to_string(),
        Some(snapshot) => format!(
            "CASS │ {} agents │ {} sessions",
            snapshot.agent_count(),
            snapshot.session_count()
        ),
    };
    let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    if app.snapshot().is_some() && is_task_running(app, TaskKind::CatalogRefresh) {
        text.push_str(&format!(" │ {spinner} refreshing"));
    }
    if is_task_running(app, TaskKind::Reindex) {
        text.push_str(&format!(" │ {spinner} re-indexing"));
    }
    text
}

fn render_status_bar(app: &AppState, frame: &mut Frame, area: Rect) {
    let bar = Paragraph::new(Line::from(format!(" {}", status_text(app))))
        .style(Style::default().fg(Color::White).bg(Color::Blue));
    frame.render_widget(bar, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(FOOTER_HINTS.len() * 3);
    for (key, label) in FOOTER_HINTS {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        ));
        spans.push(Span::raw(format!(" {label}")));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
