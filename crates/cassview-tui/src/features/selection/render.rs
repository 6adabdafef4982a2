//! Sidebar lists and the session detail panel.

use cassview_core::agent::AgentKind;
use cassview_core::catalog::CatalogSnapshot;
use cassview_core::session::Session;
use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::state::{Pane, SelectionState};
use crate::common::text::{format_age, format_short_timestamp, truncate_with_ellipsis};

/// Rows the agent list may take before it scrolls.
pub const AGENT_LIST_MAX_ROWS: u16 = 8;

fn agent_color(agent: AgentKind) -> Color {
    match agent {
        AgentKind::ClaudeCode => Color::Magenta,
        AgentKind::Codex => Color::Green,
        AgentKind::Cursor => Color::Cyan,
        AgentKind::Gemini => Color::Blue,
        AgentKind::Opencode => Color::Yellow,
        AgentKind::Amp => Color::Red,
        AgentKind::Cline => Color::LightMagenta,
        AgentKind::Aider => Color::LightGreen,
        AgentKind::Chatgpt => Color::LightCyan,
        AgentKind::PiAgent => Color::LightBlue,
    }
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

fn highlight(focused: bool) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    if focused {
        style.bg(Color::DarkGray)
    } else {
        style
    }
}

pub fn render_agent_list(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&CatalogSnapshot>,
    selection: &SelectionState,
    focus: Pane,
) {
    let focused = focus == Pane::Agents;
    let block = pane_block("Agents", focused);

    let Some(snapshot) = snapshot else {
        let loading = Paragraph::new(Line::styled("Loading...", dim())).block(block);
        frame.render_widget(loading, area);
        return;
    };
    if snapshot.is_empty() {
        let empty = Paragraph::new(Line::styled("No sessions found", dim())).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .agents()
        .iter()
        .map(|aggregate| {
            let agent = aggregate.agent();
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(agent_color(agent))),
                Span::raw(agent.as_str()),
                Span::styled(format!(" ({})", aggregate.count()), dim()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight(focused));
    let mut list_state =
        ListState::default().with_selected(selection.highlighted_agent(snapshot));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_session_list(
    frame: &mut Frame,
    area: Rect,
    selection: &SelectionState,
    focus: Pane,
) {
    let focused = focus == Pane::Sessions;
    let block = pane_block("Sessions", focused);
    let inner_width = area.width.saturating_sub(4) as usize;

    if selection.sessions().is_empty() {
        let message = if selection.current_agent().is_some() {
            "No sessions for this agent"
        } else {
            "Select an agent"
        };
        frame.render_widget(
            Paragraph::new(Line::styled(message, dim())).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = selection
        .sessions()
        .iter()
        .map(|session| session_item(session, inner_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight(focused));
    let mut list_state = ListState::default().with_selected(selection.highlighted_session());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn session_item(session: &Session, width: usize) -> ListItem<'static> {
    let dot = Span::styled("● ", Style::default().fg(agent_color(session.agent)));
    let name = truncate_with_ellipsis(session.display_name(), width.max(1));
    let age = format_age(session.age_seconds());

    match session.started_at.filter(|_| age != "?") {
        Some(started) => {
            let when = format_short_timestamp(&started.with_timezone(&Local));
            ListItem::new(vec![
                Line::from(vec![dot, Span::raw(name)]),
                Line::styled(format!("  {when} ({age} ago)"), dim()),
            ])
        }
        None => ListItem::new(Line::from(vec![
            dot,
            Span::raw(name),
            Span::styled(format!(" ({age})"), dim()),
        ])),
    }
}

pub fn render_detail(frame: &mut Frame, area: Rect, selection: &SelectionState) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");

    let Some(session) = selection.current_session() else {
        let hint = Paragraph::new(Line::styled("Select a session to view details", dim()))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let label = Style::default().add_modifier(Modifier::BOLD);
    let color = agent_color(session.agent);
    let mut lines = vec![
        Line::styled(
            session.agent.as_str().to_uppercase(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::from(vec![
            Span::styled("Title: ", label),
            Span::raw(
                session
                    .title
                    .as_deref()
                    .filter(|title| !title.is_empty())
                    .unwrap_or("Untitled")
                    .to_string(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Path: ", label),
            Span::raw(session.source_path.clone()),
        ]),
    ];
    if let Some(workspace) = &session.workspace {
        lines.push(Line::from(vec![
            Span::styled("Workspace: ", label),
            Span::raw(workspace.clone()),
        ]));
    }
    if let Some(started) = session.started_at {
        lines.push(Line::from(vec![
            Span::styled("Started: ", label),
            Span::raw(
                started
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::styled("Press Enter to open", dim()));

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}
