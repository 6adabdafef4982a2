//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::{Duration, Instant};

use cassview_core::backend::BackendError;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::common::TaskKind;
use crate::common::text::{excerpt, format_duration};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::notify::Severity;
use crate::features::selection::Pane;
use crate::state::AppState;

pub const HELP_TEXT: &str = "q=quit  r=refresh  i=reindex  Space=open  s=stats  ?=help";

/// Longest stderr excerpt shown for a failed re-index.
const REINDEX_ERROR_EXCERPT_CHARS: usize = 200;

/// The "running" notice stays up longer than ordinary notifications.
const REINDEX_NOTICE_TTL: Duration = Duration::from_secs(10);

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if app.tasks.is_any_running() {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
            }
            app.notifications.prune(Instant::now());
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            if !app.tasks.state_mut(kind).on_started(&started) {
                tracing::debug!(?kind, id = started.id.0, "ignoring start of superseded task");
            }
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "discarding stale task result");
                vec![]
            }
        }
        UiEvent::CatalogLoaded { snapshot } => {
            app.catalog.publish(snapshot.clone());
            app.selection.on_snapshot_published(&snapshot);
            vec![]
        }
        UiEvent::CatalogRefreshCanceled => vec![],
        UiEvent::StatsLoaded { stats } => {
            app.stats.data = Some(stats);
            vec![]
        }
        UiEvent::ReindexFinished { result } => handle_reindex_finished(app, result),
    }
}

/// Starts a catalog refresh, superseding any refresh in flight.
pub fn load(app: &mut AppState) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    let refresh = &mut app.tasks.catalog_refresh;
    if refresh.is_running() {
        effects.push(UiEffect::CancelTask {
            kind: TaskKind::CatalogRefresh,
            token: refresh.cancel.take(),
        });
    }
    let task = app.task_seq.next_id();
    app.tasks.catalog_refresh.begin(task);
    effects.push(UiEffect::RefreshCatalog { task });
    effects
}

/// Starts a full re-index unless one is already running.
pub fn reindex(app: &mut AppState) -> Vec<UiEffect> {
    if app.tasks.reindex.is_running() {
        app.notifications
            .warn("Re-indexing", "A re-index is already running");
        return vec![];
    }
    let task = app.task_seq.next_id();
    app.tasks.reindex.begin(task);
    app.notifications.push(
        "Re-indexing",
        "Running cass index --full...",
        Severity::Info,
        REINDEX_NOTICE_TTL,
    );
    vec![UiEffect::Reindex { task }]
}

fn load_stats(app: &mut AppState) -> Vec<UiEffect> {
    if app.tasks.stats.is_running() {
        return vec![];
    }
    let task = app.task_seq.next_id();
    app.tasks.stats.begin(task);
    vec![UiEffect::LoadStats { task }]
}

fn handle_reindex_finished(app: &mut AppState, result: Result<(), BackendError>) -> Vec<UiEffect> {
    let error = match result {
        Ok(()) => {
            tracing::info!("re-index finished");
            app.notifications
                .info("Re-index Complete", "Index rebuilt successfully! Refreshing...");
            return load(app);
        }
        Err(error) => error,
    };

    tracing::warn!(%error, "re-index failed");
    let (title, message) = match &error {
        BackendError::Timeout { timeout } => (
            "Timeout",
            format!("Re-index timed out after {}", format_duration(*timeout)),
        ),
        BackendError::NotFound { bin } => {
            ("Error", format!("{bin} command not found. Is it installed?"))
        }
        BackendError::Failed { stderr, .. } => {
            let detail = if stderr.is_empty() {
                "Unknown error"
            } else {
                excerpt(stderr, REINDEX_ERROR_EXCERPT_CHARS)
            };
            ("Error", format!("Re-index failed: {detail}"))
        }
        BackendError::Io { .. } => {
            let detail = error.to_string();
            (
                "Error",
                format!(
                    "Re-index failed: {}",
                    excerpt(&detail, REINDEX_ERROR_EXCERPT_CHARS)
                ),
            )
        }
    };
    app.notifications.error(title, message);
    vec![]
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => vec![UiEffect::Quit],
            _ => vec![],
        };
    }

    match key.code {
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Char('r') => {
            app.notifications.info("Refresh", "Refreshing sessions...");
            load(app)
        }
        KeyCode::Char('i') => reindex(app),
        KeyCode::Char('s') => {
            if app.stats.toggle() {
                load_stats(app)
            } else {
                vec![]
            }
        }
        KeyCode::Char('?') => {
            app.notifications.info("Keyboard Shortcuts", HELP_TEXT);
            vec![]
        }
        KeyCode::Char(' ') => open_current_session(app),
        KeyCode::Enter => {
            if app.focus == Pane::Agents && !app.selection.sessions().is_empty() {
                app.focus = Pane::Sessions;
                vec![]
            } else {
                open_current_session(app)
            }
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = app.focus.toggle();
            vec![]
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.focus = Pane::Agents;
            vec![]
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.focus = Pane::Sessions;
            vec![]
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::PageDown => move_cursor(app, 10),
        KeyCode::PageUp => move_cursor(app, -10),
        _ => vec![],
    }
}

fn move_cursor(app: &mut AppState, delta: isize) -> Vec<UiEffect> {
    match app.focus {
        Pane::Agents => {
            let snapshot = app.catalog.cached().cloned().unwrap_or_default();
            app.selection.move_agent(&snapshot, delta);
        }
        Pane::Sessions => {
            app.selection.move_session(delta);
        }
    }
    vec![]
}

fn open_current_session(app: &AppState) -> Vec<UiEffect> {
    app.selection
        .current_session()
        .map(|session| UiEffect::OpenSession {
            source_path: session.source_path.clone(),
        })
        .into_iter()
        .collect()
}

/// True while a task of `kind` is in flight.
pub fn is_task_running(app: &AppState, kind: TaskKind) -> bool {
    app.tasks.state(kind).is_running()
}
