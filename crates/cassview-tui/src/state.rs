//! Application state.
//!
//! ```text
//! AppState
//! ├── catalog: SessionCatalog    (query client + last published snapshot)
//! ├── selection: SelectionState  (current agent/session, list cursors)
//! ├── focus: Pane                (which sidebar list takes j/k)
//! ├── notifications: Notifications
//! ├── stats: StatsPanel
//! ├── task_seq: TaskSeq          (async task id generator)
//! └── tasks: Tasks               (task lifecycle state)
//! ```
//!
//! Mutated only by the reducer; render reads it by shared reference.

use std::path::PathBuf;
use std::time::Duration;

use cassview_core::catalog::{CatalogSnapshot, SessionCatalog};

use crate::common::{TaskSeq, Tasks};
use crate::features::notify::Notifications;
use crate::features::selection::{Pane, SelectionState};
use crate::features::stats::StatsPanel;

#[derive(Debug)]
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Directory shown in the header.
    pub workspace: PathBuf,
    pub catalog: SessionCatalog,
    pub selection: SelectionState,
    pub focus: Pane,
    pub notifications: Notifications,
    pub stats: StatsPanel,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// Advanced on every tick while a task runs.
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(catalog: SessionCatalog, workspace: PathBuf, notification_ttl: Duration) -> Self {
        Self {
            should_quit: false,
            workspace,
            catalog,
            selection: SelectionState::default(),
            focus: Pane::default(),
            notifications: Notifications::new(notification_ttl),
            stats: StatsPanel::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
        }
    }

    /// Last published snapshot; `None` until the first refresh lands.
    pub fn snapshot(&self) -> Option<&CatalogSnapshot> {
        self.catalog.cached()
    }
}
