//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs
//! I/O itself.

use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Re-query every agent, bypassing the catalog cache.
    RefreshCatalog { task: TaskId },

    /// Rebuild the index (`cass index --full`).
    Reindex { task: TaskId },

    /// Fetch the index summary.
    LoadStats { task: TaskId },

    /// Suspend the TUI and page the exported session.
    OpenSession { source_path: String },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
