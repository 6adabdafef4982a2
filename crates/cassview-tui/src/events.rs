//! UI event types consumed by the reducer.

use cassview_core::backend::BackendError;
use cassview_core::catalog::CatalogSnapshot;
use crossterm::event::Event;
use serde_json::{Map, Value};

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Frame heartbeat; advances animations and expires notifications.
    Tick,
    Terminal(Event),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    /// Wraps a task's result event; unwrapped only if the task is still active.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    CatalogLoaded { snapshot: CatalogSnapshot },
    CatalogRefreshCanceled,
    StatsLoaded { stats: Map<String, Value> },
    ReindexFinished { result: Result<(), BackendError> },
}
