use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    CatalogRefresh,
    Reindex,
    Stats,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
///
/// The reducer claims an id with [`TaskState::begin`] when it emits the
/// effect, so a newer task supersedes an older one before either has started.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn begin(&mut self, id: TaskId) {
        self.active = Some(id);
        self.cancel = None;
    }

    /// Attaches the cancel token of the active task. Returns false for a
    /// superseded task.
    pub fn on_started(&mut self, started: &TaskStarted) -> bool {
        if self.active.is_some_and(|active| active != started.id) {
            return false;
        }
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
        true
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub catalog_refresh: TaskState,
    pub reindex: TaskState,
    pub stats: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::CatalogRefresh => &self.catalog_refresh,
            TaskKind::Reindex => &self.reindex,
            TaskKind::Stats => &self.stats,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::CatalogRefresh => &mut self.catalog_refresh,
            TaskKind::Reindex => &mut self.reindex,
            TaskKind::Stats => &mut self.stats,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.catalog_refresh.is_running() || self.reindex.is_running() || self.stats.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_task_is_not_finished() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();
        let old = seq.next_id();
        let new = seq.next_id();

        state.begin(old);
        state.begin(new);

        assert!(!state.finish_if_active(old));
        assert!(state.is_running());
        assert!(state.finish_if_active(new));
        assert!(!state.is_running());
    }

    #[test]
    fn test_late_start_does_not_steal_the_slot() {
        let mut state = TaskState::default();
        state.begin(TaskId(2));

        let stale = TaskStarted {
            id: TaskId(1),
            cancel: Some(CancellationToken::new()),
        };
        assert!(!state.on_started(&stale));
        assert_eq!(state.active, Some(TaskId(2)));
        assert!(state.cancel.is_none());

        let current = TaskStarted {
            id: TaskId(2),
            cancel: Some(CancellationToken::new()),
        };
        assert!(state.on_started(&current));
        assert!(state.cancel.is_some());
    }

    #[test]
    fn test_any_running() {
        let mut tasks = Tasks::default();
        assert!(!tasks.is_any_running());
        tasks.state_mut(TaskKind::Stats).begin(TaskId(0));
        assert!(tasks.is_any_running());
        assert!(tasks.state(TaskKind::Stats).is_running());
        assert!(!tasks.state(TaskKind::Reindex).is_running());
    }
}
