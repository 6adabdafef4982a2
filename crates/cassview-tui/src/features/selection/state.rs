//! Agent/session selection state.

use cassview_core::agent::AgentKind;
use cassview_core::catalog::CatalogSnapshot;
use cassview_core::session::Session;

/// Which sidebar list receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Agents,
    Sessions,
}

impl Pane {
    pub fn toggle(self) -> Self {
        match self {
            Pane::Agents => Pane::Sessions,
            Pane::Sessions => Pane::Agents,
        }
    }
}

/// Read-only view of where the selection stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase<'a> {
    Empty,
    AgentSelected(AgentKind),
    SessionSelected(AgentKind, &'a Session),
}

/// Current agent and session plus the cursors of both sidebar lists.
///
/// Every transition takes the snapshot it should read from; the selection
/// never owns catalog data beyond the session list of the current agent.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current_agent: Option<AgentKind>,
    current_session: Option<Session>,
    sessions: Vec<Session>,
    agent_cursor: usize,
    session_cursor: usize,
}

impl SelectionState {
    pub fn current_agent(&self) -> Option<AgentKind> {
        self.current_agent
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current_session.as_ref()
    }

    /// Sessions of the current agent, as shown in the session list.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn agent_cursor(&self) -> usize {
        self.agent_cursor
    }

    pub fn session_cursor(&self) -> usize {
        self.session_cursor
    }

    /// Row of the current agent in `snapshot`; `None` once a refresh dropped it.
    pub fn highlighted_agent(&self, snapshot: &CatalogSnapshot) -> Option<usize> {
        let agent = self.current_agent?;
        snapshot
            .agents()
            .get(self.agent_cursor)
            .filter(|aggregate| aggregate.agent() == agent)
            .map(|_| self.agent_cursor)
    }

    /// Row of the current session; `None` once a refresh dropped it.
    pub fn highlighted_session(&self) -> Option<usize> {
        let current = self.current_session.as_ref()?;
        self.sessions
            .get(self.session_cursor)
            .filter(|session| session.source_path == current.source_path)
            .map(|_| self.session_cursor)
    }

    pub fn phase(&self) -> SelectionPhase<'_> {
        match (self.current_agent, self.current_session.as_ref()) {
            (None, _) => SelectionPhase::Empty,
            (Some(agent), None) => SelectionPhase::AgentSelected(agent),
            (Some(agent), Some(session)) => SelectionPhase::SessionSelected(agent, session),
        }
    }

    /// Selects `agent` and cascades to its most recent session.
    ///
    /// Returns false (and changes nothing) when `agent` is already selected.
    pub fn select_agent(&mut self, snapshot: &CatalogSnapshot, agent: AgentKind) -> bool {
        if self.current_agent == Some(agent) {
            return false;
        }
        self.current_agent = Some(agent);
        self.sync_agent_cursor(snapshot);
        self.sessions = sessions_of(snapshot, agent);
        self.current_session = self.sessions.first().cloned();
        self.session_cursor = 0;
        true
    }

    /// Selects `session` directly; no cascade.
    pub fn select_session(&mut self, session: Session) {
        if let Some(index) = self.position_of(&session.source_path) {
            self.session_cursor = index;
        }
        self.current_session = Some(session);
    }

    /// Reconciles the selection with a freshly published snapshot.
    ///
    /// With nothing selected the most active agent is picked. Otherwise the
    /// selection is kept and only the session list is rebuilt.
    pub fn on_snapshot_published(&mut self, snapshot: &CatalogSnapshot) {
        let Some(agent) = self.current_agent else {
            if let Some(first) = snapshot.first_agent() {
                self.select_agent(snapshot, first);
            }
            return;
        };

        self.sync_agent_cursor(snapshot);
        self.sessions = sessions_of(snapshot, agent);
        let followed = self
            .current_session
            .as_ref()
            .and_then(|session| self.position_of(&session.source_path));
        self.session_cursor = followed.unwrap_or(0);
    }

    /// Moves the agent cursor by `delta` and selects the agent under it.
    pub fn move_agent(&mut self, snapshot: &CatalogSnapshot, delta: isize) -> bool {
        let agents = snapshot.agents();
        if agents.is_empty() {
            return false;
        }
        let index = step(self.agent_cursor, delta, agents.len());
        self.agent_cursor = index;
        self.select_agent(snapshot, agents[index].agent())
    }

    /// Moves the session cursor by `delta` and selects the session under it.
    pub fn move_session(&mut self, delta: isize) -> bool {
        if self.sessions.is_empty() {
            return false;
        }
        let index = step(self.session_cursor, delta, self.sessions.len());
        let target = self.sessions[index].clone();
        let changed = self
            .current_session
            .as_ref()
            .is_none_or(|current| current.source_path != target.source_path);
        self.select_session(target);
        changed
    }

    fn sync_agent_cursor(&mut self, snapshot: &CatalogSnapshot) {
        let position = self.current_agent.and_then(|agent| {
            snapshot
                .agents()
                .iter()
                .position(|aggregate| aggregate.agent() == agent)
        });
        self.agent_cursor = match position {
            Some(index) => index,
            None => self
                .agent_cursor
                .min(snapshot.agent_count().saturating_sub(1)),
        };
    }

    fn position_of(&self, source_path: &str) -> Option<usize> {
        self.sessions
            .iter()
            .position(|session| session.source_path == source_path)
    }
}

fn sessions_of(snapshot: &CatalogSnapshot, agent: AgentKind) -> Vec<Session> {
    snapshot
        .get(agent)
        .map(|aggregate| aggregate.sessions().to_vec())
        .unwrap_or_default()
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    let max = len.saturating_sub(1);
    current.saturating_add_signed(delta).min(max)
}
