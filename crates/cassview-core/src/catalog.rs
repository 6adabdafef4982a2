//! The agent catalog: every known agent's sessions, most active first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{Map, Value};

use crate::agent::AgentKind;
use crate::backend::BackendError;
use crate::query::SessionQueryClient;
use crate::session::AgentSessions;

/// Result of one full refresh: non-empty aggregates ordered by session count
/// (descending), ties in [`AgentKind::ALL`] order.
///
/// Immutable and cheap to clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    agents: Arc<[AgentSessions]>,
}

impl CatalogSnapshot {
    pub fn from_aggregates(aggregates: impl IntoIterator<Item = AgentSessions>) -> Self {
        let mut agents: Vec<AgentSessions> = aggregates
            .into_iter()
            .filter(|aggregate| !aggregate.is_empty())
            .collect();
        agents.sort_by(|a, b| {
            b.count()
                .cmp(&a.count())
                .then_with(|| a.agent().ordinal().cmp(&b.agent().ordinal()))
        });
        Self {
            agents: agents.into(),
        }
    }

    pub fn agents(&self) -> &[AgentSessions] {
        &self.agents
    }

    pub fn get(&self, agent: AgentKind) -> Option<&AgentSessions> {
        self.agents.iter().find(|aggregate| aggregate.agent() == agent)
    }

    /// The agent with the most sessions.
    pub fn first_agent(&self) -> Option<AgentKind> {
        self.agents.first().map(AgentSessions::agent)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn session_count(&self) -> usize {
        self.agents.iter().map(AgentSessions::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Fans out per-agent queries and caches the assembled snapshot.
///
/// The cache never expires on its own; call [`SessionCatalog::invalidate`]
/// to force the next [`SessionCatalog::refresh_all`] to re-query.
#[derive(Debug, Clone)]
pub struct SessionCatalog {
    client: SessionQueryClient,
    workspace: Option<PathBuf>,
    cache: Option<CatalogSnapshot>,
}

impl SessionCatalog {
    /// `workspace` scopes every query to one project directory.
    pub fn new(client: SessionQueryClient, workspace: Option<PathBuf>) -> Self {
        Self {
            client,
            workspace,
            cache: None,
        }
    }

    pub fn client(&self) -> &SessionQueryClient {
        &self.client
    }

    pub fn workspace_filter(&self) -> Option<&Path> {
        self.workspace.as_deref()
    }

    /// Returns the cached snapshot, querying every agent when there is none.
    pub async fn refresh_all(&mut self) -> CatalogSnapshot {
        if let Some(snapshot) = &self.cache {
            return snapshot.clone();
        }
        let snapshot = self.query_all().await;
        self.cache = Some(snapshot.clone());
        snapshot
    }

    /// Queries every known agent concurrently, bypassing the cache.
    ///
    /// Each agent's sessions land in their own slot; the snapshot is only
    /// built once all queries have finished.
    pub async fn query_all(&self) -> CatalogSnapshot {
        let client = &self.client;
        let workspace = self.workspace.as_deref();
        let slots = join_all(AgentKind::ALL.map(|agent| async move {
            AgentSessions::new(agent, client.query_agent(agent, workspace).await)
        }))
        .await;

        let snapshot = CatalogSnapshot::from_aggregates(slots);
        tracing::info!(
            agents = snapshot.agent_count(),
            sessions = snapshot.session_count(),
            "catalog refreshed"
        );
        snapshot
    }

    /// Drops the cached snapshot.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Replaces the cache with a snapshot assembled elsewhere.
    pub fn publish(&mut self, snapshot: CatalogSnapshot) {
        self.cache = Some(snapshot);
    }

    pub fn cached(&self) -> Option<&CatalogSnapshot> {
        self.cache.as_ref()
    }

    /// Index summary as an opaque map; empty on any failure.
    pub async fn stats(&self) -> Map<String, Value> {
        let body = match self.client.backend().stats().await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "stats query failed");
                return Map::new();
            }
        };
        match serde_json::from_str(&body) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("stats response is not a JSON object");
                Map::new()
            }
            Err(error) => {
                tracing::warn!(%error, "malformed stats response");
                Map::new()
            }
        }
    }

    /// Rebuilds the index. Does not touch the cache.
    pub async fn reindex(&self) -> Result<(), BackendError> {
        self.client.backend().reindex().await
    }

    /// Renders a session as markdown.
    pub async fn export(&self, source_path: &str) -> Result<String, BackendError> {
        self.client
            .backend()
            .export(source_path.to_string())
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::IndexBackend;
    use crate::backend::fake::{FakeBackend, FakeResponse};

    fn catalog(backend: Arc<FakeBackend>) -> SessionCatalog {
        SessionCatalog::new(SessionQueryClient::new(backend), None)
    }

    fn order(snapshot: &CatalogSnapshot) -> Vec<(AgentKind, usize)> {
        snapshot
            .agents()
            .iter()
            .map(|a| (a.agent(), a.count()))
            .collect()
    }

    #[tokio::test]
    async fn test_snapshot_sorted_by_count() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_paths(AgentKind::Codex, &["/c1", "/c2", "/c3"])
                .with_paths(AgentKind::Aider, &["/a1", "/a2", "/a3", "/a4", "/a5"]),
        );
        let snapshot = catalog(backend).query_all().await;

        assert_eq!(
            order(&snapshot),
            [(AgentKind::Aider, 5), (AgentKind::Codex, 3)]
        );
        assert_eq!(snapshot.first_agent(), Some(AgentKind::Aider));
        assert_eq!(snapshot.session_count(), 8);
    }

    #[tokio::test]
    async fn test_ties_follow_enumeration_order() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_paths(AgentKind::PiAgent, &["/p1", "/p2", "/p3"])
                .with_paths(AgentKind::Cursor, &["/c1", "/c2", "/c3"])
                .with_paths(AgentKind::ClaudeCode, &["/x1", "/x2", "/x3"]),
        );
        let snapshot = catalog(backend).query_all().await;

        let agents: Vec<_> = snapshot.agents().iter().map(AgentSessions::agent).collect();
        assert_eq!(
            agents,
            [AgentKind::ClaudeCode, AgentKind::Cursor, AgentKind::PiAgent]
        );
    }

    #[tokio::test]
    async fn test_agents_without_sessions_are_omitted() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_paths(AgentKind::Gemini, &["/g"])
                .with_search(AgentKind::Codex, FakeResponse::Timeout),
        );
        let snapshot = catalog(backend.clone()).query_all().await;

        assert_eq!(order(&snapshot), [(AgentKind::Gemini, 1)]);
        assert!(snapshot.get(AgentKind::Codex).is_none());
        assert_eq!(backend.search_calls(), AgentKind::ALL.len());
    }

    #[tokio::test]
    async fn test_dedup_scenario() {
        let backend = Arc::new(FakeBackend::new().with_search(
            AgentKind::Codex,
            FakeResponse::json(&json!({
                "hits": [
                    {"source_path": "/a", "created_at": 1000},
                    {"source_path": "/a", "created_at": 2000},
                    {"source_path": "/b"},
                ]
            })),
        ));
        let snapshot = catalog(backend).query_all().await;

        assert_eq!(snapshot.agent_count(), 1);
        let codex = snapshot.get(AgentKind::Codex).unwrap();
        let paths: Vec<_> = codex
            .sessions()
            .iter()
            .map(|s| s.source_path.as_str())
            .collect();
        assert_eq!(paths, ["/a", "/b"]);
        assert_eq!(
            codex.sessions()[0].started_at.map(|t| t.timestamp_millis()),
            Some(1000)
        );
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_paths(AgentKind::Amp, &["/1", "/2"])
                .with_paths(AgentKind::Cline, &["/3"]),
        );
        let catalog = catalog(backend);

        let first = catalog.query_all().await;
        let second = catalog.query_all().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_refresh_all_uses_cache_until_invalidated() {
        let backend = Arc::new(FakeBackend::new().with_paths(AgentKind::Codex, &["/a"]));
        let mut catalog = catalog(backend.clone());

        let first = catalog.refresh_all().await;
        assert_eq!(backend.search_calls(), AgentKind::ALL.len());

        backend.set_search(
            AgentKind::Codex,
            FakeResponse::json(&json!({"hits": [{"source_path": "/a"}, {"source_path": "/b"}]})),
        );
        let cached = catalog.refresh_all().await;
        assert_eq!(cached, first);
        assert_eq!(backend.search_calls(), AgentKind::ALL.len());

        catalog.invalidate();
        assert!(catalog.cached().is_none());
        let fresh = catalog.refresh_all().await;
        assert_eq!(backend.search_calls(), 2 * AgentKind::ALL.len());
        assert_eq!(fresh.session_count(), 2);
        assert_eq!(catalog.cached(), Some(&fresh));
    }

    #[tokio::test]
    async fn test_workspace_filter_is_forwarded() {
        let backend = Arc::new(FakeBackend::new());
        let catalog = SessionCatalog::new(
            SessionQueryClient::new(backend.clone()),
            Some(PathBuf::from("/work/app")),
        );
        catalog.query_all().await;

        assert!(
            backend
                .requests()
                .iter()
                .all(|r| r.workspace.as_deref() == Some(Path::new("/work/app")))
        );
    }

    #[tokio::test]
    async fn test_stats_pass_through_and_failures() {
        let ok = Arc::new(
            FakeBackend::new().with_stats(FakeResponse::json(&json!({"conversations": 12}))),
        );
        let stats = catalog(ok).stats().await;
        assert_eq!(stats.get("conversations"), Some(&json!(12)));

        for response in [
            FakeResponse::Timeout,
            FakeResponse::Missing,
            FakeResponse::Body("[1, 2]".to_string()),
            FakeResponse::Body("nope".to_string()),
        ] {
            let backend = Arc::new(FakeBackend::new().with_stats(response));
            assert!(catalog(backend).stats().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_reindex_leaves_cache_alone() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_paths(AgentKind::Codex, &["/a"])
                .with_reindex(FakeResponse::Failed {
                    code: 3,
                    stderr: "locked".to_string(),
                }),
        );
        let mut catalog = catalog(backend.clone());
        let snapshot = catalog.refresh_all().await;

        assert!(catalog.reindex().await.is_err());
        assert_eq!(catalog.cached(), Some(&snapshot));
        assert!(backend.stats().await.is_ok());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = CatalogSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.first_agent(), None);
        assert_eq!(snapshot.session_count(), 0);
    }
}
