//! Per-agent session queries against the index.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::agent::AgentKind;
use crate::backend::{BackendError, IndexBackend, SearchRequest};
use crate::session::{Session, dedup_by_path, sort_by_recency};

/// Hits requested per agent.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Why a query yielded no sessions.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("search response is not a JSON object")]
    NotAnObject,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHit {
    source_path: Option<String>,
    workspace: Option<String>,
    title: Option<String>,
    created_at: Option<Value>,
    agent: Option<String>,
}

/// Issues one search per agent and turns hits into [`Session`]s.
#[derive(Clone)]
pub struct SessionQueryClient {
    backend: Arc<dyn IndexBackend>,
    limit: usize,
}

impl std::fmt::Debug for SessionQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionQueryClient")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl SessionQueryClient {
    pub fn new(backend: Arc<dyn IndexBackend>) -> Self {
        Self {
            backend,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn backend(&self) -> &Arc<dyn IndexBackend> {
        &self.backend
    }

    /// Sessions of `agent`, newest first. Any failure yields an empty list.
    pub async fn query_agent(&self, agent: AgentKind, workspace: Option<&Path>) -> Vec<Session> {
        match self.try_query_agent(agent, workspace).await {
            Ok(sessions) => sessions,
            Err(error) => {
                tracing::warn!(%agent, %error, "session query failed");
                Vec::new()
            }
        }
    }

    /// Like [`SessionQueryClient::query_agent`], keeping the failure reason.
    pub async fn try_query_agent(
        &self,
        agent: AgentKind,
        workspace: Option<&Path>,
    ) -> Result<Vec<Session>, QueryError> {
        let request = SearchRequest {
            query: String::new(),
            agent: Some(agent),
            workspace: workspace.map(Path::to_path_buf),
            limit: self.limit,
        };
        let body = self.backend.search(request).await?;
        let sessions = parse_hits(agent, &body)?;
        tracing::debug!(%agent, count = sessions.len(), "sessions loaded");
        Ok(sessions)
    }
}

/// Decodes a search body into deduplicated sessions, newest first.
pub fn parse_hits(agent: AgentKind, body: &str) -> Result<Vec<Session>, QueryError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(QueryError::NotAnObject);
    }
    let response: SearchResponse = serde_json::from_value(value)?;

    let sessions = response
        .hits
        .into_iter()
        .filter_map(|hit| session_from_hit(agent, hit))
        .collect();
    let mut sessions = dedup_by_path(sessions);
    sort_by_recency(&mut sessions);
    Ok(sessions)
}

fn session_from_hit(agent: AgentKind, hit: Value) -> Option<Session> {
    let hit: RawHit = match serde_json::from_value(hit) {
        Ok(hit) => hit,
        Err(error) => {
            tracing::debug!(%agent, %error, "skipping malformed hit");
            return None;
        }
    };

    if let Some(reported) = hit.agent.as_deref()
        && reported.parse::<AgentKind>().ok() != Some(agent)
    {
        tracing::debug!(%agent, reported, "skipping hit for another agent");
        return None;
    }

    Some(Session {
        source_path: hit.source_path.unwrap_or_default(),
        agent,
        workspace: hit.workspace,
        title: hit.title,
        started_at: hit.created_at.as_ref().and_then(parse_timestamp),
        message_count: 1,
    })
}

/// Reads a hit timestamp: epoch milliseconds or an ISO-8601 string.
///
/// Zero, empty strings and anything unparseable yield `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(0) | None => None,
            Some(millis) => DateTime::from_timestamp_millis(millis),
        },
        Value::String(text) if !text.is_empty() => parse_iso8601(text),
        _ => None,
    }
}

fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.to_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
