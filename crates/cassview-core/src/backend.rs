//! Access to the external cass index.
//!
//! Every call is one subprocess invocation bounded by a timeout. Callers get
//! raw stdout back; decoding lives in [`crate::query`] and [`crate::catalog`].

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use crate::agent::AgentKind;
use crate::config::Config;

/// Future returned by [`IndexBackend`] calls.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

/// Why a backend call produced no usable output.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{bin} command not found")]
    NotFound { bin: String },
    #[error("failed to run {bin}: {source}")]
    Io {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out after {}s", .timeout.as_secs())]
    Timeout { timeout: Duration },
    #[error("exited with status {}: {stderr}", status_label(.code))]
    Failed { code: Option<i32>, stderr: String },
}

fn status_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |code| code.to_string())
}

/// Parameters of one `cass search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub agent: Option<AgentKind>,
    pub workspace: Option<PathBuf>,
    pub limit: usize,
}

impl SearchRequest {
    /// Command-line arguments for the cass CLI.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["search".to_string(), self.query.clone()];
        if let Some(agent) = self.agent {
            args.push("--agent".to_string());
            args.push(agent.as_str().to_string());
        }
        args.push("--limit".to_string());
        args.push(self.limit.to_string());
        if let Some(workspace) = &self.workspace {
            args.push("--workspace".to_string());
            args.push(workspace.display().to_string());
        }
        args.push("--json".to_string());
        args
    }
}

/// The query contract of the external index.
pub trait IndexBackend: Send + Sync {
    /// Runs a search and returns the raw JSON body.
    fn search(&self, request: SearchRequest) -> BackendFuture<'_, String>;

    /// Returns the raw JSON body of the index summary.
    fn stats(&self) -> BackendFuture<'_, String>;

    /// Rebuilds the whole index.
    fn reindex(&self) -> BackendFuture<'_, ()>;

    /// Renders one session as markdown.
    fn export(&self, source_path: String) -> BackendFuture<'_, String>;
}

/// [`IndexBackend`] backed by the `cass` binary.
#[derive(Debug, Clone)]
pub struct CassCli {
    bin: String,
    search_timeout: Duration,
    reindex_timeout: Duration,
    export_timeout: Duration,
}

impl CassCli {
    pub const DEFAULT_BIN: &str = "cass";
    pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
    pub const REINDEX_TIMEOUT: Duration = Duration::from_secs(300);
    pub const EXPORT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            search_timeout: Self::SEARCH_TIMEOUT,
            reindex_timeout: Self::REINDEX_TIMEOUT,
            export_timeout: Self::EXPORT_TIMEOUT,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            bin: config.cass_bin.clone(),
            search_timeout: config.search_timeout(),
            reindex_timeout: config.reindex_timeout(),
            export_timeout: config.export_timeout(),
        }
    }

    async fn run(&self, args: Vec<String>, timeout: Duration) -> Result<String, BackendError> {
        tracing::debug!(bin = %self.bin, ?args, "running cass");
        let child = tokio::process::Command::new(&self.bin)
            .args(&args)
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    BackendError::NotFound {
                        bin: self.bin.clone(),
                    }
                } else {
                    BackendError::Io {
                        bin: self.bin.clone(),
                        source,
                    }
                }
            })?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_elapsed| BackendError::Timeout { timeout })?
            .map_err(|source| BackendError::Io {
                bin: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BackendError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for CassCli {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BIN)
    }
}

impl IndexBackend for CassCli {
    fn search(&self, request: SearchRequest) -> BackendFuture<'_, String> {
        Box::pin(self.run(request.args(), self.search_timeout))
    }

    fn stats(&self) -> BackendFuture<'_, String> {
        let args = vec!["stats".to_string(), "--json".to_string()];
        Box::pin(self.run(args, self.search_timeout))
    }

    fn reindex(&self) -> BackendFuture<'_, ()> {
        let args = vec!["index".to_string(), "--full".to_string()];
        Box::pin(async move {
            self.run(args, self.reindex_timeout).await?;
            Ok(())
        })
    }

    fn export(&self, source_path: String) -> BackendFuture<'_, String> {
        let args = vec![
            "export".to_string(),
            source_path,
            "--format".to_string(),
            "markdown".to_string(),
        ];
        Box::pin(self.run(args, self.export_timeout))
    }
}

/// In-memory backend for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    use super::{BackendError, BackendFuture, IndexBackend, SearchRequest};
    use crate::agent::AgentKind;

    /// Canned outcome of a fake call.
    #[derive(Debug, Clone)]
    pub enum FakeResponse {
        Body(String),
        Failed { code: i32, stderr: String },
        Timeout,
        Missing,
    }

    impl FakeResponse {
        pub fn json(value: &serde_json::Value) -> Self {
            FakeResponse::Body(value.to_string())
        }

        fn into_result(self) -> Result<String, BackendError> {
            match self {
                FakeResponse::Body(body) => Ok(body),
                FakeResponse::Failed { code, stderr } => Err(BackendError::Failed {
                    code: Some(code),
                    stderr,
                }),
                FakeResponse::Timeout => Err(BackendError::Timeout {
                    timeout: Duration::from_secs(30),
                }),
                FakeResponse::Missing => Err(BackendError::NotFound {
                    bin: "cass".to_string(),
                }),
            }
        }
    }

    /// Backend answering from per-agent canned responses.
    ///
    /// Agents without a response get an empty hit list.
    #[derive(Debug)]
    pub struct FakeBackend {
        searches: Mutex<HashMap<AgentKind, FakeResponse>>,
        stats: FakeResponse,
        reindex: FakeResponse,
        export: FakeResponse,
        search_calls: AtomicUsize,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self {
                searches: Mutex::new(HashMap::new()),
                stats: FakeResponse::Body("{}".to_string()),
                reindex: FakeResponse::Body(String::new()),
                export: FakeResponse::Body(String::new()),
                search_calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_search(self, agent: AgentKind, response: FakeResponse) -> Self {
            self.set_search(agent, response);
            self
        }

        /// Answers `agent` searches with `paths` as hits, in order.
        #[must_use]
        pub fn with_paths(self, agent: AgentKind, paths: &[&str]) -> Self {
            let hits: Vec<_> = paths
                .iter()
                .map(|path| serde_json::json!({ "source_path": path }))
                .collect();
            self.with_search(
                agent,
                FakeResponse::json(&serde_json::json!({ "hits": hits })),
            )
        }

        #[must_use]
        pub fn with_stats(mut self, response: FakeResponse) -> Self {
            self.stats = response;
            self
        }

        #[must_use]
        pub fn with_reindex(mut self, response: FakeResponse) -> Self {
            self.reindex = response;
            self
        }

        #[must_use]
        pub fn with_export(mut self, response: FakeResponse) -> Self {
            self.export = response;
            self
        }

        /// Replaces the response for `agent` (simulates changed index data).
        pub fn set_search(&self, agent: AgentKind, response: FakeResponse) {
            self.searches
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(agent, response);
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<SearchRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl IndexBackend for FakeBackend {
        fn search(&self, request: SearchRequest) -> BackendFuture<'_, String> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            let response = request.agent.and_then(|agent| {
                self.searches
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(&agent)
                    .cloned()
            });
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);
            let response =
                response.unwrap_or_else(|| FakeResponse::Body(r#"{"hits":[]}"#.to_string()));
            Box::pin(async move { response.into_result() })
        }

        fn stats(&self) -> BackendFuture<'_, String> {
            let response = self.stats.clone();
            Box::pin(async move { response.into_result() })
        }

        fn reindex(&self) -> BackendFuture<'_, ()> {
            let response = self.reindex.clone();
            Box::pin(async move { response.into_result().map(|_| ()) })
        }

        fn export(&self, _source_path: String) -> BackendFuture<'_, String> {
            let response = self.export.clone();
            Box::pin(async move { response.into_result() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args_match_cli_contract() {
        let request = SearchRequest {
            query: String::new(),
            agent: Some(AgentKind::ClaudeCode),
            workspace: None,
            limit: 100,
        };
        assert_eq!(
            request.args(),
            ["search", "", "--agent", "claude_code", "--limit", "100", "--json"]
        );
    }

    #[test]
    fn test_search_args_include_workspace() {
        let request = SearchRequest {
            query: String::new(),
            agent: Some(AgentKind::Codex),
            workspace: Some(PathBuf::from("/work/app")),
            limit: 5,
        };
        let args = request.args();
        assert_eq!(&args[args.len() - 3..], ["--workspace", "/work/app", "--json"]);
    }

    #[test]
    fn test_failed_error_message() {
        let err = BackendError::Failed {
            code: Some(2),
            stderr: "index locked".to_string(),
        };
        assert_eq!(err.to_string(), "exited with status 2: index locked");
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_found() {
        let cli = CassCli::new("cassview-test-definitely-missing-binary");
        let err = cli.stats().await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let cli = CassCli::new("false");
        let err = cli.reindex().await.unwrap_err();
        assert!(matches!(err, BackendError::Failed { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned() {
        // `echo stats --json` prints its arguments back.
        let cli = CassCli::new("echo");
        let body = cli.stats().await.unwrap();
        assert_eq!(body.trim(), "stats --json");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_command_times_out() {
        let cli = CassCli {
            bin: "sh".to_string(),
            search_timeout: Duration::from_millis(100),
            reindex_timeout: Duration::from_millis(100),
            export_timeout: Duration::from_millis(100),
        };
        let err = cli
            .run(
                vec!["-c".to_string(), "sleep 5".to_string()],
                cli.search_timeout,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Timeout { .. }));
    }
}
