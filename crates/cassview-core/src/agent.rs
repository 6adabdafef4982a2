//! Known coding agents indexed by cass.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A coding agent whose sessions the index can hold.
///
/// The declaration order is significant: catalog ties are broken by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    ClaudeCode,
    Codex,
    Cursor,
    Gemini,
    Opencode,
    Amp,
    Cline,
    Aider,
    Chatgpt,
    PiAgent,
}

impl AgentKind {
    /// Every known agent, in catalog tie-break order.
    pub const ALL: [AgentKind; 10] = [
        AgentKind::ClaudeCode,
        AgentKind::Codex,
        AgentKind::Cursor,
        AgentKind::Gemini,
        AgentKind::Opencode,
        AgentKind::Amp,
        AgentKind::Cline,
        AgentKind::Aider,
        AgentKind::Chatgpt,
        AgentKind::PiAgent,
    ];

    /// Returns the identifier used by the cass CLI (`--agent <id>`).
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::ClaudeCode => "claude_code",
            AgentKind::Codex => "codex",
            AgentKind::Cursor => "cursor",
            AgentKind::Gemini => "gemini",
            AgentKind::Opencode => "opencode",
            AgentKind::Amp => "amp",
            AgentKind::Cline => "cline",
            AgentKind::Aider => "aider",
            AgentKind::Chatgpt => "chatgpt",
            AgentKind::PiAgent => "pi_agent",
        }
    }

    /// Position in [`AgentKind::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an identifier that is not a known agent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown agent '{0}'")]
pub struct UnknownAgent(pub String);

impl FromStr for AgentKind {
    type Err = UnknownAgent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|agent| agent.as_str() == s)
            .ok_or_else(|| UnknownAgent(s.to_string()))
    }
}
