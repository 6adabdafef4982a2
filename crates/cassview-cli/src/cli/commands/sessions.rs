//! Plain-text session listing.

use anyhow::Result;
use cassview_core::agent::AgentKind;
use cassview_core::catalog::SessionCatalog;
use cassview_core::session::{AgentSessions, Session};
use cassview_tui::common::format_age;

pub async fn list(catalog: &SessionCatalog, agent: Option<AgentKind>) -> Result<()> {
    let groups = match agent {
        Some(agent) => {
            let sessions = catalog
                .client()
                .query_agent(agent, catalog.workspace_filter())
                .await;
            vec![AgentSessions::new(agent, sessions)]
        }
        None => catalog.query_all().await.agents().to_vec(),
    };

    let groups: Vec<_> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    if groups.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{} ({})", group.agent(), group.count());
        for session in group.sessions() {
            println!("{}", session_line(session));
        }
    }
    Ok(())
}

fn session_line(session: &Session) -> String {
    format!(
        "  {:>4}  {}  {}",
        format_age(session.age_seconds()),
        session.display_name(),
        session.source_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_line_without_timestamp() {
        let session = Session {
            source_path: "/s/rollout.jsonl".to_string(),
            agent: AgentKind::Codex,
            workspace: None,
            title: None,
            started_at: None,
            message_count: 1,
        };
        assert_eq!(
            session_line(&session),
            "     ?  rollout.jsonl  /s/rollout.jsonl"
        );
    }
}
