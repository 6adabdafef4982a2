//! Showing a session transcript while the TUI is suspended.

use std::io::{self, BufRead, ErrorKind, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use cassview_core::backend::BackendError;
use cassview_core::catalog::SessionCatalog;

/// Pagers tried in order; the first one that exists wins.
pub const PAGERS: &[(&str, &[&str])] = &[("glow", &["-p"]), ("less", &["-R"])];

const CONTINUE_PROMPT: &str = "Press Enter to continue...";

/// Exports `source_path` as markdown and pages it.
///
/// Must run on a multi-threaded runtime with the terminal suspended; blocks
/// until the user leaves the pager.
///
/// # Errors
/// Returns an error only if the terminal itself cannot be read or written.
pub fn open_session(catalog: &SessionCatalog, source_path: &str) -> Result<()> {
    let handle = tokio::runtime::Handle::current();
    let exported = tokio::task::block_in_place(|| handle.block_on(catalog.export(source_path)));

    let markdown = match exported {
        Ok(markdown) => markdown,
        Err(error) => {
            tracing::warn!(source_path, %error, "session export failed");
            let message = match &error {
                BackendError::Timeout { .. } => "Export timed out".to_string(),
                BackendError::NotFound { bin } => format!("{bin} command not found"),
                BackendError::Failed { stderr, .. } => {
                    format!("Error exporting session: {stderr}")
                }
                BackendError::Io { .. } => format!("Error exporting session: {error}"),
            };
            println!("{message}");
            return wait_for_enter(CONTINUE_PROMPT);
        }
    };

    if !page_with(PAGERS, &markdown)? {
        println!("{markdown}");
        return wait_for_enter(&format!("\n{CONTINUE_PROMPT}"));
    }
    Ok(())
}

/// Pipes `text` into the first available pager. Returns false if none exists.
///
/// # Errors
/// Returns an error if a pager starts but cannot be waited on.
pub fn page_with(pagers: &[(&str, &[&str])], text: &str) -> Result<bool> {
    for (program, args) in pagers {
        let mut child = match Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(error) if error.kind() == ErrorKind::NotFound => continue,
            Err(error) => {
                tracing::warn!(program, %error, "failed to start pager");
                continue;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            // The user may quit the pager before reading everything.
            if let Err(error) = stdin.write_all(text.as_bytes())
                && error.kind() != ErrorKind::BrokenPipe
            {
                tracing::warn!(program, %error, "failed to write to pager");
            }
        }
        child
            .wait()
            .with_context(|| format!("Failed to wait for {program}"))?;
        return Ok(true);
    }
    Ok(false)
}

fn wait_for_enter(prompt: &str) -> Result<()> {
    print!("{prompt}");
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_falls_back_to_next_pager() {
        let pagers: &[(&str, &[&str])] = &[
            ("cassview-test-missing-pager", &[]),
            ("sh", &["-c", "cat > /dev/null"]),
        ];
        assert!(page_with(pagers, "# Session\n").unwrap());
    }

    #[test]
    fn test_reports_when_no_pager_exists() {
        let pagers: &[(&str, &[&str])] = &[("cassview-test-missing-pager", &[])];
        assert!(!page_with(pagers, "text").unwrap());
    }

    #[test]
    fn test_pager_quitting_early_is_not_an_error() {
        let pagers: &[(&str, &[&str])] = &[("true", &[])];
        let long = "line\n".repeat(100_000);
        assert!(page_with(pagers, &long).unwrap());
    }
}
