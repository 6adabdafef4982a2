//! Full-screen session browser for cassview.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use cassview_core::catalog::SessionCatalog;
use cassview_core::config::Config;
pub use runtime::TuiRuntime;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::state::AppState;

/// Runs the dashboard until the user quits.
///
/// Blocks the calling thread. Must be called from inside a multi-threaded
/// tokio runtime, which carries the background queries.
///
/// # Errors
/// Returns an error if stdout is not a terminal or the terminal fails.
pub fn run_dashboard(config: &Config, catalog: SessionCatalog, workspace: PathBuf) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The dashboard requires a terminal.\n\
             Use `cassview sessions` for plain output."
        );
    }
    let handle = Handle::try_current().context("The dashboard requires a tokio runtime")?;
    if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
        anyhow::bail!("The dashboard requires a multi-threaded tokio runtime");
    }

    tracing::info!(workspace = %workspace.display(), "starting dashboard");
    let state = AppState::new(catalog, workspace, config.notification_duration());
    let mut runtime = TuiRuntime::new(state)?;
    let result = runtime.run();
    drop(runtime);
    tracing::info!("dashboard closed");
    result
}
