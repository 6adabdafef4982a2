//! Dashboard command handler.

use std::path::PathBuf;

use anyhow::Result;
use cassview_core::catalog::SessionCatalog;
use cassview_core::config::Config;

pub fn run(config: &Config, catalog: SessionCatalog, workspace: PathBuf) -> Result<()> {
    cassview_tui::run_dashboard(config, catalog, workspace)
}
