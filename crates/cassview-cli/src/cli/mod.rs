//! CLI entry and dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cassview_core::agent::AgentKind;
use cassview_core::backend::CassCli;
use cassview_core::catalog::SessionCatalog;
use cassview_core::config::{self, Config};
use cassview_core::logging;
use cassview_core::query::SessionQueryClient;
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "cassview")]
#[command(version)]
#[command(about = "Browse coding-agent sessions indexed by cass")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project directory to browse (default: current directory)
    #[arg(value_name = "WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path or name of the cass binary
    #[arg(long, value_name = "BIN", global = true)]
    cass: Option<String>,

    /// Only show sessions recorded in the workspace
    #[arg(long, global = true)]
    only_workspace: bool,

    /// Maximum sessions fetched per agent
    #[arg(long, value_name = "N", global = true)]
    limit: Option<usize>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print sessions grouped by agent
    Sessions {
        /// Only list sessions of this agent (e.g. codex, claude_code)
        #[arg(long, value_name = "AGENT")]
        agent: Option<AgentKind>,
    },
    /// Print index statistics as JSON
    Stats,
    /// Rebuild the cass index from scratch
    Reindex,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the config file is broken.
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let mut config = Config::load().context("load config")?;
    if let Some(bin) = &cli.cass {
        config.cass_bin.clone_from(bin);
    }
    if let Some(limit) = cli.limit {
        config.search_limit = limit;
    }
    if cli.only_workspace {
        config.filter_by_workspace = true;
    }

    let _log_guard = match logging::init(&config::paths::logs_dir(), &config.log_filter) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    let workspace = resolve_workspace(cli.workspace)?;
    tracing::debug!(workspace = %workspace.display(), bin = %config.cass_bin, "cassview starting");

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli.command, &config, workspace).await })
}

async fn dispatch(command: Option<Commands>, config: &Config, workspace: PathBuf) -> Result<()> {
    let catalog = build_catalog(config, &workspace);

    // default to the dashboard
    let Some(command) = command else {
        return commands::dashboard::run(config, catalog, workspace);
    };

    match command {
        Commands::Sessions { agent } => commands::sessions::list(&catalog, agent).await,
        Commands::Stats => commands::index::stats(&catalog).await,
        Commands::Reindex => commands::index::reindex(config, &catalog).await,
        Commands::Config { .. } => Ok(()),
    }
}

fn resolve_workspace(arg: Option<PathBuf>) -> Result<PathBuf> {
    let path = match arg {
        Some(path) => path,
        None => std::env::current_dir().context("read current directory")?,
    };
    if !path.exists() {
        anyhow::bail!("Workspace not found: {}", path.display());
    }
    std::fs::canonicalize(&path).with_context(|| format!("resolve workspace {}", path.display()))
}

fn build_catalog(config: &Config, workspace: &Path) -> SessionCatalog {
    let backend = Arc::new(CassCli::from_config(config));
    let client = SessionQueryClient::new(backend).with_limit(config.search_limit);
    let filter = config.filter_by_workspace.then(|| workspace.to_path_buf());
    SessionCatalog::new(client, filter)
}
