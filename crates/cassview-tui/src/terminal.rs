//! Terminal lifecycle management.
//!
//! Terminal state is restored on:
//! - Normal exit (via Drop on the runtime)
//! - Panic
//! - Suspension while a pager owns the screen

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enables raw mode, enters the alternate screen and creates the terminal.
///
/// Call `install_panic_hook()` before this to ensure terminal restore on panic.
///
/// # Errors
/// Returns an error if the terminal cannot be configured.
pub fn setup_terminal() -> Result<Tui> {
    enter().context("Failed to prepare terminal")?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

fn enter() -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Ok(())
}

/// Leaves the alternate screen and disables raw mode.
///
/// Idempotent; safe to call multiple times.
///
/// # Errors
/// Returns an error if the terminal cannot be restored.
pub fn restore_terminal() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Hands the terminal back to the shell so a child process can use it.
///
/// # Errors
/// Returns an error if the terminal cannot be restored.
pub fn suspend() -> Result<()> {
    restore_terminal()
}

/// Re-enters the TUI after [`suspend`] and forces a full redraw.
///
/// # Errors
/// Returns an error if the terminal cannot be configured.
pub fn resume(terminal: &mut Tui) -> Result<()> {
    enter()?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
///
/// Call this BEFORE `setup_terminal()`.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
