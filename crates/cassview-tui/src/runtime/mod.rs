//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! All side effects happen here. The reducer stays pure and produces
//! effects; this module executes them.
//!
//! Async handlers send their result `UiEvent`s to the inbox, which the
//! runtime drains each frame before polling the terminal.

mod handlers;
mod inbox;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::Tui;
use crate::{render, terminal, update};

/// Tick cadence while background work is animating the spinner.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle. Longer timeout reduces CPU usage.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Terminal state is restored on drop and on
/// panic.
pub struct TuiRuntime {
    terminal: Tui,
    pub state: AppState,
    /// Handlers send events here.
    inbox_tx: UiEventSender,
    /// Drained once per frame.
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen and takes ownership of `state`.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be configured.
    pub fn new(state: AppState) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Starts the first catalog load and runs the event loop until quit.
    ///
    /// Blocks the calling thread; async work is spawned onto the ambient
    /// tokio runtime, which must be multi-threaded.
    ///
    /// # Errors
    /// Returns an error if the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        let effects = update::load(&mut self.state);
        self.execute_effects(effects);
        self.event_loop()
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Only Tick triggers render; this caps frame rate at tick cadence.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
                if self.state.should_quit {
                    break;
                }
            }

            if dirty && !self.state.should_quit {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects inbox results, then terminal input, then a Tick when due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tasks.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Don't delay already collected events; otherwise sleep until the tick.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::RefreshCatalog { task } => {
                let catalog = self.state.catalog.clone();
                self.spawn_task(TaskKind::CatalogRefresh, task, true, move |cancel| {
                    handlers::catalog_refresh(catalog, cancel)
                });
            }
            UiEffect::Reindex { task } => {
                let catalog = self.state.catalog.clone();
                self.spawn_task(TaskKind::Reindex, task, false, move |_| {
                    handlers::reindex(catalog)
                });
            }
            UiEffect::LoadStats { task } => {
                let catalog = self.state.catalog.clone();
                self.spawn_task(TaskKind::Stats, task, false, move |_| {
                    handlers::stats_load(catalog)
                });
            }
            UiEffect::CancelTask { kind, token } => {
                if let Some(cancel) = token {
                    tracing::debug!(?kind, "canceling task");
                    cancel.cancel();
                }
            }
            UiEffect::OpenSession { source_path } => {
                if let Err(error) = self.open_session(&source_path) {
                    tracing::warn!(%source_path, "failed to open session: {error:#}");
                }
            }
        }
    }

    /// Hands the screen to a pager and takes it back afterwards.
    fn open_session(&mut self, source_path: &str) -> Result<()> {
        terminal::suspend()?;
        let shown = handlers::open_session(&self.state.catalog, source_path);
        terminal::resume(&mut self.terminal)?;
        // Keys typed in the pager must not replay into the TUI.
        while event::poll(Duration::ZERO)? {
            event::read()?;
        }
        shown
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
