//! Effect handlers for the TUI runtime.
//!
//! Handlers perform I/O and never mutate state. Async handlers return the
//! `UiEvent` that the runtime delivers through the inbox.

pub mod catalog;
pub mod session;

pub use catalog::*;
pub use session::*;
