//! Shared TUI building blocks.

pub mod task;
pub mod text;

pub use task::*;
pub use text::*;
