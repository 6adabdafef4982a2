//! Feature slices for the TUI (state/render per slice).

pub mod notify;
pub mod selection;
pub mod stats;
