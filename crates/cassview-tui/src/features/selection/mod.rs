//! Selection feature slice.
//!
//! - `state.rs`: the agent → session selection machine and list cursors
//! - `render.rs`: agent list, session list and detail panel

mod render;
mod state;

pub use render::{AGENT_LIST_MAX_ROWS, render_agent_list, render_detail, render_session_list};
pub use state::{Pane, SelectionPhase, SelectionState};
