//! Inbox channel types.
//!
//! Every async handler reports back through one unbounded channel that the
//! runtime drains once per frame.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;
