//! Actions that forms return to communicate with the app

use crate::domain::lending::{ActionKind, ActionRequest};

/// What the app should do in response to a handled key or command.
#[derive(Debug, Clone)]
pub enum Action {
    /// No action needed
    None,

    /// Hand a fresh request to the runtime for submission
    Submit {
        kind: ActionKind,
        seq: u64,
        request: ActionRequest,
    },

    /// Show a toast
    Notify(String, NotifyLevel),
}

/// Toast severities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Error,
}
