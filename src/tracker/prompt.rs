use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActionId, ActionKind};

/// A request to log an action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: ActionKind,
    #[serde(default)]
    pub wait_minutes: u32,
    /// Backdated or otherwise explicit time; leaves the timer alone.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub force: bool,
}

impl ActionRequest {
    pub fn now(action: ActionKind, wait_minutes: u32) -> Self {
        Self {
            action,
            wait_minutes,
            at: None,
            force: false,
        }
    }

    pub fn at(action: ActionKind, at: DateTime<Utc>) -> Self {
        Self {
            action,
            wait_minutes: 0,
            at: Some(at),
            force: false,
        }
    }

    pub fn forced(self) -> Self {
        Self {
            force: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProofPath {
    /// Straight into the fridge, no timer.
    Cold,
    /// Proof on the counter with a timer.
    Room,
}

impl ProofPath {
    pub fn action(&self) -> ActionKind {
        match self {
            ProofPath::Cold => ActionKind::ColdProof,
            ProofPath::Room => ActionKind::RoomProof,
        }
    }
}

/// Open question to the user. At most one is open at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Prompt {
    /// A timer is still running; `pending` waits for confirmation.
    Guard {
        pending: ActionRequest,
        running: ActionId,
        /// Set when the guard displaced an open proof choice.
        #[serde(default)]
        reopen_choice: bool,
    },
    /// Removing the most recent action needs a yes.
    ConfirmUndo,
    /// Shaping is done: cold or room proof?
    ProofChoice,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Guard {
                pending, running, ..
            } => write!(
                f,
                "'{}' is still running; finish it and start '{}'?",
                running, pending.action
            ),
            Prompt::ConfirmUndo => f.write_str("Remove the most recent action?"),
            Prompt::ProofChoice => f.write_str("Shaping done: cold proof or room-temperature proof?"),
        }
    }
}
