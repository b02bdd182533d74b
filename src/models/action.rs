//! Action vocabulary for the bake log.
//!
//! Every log entry names one `ActionKind`. Repeatable kinds (the folds) also
//! carry a sequence number so that `Stretch & Fold #2` and `Stretch & Fold #3`
//! are distinct identities that compare structurally.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    StarterFed,
    AutolyseStart,
    MixComplete,
    Laminate,
    StretchAndFold,
    CoilFold,
    BulkRest,
    Preshape,
    FinalShape,
    ColdProof,
    RoomProof,
    Refrigerate,
    OvenIn,
    SessionStarted,
    BakingDone,
}

impl ActionKind {
    pub const ALL: [ActionKind; 15] = [
        ActionKind::StarterFed,
        ActionKind::AutolyseStart,
        ActionKind::MixComplete,
        ActionKind::Laminate,
        ActionKind::StretchAndFold,
        ActionKind::CoilFold,
        ActionKind::BulkRest,
        ActionKind::Preshape,
        ActionKind::FinalShape,
        ActionKind::ColdProof,
        ActionKind::RoomProof,
        ActionKind::Refrigerate,
        ActionKind::OvenIn,
        ActionKind::SessionStarted,
        ActionKind::BakingDone,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::StarterFed => "Starter Gevoed",
            ActionKind::AutolyseStart => "Autolyse Start",
            ActionKind::MixComplete => "Mixen Compleet",
            ActionKind::Laminate => "Lamineren",
            ActionKind::StretchAndFold => "Stretch & Fold",
            ActionKind::CoilFold => "Coil Fold",
            ActionKind::BulkRest => "Rest Bulkrijs",
            ActionKind::Preshape => "Preshape",
            ActionKind::FinalShape => "Final Shape",
            ActionKind::ColdProof => "Koude Rijs",
            ActionKind::RoomProof => "Rijs op Kamertemperatuur",
            ActionKind::Refrigerate => "In Koelkast",
            ActionKind::OvenIn => "Oven In",
            ActionKind::SessionStarted => "Sessie Gestart",
            ActionKind::BakingDone => "Bakken Klaar",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ActionKind::StarterFed => "starter_fed",
            ActionKind::AutolyseStart => "autolyse_start",
            ActionKind::MixComplete => "mix_complete",
            ActionKind::Laminate => "laminate",
            ActionKind::StretchAndFold => "stretch_and_fold",
            ActionKind::CoilFold => "coil_fold",
            ActionKind::BulkRest => "bulk_rest",
            ActionKind::Preshape => "preshape",
            ActionKind::FinalShape => "final_shape",
            ActionKind::ColdProof => "cold_proof",
            ActionKind::RoomProof => "room_proof",
            ActionKind::Refrigerate => "refrigerate",
            ActionKind::OvenIn => "oven_in",
            ActionKind::SessionStarted => "session_started",
            ActionKind::BakingDone => "baking_done",
        }
    }

    /// Moments rather than phases: shown with their timestamp and never
    /// blocked by a running timer.
    pub fn is_instant(&self) -> bool {
        matches!(
            self,
            ActionKind::StarterFed
                | ActionKind::Refrigerate
                | ActionKind::OvenIn
                | ActionKind::ColdProof
                | ActionKind::SessionStarted
                | ActionKind::BakingDone
        )
    }

    /// Folds are numbered per session.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, ActionKind::StretchAndFold | ActionKind::CoilFold)
    }

    /// Any of these, logged after `Mixen Compleet`, closes the bulk rise.
    pub fn ends_bulk_rise(&self) -> bool {
        matches!(
            self,
            ActionKind::Refrigerate
                | ActionKind::OvenIn
                | ActionKind::Preshape
                | ActionKind::FinalShape
                | ActionKind::ColdProof
                | ActionKind::RoomProof
        )
    }

    pub fn is_system(&self) -> bool {
        matches!(self, ActionKind::SessionStarted | ActionKind::BakingDone)
    }

    /// Wait suggested when the action is logged from its shortcut.
    ///
    /// `RoomProof` and `BulkRest` depend on settings and history and are
    /// resolved by the session manager; they report zero here.
    pub fn default_wait_minutes(&self) -> u32 {
        match self {
            ActionKind::AutolyseStart => 60,
            ActionKind::MixComplete
            | ActionKind::Laminate
            | ActionKind::StretchAndFold
            | ActionKind::CoilFold => 30,
            ActionKind::Preshape => 20,
            ActionKind::OvenIn => 45,
            _ => 0,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl FromStr for ActionKind {
    type Err = anyhow::Error;

    /// Accepts the display label or the snake_case key, ignoring case,
    /// spacing and punctuation (`mixen-compleet`, `Stretch & Fold`).
    fn from_str(value: &str) -> Result<Self> {
        let wanted = normalize(value);
        ActionKind::ALL
            .iter()
            .copied()
            .find(|kind| normalize(kind.label()) == wanted || normalize(kind.key()) == wanted)
            .ok_or_else(|| anyhow!("unknown action '{value}'"))
    }
}

/// Structural identity of a logged action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ActionId {
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u32>,
}

impl ActionId {
    pub fn plain(kind: ActionKind) -> Self {
        Self { kind, seq: None }
    }

    pub fn numbered(kind: ActionKind, seq: u32) -> Self {
        Self {
            kind,
            seq: Some(seq),
        }
    }
}

impl From<ActionKind> for ActionId {
    fn from(kind: ActionKind) -> Self {
        Self::plain(kind)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seq {
            Some(seq) => write!(f, "{} #{}", self.kind.label(), seq),
            None => f.write_str(self.kind.label()),
        }
    }
}

impl FromStr for ActionId {
    type Err = anyhow::Error;

    /// Parses `"Stretch & Fold #2"` as well as bare kinds.
    fn from_str(value: &str) -> Result<Self> {
        if let Some((head, tail)) = value.rsplit_once('#') {
            let seq: u32 = tail
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid sequence number in '{value}'"))?;
            return Ok(ActionId::numbered(head.parse()?, seq));
        }
        Ok(ActionId::plain(value.parse()?))
    }
}

/// Quick tags offered when attaching a note to an entry.
pub const NOTE_TAGS: [&str; 10] = [
    "Plakkerig",
    "Rijst snel",
    "Rijst traag",
    "Slap deeg",
    "Sterk deeg",
    "Goede windowpane",
    "Geen windowpane",
    "Temperatuur piek",
    "Luchtig",
    "Compact",
];
