use chrono::{DateTime, Utc};
use serde::Serialize;

use super::machine::Tracker;
use crate::models::{LogEntry, SessionLog};
use crate::timer::TimerStatus;
use crate::timing::format_elapsed;

/// Parent phase shown while a fold's rest timer runs.
pub const BULK_PHASE_LABEL: &str = "Bulkrijs";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum PhaseDisplay {
    /// Instant actions show when they happened.
    At(DateTime<Utc>),
    /// Ongoing phases show live elapsed time.
    Elapsed(String),
}

/// Read-only view of the newest action entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPhase {
    pub entry: LogEntry,
    pub label: String,
    pub display: PhaseDisplay,
}

pub fn current_phase(log: &SessionLog, tracker: &Tracker, now: DateTime<Utc>) -> Option<CurrentPhase> {
    let entry = log.latest_action()?.clone();

    let fold_running = entry.action.kind.is_repeatable()
        && tracker.timer().is_for(&entry.action)
        && tracker.timer().status(now) == TimerStatus::Running;
    let label = if fold_running {
        BULK_PHASE_LABEL.to_string()
    } else {
        entry.action.to_string()
    };

    let display = if entry.action.kind.is_instant() {
        PhaseDisplay::At(entry.time)
    } else {
        PhaseDisplay::Elapsed(format_elapsed(entry.time, now))
    };

    Some(CurrentPhase {
        entry,
        label,
        display,
    })
}
