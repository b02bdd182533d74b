use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ActionId;
use crate::timing::format_countdown;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
    /// Target passed but the completion check has not cleared it yet.
    Overdue,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

/// Countdown attached to the action that requested a wait.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    pub action: ActionId,
    pub started_at: DateTime<Utc>,
    pub target_time: DateTime<Utc>,
}

impl ActiveTimer {
    pub fn label(&self) -> String {
        format!("Wachten na {}", self.action)
    }
}

/// Holds at most one [`ActiveTimer`]; starting a new one replaces the old.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    active: Option<ActiveTimer>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, action: ActionId, minutes: u32, now: DateTime<Utc>) {
        self.active = Some(ActiveTimer {
            action,
            started_at: now,
            target_time: now + Duration::minutes(i64::from(minutes)),
        });
    }

    pub fn cancel(&mut self) -> Option<ActiveTimer> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&ActiveTimer> {
        self.active.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_for(&self, action: &ActionId) -> bool {
        self.active.as_ref().is_some_and(|t| &t.action == action)
    }

    pub fn status(&self, now: DateTime<Utc>) -> TimerStatus {
        match &self.active {
            None => TimerStatus::Idle,
            Some(timer) if now >= timer.target_time => TimerStatus::Overdue,
            Some(_) => TimerStatus::Running,
        }
    }

    /// Negative once overdue; zero when idle.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        self.active
            .as_ref()
            .map(|t| (t.target_time - now).num_milliseconds())
            .unwrap_or(0)
    }

    pub fn countdown_text(&self, now: DateTime<Utc>) -> Option<String> {
        self.active
            .as_ref()
            .map(|_| format_countdown(self.remaining_ms(now)))
    }

    /// Completion check: drops the timer once its target is reached.
    pub fn expire_if_elapsed(&mut self, now: DateTime<Utc>) -> Option<ActiveTimer> {
        if self.status(now) == TimerStatus::Overdue {
            self.active.take()
        } else {
            None
        }
    }
}
