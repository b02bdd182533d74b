use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::prompt::{ActionRequest, ProofPath, Prompt};
use crate::models::{ActionId, ActionKind, LogEntry, SessionLog};
use crate::timer::{ActiveTimer, TimerState};

#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    Logged {
        id: ActionId,
        time: DateTime<Utc>,
        timer_started: bool,
    },
    /// Nothing was written; a [`Prompt::Guard`] is now open.
    Guarded {
        pending: ActionKind,
        running: ActionId,
    },
    /// The shaping marker was written and a [`Prompt::ProofChoice`] is open.
    ProofChoiceRaised { id: ActionId },
    /// No proof choice is open; nothing was written.
    NoChoicePending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Logged(LogOutcome),
    Undone(Option<LogEntry>),
    /// A proof choice cannot be confirmed, only chosen.
    ChoiceRequired,
    NothingPending,
}

/// Phase/timer state machine of one active session.
///
/// The log itself lives in the session; every operation borrows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    #[serde(default)]
    timer: TimerState,
    #[serde(default)]
    prompt: Option<Prompt>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Returns the running timer's action when `request` has to wait for a
    /// confirmation first.
    fn guard_blocker(&self, request: &ActionRequest, now: DateTime<Utc>) -> Option<ActionId> {
        let timer = self.timer.active()?;
        let instant = request.action.is_instant();

        let skip = request.force
            || request.at.is_some()
            || instant
            || now >= timer.target_time
            || (timer.action.kind == ActionKind::BulkRest && instant);

        (!skip).then_some(timer.action)
    }

    pub fn log_action(
        &mut self,
        log: &mut SessionLog,
        request: ActionRequest,
        now: DateTime<Utc>,
    ) -> LogOutcome {
        if let Some(running) = self.guard_blocker(&request, now) {
            let pending = request.action;
            let reopen_choice = self.prompt == Some(Prompt::ProofChoice);
            self.prompt = Some(Prompt::Guard {
                pending: request,
                running,
                reopen_choice,
            });
            return LogOutcome::Guarded { pending, running };
        }

        self.prompt = None;
        if request.force {
            self.timer.cancel();
        }

        let kind = request.action;
        let id = if kind.is_repeatable() {
            ActionId::numbered(kind, log.count_kind(kind) as u32 + 1)
        } else {
            ActionId::plain(kind)
        };
        let time = request.at.unwrap_or(now);
        log.insert(LogEntry::action(id, time));

        if request.at.is_some() {
            return LogOutcome::Logged {
                id,
                time,
                timer_started: false,
            };
        }

        if kind == ActionKind::FinalShape {
            self.timer.cancel();
            self.prompt = Some(Prompt::ProofChoice);
            return LogOutcome::ProofChoiceRaised { id };
        }

        let timer_started = request.wait_minutes > 0;
        if timer_started {
            self.timer.begin(id, request.wait_minutes, now);
        } else {
            self.timer.cancel();
        }

        LogOutcome::Logged {
            id,
            time,
            timer_started,
        }
    }

    /// Resolves the open prompt with "yes".
    pub fn confirm(&mut self, log: &mut SessionLog, now: DateTime<Utc>) -> ConfirmOutcome {
        match self.prompt.take() {
            Some(Prompt::Guard { pending, .. }) => {
                self.timer.cancel();
                ConfirmOutcome::Logged(self.log_action(log, pending.forced(), now))
            }
            Some(Prompt::ConfirmUndo) => ConfirmOutcome::Undone(self.undo_last(log)),
            Some(Prompt::ProofChoice) => {
                self.prompt = Some(Prompt::ProofChoice);
                ConfirmOutcome::ChoiceRequired
            }
            None => ConfirmOutcome::NothingPending,
        }
    }

    /// Dismisses the open prompt without touching log or timer.
    ///
    /// A guard that displaced a proof choice hands the choice back.
    pub fn cancel(&mut self) -> Option<Prompt> {
        let dismissed = self.prompt.take();
        if let Some(Prompt::Guard {
            reopen_choice: true,
            ..
        }) = dismissed
        {
            self.prompt = Some(Prompt::ProofChoice);
        }
        dismissed
    }

    pub fn choose_proof(
        &mut self,
        log: &mut SessionLog,
        path: ProofPath,
        room_proof_minutes: u32,
        now: DateTime<Utc>,
    ) -> LogOutcome {
        if self.prompt != Some(Prompt::ProofChoice) {
            return LogOutcome::NoChoicePending;
        }
        let wait = match path {
            ProofPath::Cold => 0,
            ProofPath::Room => room_proof_minutes,
        };
        self.log_action(log, ActionRequest::now(path.action(), wait).forced(), now)
    }

    /// Opens the undo confirmation. Returns false when there is nothing to undo.
    pub fn request_undo(&mut self, log: &SessionLog) -> bool {
        if log.latest_action().is_none() {
            return false;
        }
        self.prompt = Some(Prompt::ConfirmUndo);
        true
    }

    /// Removes the newest action entry, and its timer if it owns the running one.
    pub fn undo_last(&mut self, log: &mut SessionLog) -> Option<LogEntry> {
        let removed = log.remove_latest_action()?;
        if self.timer.is_for(&removed.action) {
            self.timer.cancel();
        }
        Some(removed)
    }

    pub fn stop_timer(&mut self) -> Option<ActiveTimer> {
        self.timer.cancel()
    }

    /// Removes the entry that started the running timer, and the timer.
    pub fn delete_timed_action(&mut self, log: &mut SessionLog) -> Option<LogEntry> {
        let timer = self.timer.cancel()?;
        log.remove_first(&timer.action)
    }

    /// Completion check run by the periodic tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<ActiveTimer> {
        self.timer.expire_if_elapsed(now)
    }
}

pub fn attach_note(
    log: &mut SessionLog,
    time: DateTime<Utc>,
    action: &ActionId,
    text: &str,
) -> bool {
    log.find_mut(time, action)
        .is_some_and(|entry| entry.add_note(text))
}

pub fn remove_note(
    log: &mut SessionLog,
    time: DateTime<Utc>,
    action: &ActionId,
    text: &str,
) -> bool {
    log.find_mut(time, action)
        .is_some_and(|entry| entry.remove_note(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn log_now(
        tracker: &mut Tracker,
        log: &mut SessionLog,
        kind: ActionKind,
        wait: u32,
        minute: i64,
    ) -> LogOutcome {
        tracker.log_action(log, ActionRequest::now(kind, wait), t(minute))
    }

    #[test]
    fn guard_blocks_until_confirmed() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::AutolyseStart, 60, 0);
        assert_eq!(log.len(), 1);

        let outcome = log_now(&mut tracker, &mut log, ActionKind::Laminate, 30, 10);
        assert_eq!(
            outcome,
            LogOutcome::Guarded {
                pending: ActionKind::Laminate,
                running: ActionKind::AutolyseStart.into(),
            }
        );
        assert_eq!(log.len(), 1);
        assert!(matches!(tracker.prompt(), Some(Prompt::Guard { .. })));

        let confirmed = tracker.confirm(&mut log, t(11));
        assert!(matches!(confirmed, ConfirmOutcome::Logged(LogOutcome::Logged { .. })));
        assert_eq!(log.len(), 2);
        assert_eq!(log.count_kind(ActionKind::Laminate), 1);
        assert!(tracker.timer().is_for(&ActionKind::Laminate.into()));
        assert!(tracker.prompt().is_none());

        // A second confirm has nothing left to apply.
        assert_eq!(tracker.confirm(&mut log, t(12)), ConfirmOutcome::NothingPending);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn guard_cancel_leaves_everything_untouched() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::AutolyseStart, 60, 0);
        log_now(&mut tracker, &mut log, ActionKind::MixComplete, 30, 5);
        assert!(tracker.cancel().is_some());
        assert_eq!(log.len(), 1);
        assert!(tracker.timer().is_for(&ActionKind::AutolyseStart.into()));
    }

    #[test]
    fn expired_timer_does_not_guard() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::AutolyseStart, 60, 0);
        let outcome = log_now(&mut tracker, &mut log, ActionKind::MixComplete, 30, 60);
        assert!(matches!(outcome, LogOutcome::Logged { timer_started: true, .. }));
        assert!(tracker.timer().is_for(&ActionKind::MixComplete.into()));
    }

    #[test]
    fn instant_and_backdated_actions_skip_the_guard() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::BulkRest, 240, 0);

        let outcome = log_now(&mut tracker, &mut log, ActionKind::Refrigerate, 0, 10);
        assert!(matches!(outcome, LogOutcome::Logged { timer_started: false, .. }));
        assert!(!tracker.timer().is_set());

        log_now(&mut tracker, &mut log, ActionKind::Laminate, 30, 20);
        let backdated = tracker.log_action(
            &mut log,
            ActionRequest::at(ActionKind::AutolyseStart, t(-60)),
            t(21),
        );
        assert!(matches!(backdated, LogOutcome::Logged { .. }));
        // Backdating keeps the running timer.
        assert!(tracker.timer().is_for(&ActionKind::Laminate.into()));
        assert_eq!(log.entries().last().unwrap().action.kind, ActionKind::AutolyseStart);
    }

    #[test]
    fn only_one_timer_survives_any_sequence() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        let steps = [
            (ActionKind::AutolyseStart, 60u32, 0i64),
            (ActionKind::MixComplete, 30, 10),
            (ActionKind::StretchAndFold, 30, 70),
            (ActionKind::CoilFold, 30, 80),
            (ActionKind::OvenIn, 45, 90),
        ];
        for (kind, wait, minute) in steps {
            if let LogOutcome::Guarded { .. } = log_now(&mut tracker, &mut log, kind, wait, minute) {
                tracker.confirm(&mut log, t(minute));
            }
            // The timer always belongs to the newest timed action.
            let active = tracker.timer().active().unwrap();
            assert_eq!(active.action, log.latest_action().unwrap().action);
        }
    }

    #[test]
    fn folds_are_numbered_in_order() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        for minute in [0, 10, 20] {
            if let LogOutcome::Guarded { .. } =
                log_now(&mut tracker, &mut log, ActionKind::StretchAndFold, 30, minute)
            {
                tracker.confirm(&mut log, t(minute));
            }
        }
        let names: Vec<String> = log
            .chronological()
            .iter()
            .map(|e| e.action.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Stretch & Fold #1", "Stretch & Fold #2", "Stretch & Fold #3"]
        );
    }

    #[test]
    fn undo_removes_one_action_and_its_timer() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log.insert(LogEntry::system(ActionKind::SessionStarted, t(0)));
        log_now(&mut tracker, &mut log, ActionKind::StarterFed, 0, 0);
        log_now(&mut tracker, &mut log, ActionKind::StretchAndFold, 30, 5);

        assert!(tracker.request_undo(&log));
        let outcome = tracker.confirm(&mut log, t(6));
        match outcome {
            ConfirmOutcome::Undone(Some(entry)) => {
                assert_eq!(entry.action, ActionId::numbered(ActionKind::StretchAndFold, 1))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!tracker.timer().is_set());
        assert_eq!(log.len(), 2);

        assert!(tracker.undo_last(&mut log).is_some());
        assert!(tracker.undo_last(&mut log).is_none());
        assert!(!tracker.request_undo(&log));
        // The system entry is never undone.
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn undo_keeps_timer_of_other_action() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::Laminate, 30, 0);
        tracker.log_action(&mut log, ActionRequest::at(ActionKind::StarterFed, t(5)), t(6));
        let removed = tracker.undo_last(&mut log).unwrap();
        assert_eq!(removed.action.kind, ActionKind::StarterFed);
        assert!(tracker.timer().is_for(&ActionKind::Laminate.into()));
    }

    #[test]
    fn delete_timed_action_removes_entry_and_timer() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::StarterFed, 0, 0);
        log_now(&mut tracker, &mut log, ActionKind::CoilFold, 30, 10);
        let removed = tracker.delete_timed_action(&mut log).unwrap();
        assert_eq!(removed.action, ActionId::numbered(ActionKind::CoilFold, 1));
        assert!(!tracker.timer().is_set());
        assert_eq!(log.len(), 1);
        assert!(tracker.delete_timed_action(&mut log).is_none());
    }

    #[test]
    fn stop_timer_keeps_the_log() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::Preshape, 20, 0);
        assert!(tracker.stop_timer().is_some());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn final_shape_asks_for_proof_path() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::Preshape, 20, 0);
        let outcome = log_now(&mut tracker, &mut log, ActionKind::FinalShape, 0, 25);
        assert!(matches!(outcome, LogOutcome::ProofChoiceRaised { .. }));
        assert_eq!(tracker.prompt(), Some(&Prompt::ProofChoice));
        assert!(!tracker.timer().is_set());
        assert_eq!(tracker.confirm(&mut log, t(26)), ConfirmOutcome::ChoiceRequired);

        let room = tracker.choose_proof(&mut log, ProofPath::Room, 120, t(27));
        assert!(matches!(room, LogOutcome::Logged { timer_started: true, .. }));
        assert!(tracker.timer().is_for(&ActionKind::RoomProof.into()));
        assert!(tracker.prompt().is_none());
    }

    #[test]
    fn proof_choice_requires_open_prompt() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::MixComplete, 240, 0);

        let room = tracker.choose_proof(&mut log, ProofPath::Room, 120, t(10));
        assert_eq!(room, LogOutcome::NoChoicePending);
        assert_eq!(log.len(), 1);
        assert!(tracker.timer().is_for(&ActionKind::MixComplete.into()));
        assert!(tracker.prompt().is_none());
    }

    #[test]
    fn cancelled_guard_hands_back_proof_choice() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::Laminate, 30, 0);
        // e.g. restored from a record written while both were live
        tracker.prompt = Some(Prompt::ProofChoice);

        let outcome = log_now(&mut tracker, &mut log, ActionKind::Preshape, 20, 5);
        assert!(matches!(outcome, LogOutcome::Guarded { .. }));
        assert!(matches!(tracker.cancel(), Some(Prompt::Guard { .. })));
        assert_eq!(tracker.prompt(), Some(&Prompt::ProofChoice));
        assert_eq!(log.len(), 1);
        assert!(tracker.timer().is_for(&ActionKind::Laminate.into()));

        let cold = tracker.choose_proof(&mut log, ProofPath::Cold, 120, t(6));
        assert!(matches!(cold, LogOutcome::Logged { .. }));
        assert!(tracker.prompt().is_none());
    }

    #[test]
    fn cold_proof_logs_without_timer() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::FinalShape, 0, 0);
        let cold = tracker.choose_proof(&mut log, ProofPath::Cold, 120, t(1));
        assert!(matches!(cold, LogOutcome::Logged { timer_started: false, .. }));
        assert!(!tracker.timer().is_set());
        assert_eq!(log.latest_action().unwrap().action.kind, ActionKind::ColdProof);
    }

    #[test]
    fn tick_clears_only_elapsed_timer() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::Laminate, 30, 0);
        assert!(tracker.tick(t(29)).is_none());
        assert!(tracker.tick(t(30)).is_some());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn notes_target_one_entry() {
        let mut tracker = Tracker::new();
        let mut log = SessionLog::new();
        log_now(&mut tracker, &mut log, ActionKind::Laminate, 0, 0);
        let id = ActionId::plain(ActionKind::Laminate);
        assert!(attach_note(&mut log, t(0), &id, "Plakkerig"));
        assert!(!attach_note(&mut log, t(0), &id, "Plakkerig"));
        assert!(!attach_note(&mut log, t(1), &id, "Luchtig"));
        assert_eq!(log.entries()[0].notes, vec!["Plakkerig".to_string()]);
        assert!(remove_note(&mut log, t(0), &id, "Plakkerig"));
        assert!(log.entries()[0].notes.is_empty());
    }
}
