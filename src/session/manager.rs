use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::history::History;
use crate::{
    log_debug, log_info, log_warn,
    models::{ActionId, ActionKind, BakeAnalysis, LogEntry, Session, SessionLog, SessionStatus},
    recipe::RecipeConfig,
    settings::TrackerSettings,
    store::{load_json, save_json, KeyValueStore, ACTIVE_SESSION_KEY, HISTORY_KEY},
    timer::ActiveTimer,
    timing::{bulk_rise_window, estimate_bulk_rise, BulkEstimate, BulkRiseWindow, EstimatorConfig},
    tracker::{
        self, current_phase, ActionRequest, ConfirmOutcome, CurrentPhase, LogOutcome, ProofPath,
        Prompt, Tracker,
    },
};

const ENABLE_LOGS: bool = true;

/// The active session together with its tracker state; mirrored to storage
/// as one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub session: Session,
    #[serde(default)]
    pub tracker: Tracker,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkProgress {
    /// `None` until mixing is logged.
    pub window: Option<BulkRiseWindow>,
    pub estimate: BulkEstimate,
    /// Share of the estimate reached, capped at 100.
    pub percent: f64,
    pub remaining_minutes: i64,
}

/// Owns the session lifecycle: none → active → finished (→ resumed).
///
/// Every mutation is written through to the store before returning.
pub struct SessionManager<S: KeyValueStore> {
    store: S,
    settings: TrackerSettings,
    estimator: EstimatorConfig,
    active: Option<ActiveSession>,
    history: History,
    pending_deletion: Option<String>,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn load(store: S, settings: TrackerSettings) -> Result<Self> {
        let history: History = load_json(&store, HISTORY_KEY)
            .context("failed to load bake history")?
            .unwrap_or_default();

        let active = match load_json::<ActiveSession, _>(&store, ACTIVE_SESSION_KEY)
            .context("failed to load active session")?
        {
            Some(record) if record.session.is_active() => {
                log_info!("Restored active session {}", record.session.id);
                Some(record)
            }
            Some(stale) => {
                log_warn!(
                    "Dropping stored session {} with status {}",
                    stale.session.id,
                    stale.session.status.as_str()
                );
                store.remove(ACTIVE_SESSION_KEY)?;
                None
            }
            None => None,
        };

        Ok(Self {
            store,
            settings,
            estimator: EstimatorConfig::default(),
            active,
            history,
            pending_deletion: None,
        })
    }

    pub fn with_estimator(mut self, estimator: EstimatorConfig) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.active.as_ref().map(|a| &a.session)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn find_history(&self, id: &str) -> Option<&Session> {
        self.history.get(id)
    }

    fn active_mut(&mut self) -> Result<&mut ActiveSession> {
        self.active
            .as_mut()
            .ok_or_else(|| anyhow!("no active bake session"))
    }

    fn persist_active(&self) -> Result<()> {
        match &self.active {
            Some(record) if record.session.is_active() => {
                save_json(&self.store, ACTIVE_SESSION_KEY, record)
            }
            _ => self.store.remove(ACTIVE_SESSION_KEY),
        }
    }

    fn persist_history(&self) -> Result<()> {
        save_json(&self.store, HISTORY_KEY, &self.history)
    }

    /// Applies `op` to the active session and writes the result through.
    fn mutate<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Tracker, &mut SessionLog) -> T,
    {
        let record = self.active_mut()?;
        let result = op(&mut record.tracker, &mut record.session.logs);
        self.persist_active()?;
        Ok(result)
    }

    pub fn start(
        &mut self,
        config: RecipeConfig,
        start_time: DateTime<Utc>,
        temperature: f64,
    ) -> Result<&Session> {
        if let Some(record) = &self.active {
            bail!(
                "bake {} is still in progress; finish it before starting a new one",
                record.session.name
            );
        }
        config.validate()?;

        let mut logs = SessionLog::new();
        logs.insert(LogEntry::action(ActionKind::StarterFed, start_time));
        logs.insert(LogEntry::system(ActionKind::SessionStarted, start_time));

        let session = Session {
            id: Uuid::now_v7().to_string(),
            name: Session::display_name(start_time),
            start_time,
            end_time: None,
            temperature,
            logs,
            photos: Vec::new(),
            config_snapshot: config,
            status: SessionStatus::Active,
            analysis: None,
        };
        log_info!("Started session {} ({})", session.id, session.name);

        self.active = Some(ActiveSession {
            session,
            tracker: Tracker::new(),
        });
        self.persist_active()?;

        self.session()
            .ok_or_else(|| anyhow!("session vanished after start"))
    }

    pub fn log_action(&mut self, request: ActionRequest, now: DateTime<Utc>) -> Result<LogOutcome> {
        if request.action.is_system() {
            bail!("'{}' is recorded automatically", request.action);
        }
        let outcome = self.mutate(|tracker, logs| tracker.log_action(logs, request, now))?;
        log_debug!("log_action -> {:?}", outcome);
        Ok(outcome)
    }

    /// Wait used when `kind` is logged from its shortcut.
    pub fn default_wait_minutes(&self, kind: ActionKind, now: DateTime<Utc>) -> u32 {
        match kind {
            ActionKind::RoomProof => self.settings.room_proof_minutes,
            ActionKind::BulkRest => self
                .bulk_progress(now)
                .map(|p| p.remaining_minutes.clamp(0, i64::from(u32::MAX)) as u32)
                .unwrap_or(0),
            other => other.default_wait_minutes(),
        }
    }

    /// Logs `kind` now with its default wait.
    pub fn log_shortcut(&mut self, kind: ActionKind, now: DateTime<Utc>) -> Result<LogOutcome> {
        let wait = self.default_wait_minutes(kind, now);
        self.log_action(ActionRequest::now(kind, wait), now)
    }

    /// Starts the coarse "rest of bulk" timer for the remaining estimate.
    pub fn log_rest(&mut self, now: DateTime<Utc>) -> Result<LogOutcome> {
        self.log_shortcut(ActionKind::BulkRest, now)
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.active.as_ref().and_then(|a| a.tracker.prompt())
    }

    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<ConfirmOutcome> {
        self.mutate(|tracker, logs| tracker.confirm(logs, now))
    }

    pub fn cancel(&mut self) -> Result<Option<Prompt>> {
        self.mutate(|tracker, _| tracker.cancel())
    }

    pub fn choose_proof(&mut self, path: ProofPath, now: DateTime<Utc>) -> Result<LogOutcome> {
        let minutes = self.settings.room_proof_minutes;
        self.mutate(|tracker, logs| tracker.choose_proof(logs, path, minutes, now))
    }

    pub fn request_undo(&mut self) -> Result<bool> {
        self.mutate(|tracker, logs| tracker.request_undo(logs))
    }

    pub fn stop_timer(&mut self) -> Result<Option<ActiveTimer>> {
        self.mutate(|tracker, _| tracker.stop_timer())
    }

    pub fn delete_timed_action(&mut self) -> Result<Option<LogEntry>> {
        self.mutate(|tracker, logs| tracker.delete_timed_action(logs))
    }

    pub fn attach_note(&mut self, time: DateTime<Utc>, action: &ActionId, text: &str) -> Result<bool> {
        self.mutate(|_, logs| tracker::attach_note(logs, time, action, text))
    }

    pub fn remove_note(&mut self, time: DateTime<Utc>, action: &ActionId, text: &str) -> Result<bool> {
        self.mutate(|_, logs| tracker::remove_note(logs, time, action, text))
    }

    /// Timer completion check; only writes when a timer was cleared.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Option<ActiveTimer>> {
        let Some(record) = self.active.as_mut() else {
            return Ok(None);
        };
        let expired = record.tracker.tick(now);
        if let Some(timer) = &expired {
            log_info!("Timer for {} elapsed", timer.action);
            self.persist_active()?;
        }
        Ok(expired)
    }

    pub fn current_phase(&self, now: DateTime<Utc>) -> Option<CurrentPhase> {
        let record = self.active.as_ref()?;
        current_phase(&record.session.logs, &record.tracker, now)
    }

    pub fn bulk_progress(&self, now: DateTime<Utc>) -> Option<BulkProgress> {
        let session = self.session()?;
        let estimate = estimate_bulk_rise(
            session.temperature,
            session.config_snapshot.inoculation,
            self.history.sessions(),
            &self.estimator,
        );
        let window = bulk_rise_window(&session.logs, now);
        let elapsed = window.as_ref().map(|w| w.minutes).unwrap_or(0);
        let percent = if estimate.minutes > 0 {
            (elapsed as f64 / estimate.minutes as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        let remaining_minutes = if window.is_some() {
            (estimate.minutes - elapsed).max(0)
        } else {
            0
        };

        Some(BulkProgress {
            window,
            estimate,
            percent,
            remaining_minutes,
        })
    }

    /// Closes the active bake with the survey result and files it in history.
    pub fn finish(&mut self, analysis: BakeAnalysis, now: DateTime<Utc>) -> Result<Session> {
        analysis.validate()?;
        let mut session = self
            .active
            .as_ref()
            .map(|record| record.session.clone())
            .ok_or_else(|| anyhow!("no active bake session"))?;

        session
            .logs
            .insert(LogEntry::system(ActionKind::BakingDone, now));
        session.end_time = Some(now);
        session.status = SessionStatus::Finished;
        session.analysis = Some(analysis);

        // Memory only moves on once both writes landed
        let mut history = self.history.clone();
        history.upsert(session.clone());
        save_json(&self.store, HISTORY_KEY, &history)?;
        self.store.remove(ACTIVE_SESSION_KEY)?;

        self.history = history;
        self.active = None;

        log_info!("Finished session {}", session.id);
        Ok(session)
    }

    /// Reopens a finished bake. The history record stays until the resumed
    /// bake finishes again and replaces it.
    pub fn resume(&mut self, id: &str) -> Result<&Session> {
        let mut session = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("no finished bake with id {id}"))?;

        session
            .logs
            .retain(|e| e.action.kind != ActionKind::BakingDone);
        session.status = SessionStatus::Active;
        session.end_time = None;

        if let Some(previous) = &self.active {
            log_warn!(
                "Resuming {} replaces in-progress session {}",
                id,
                previous.session.id
            );
        }
        log_info!("Resumed session {}", id);

        self.active = Some(ActiveSession {
            session,
            tracker: Tracker::new(),
        });
        self.persist_active()?;

        self.session()
            .ok_or_else(|| anyhow!("session vanished after resume"))
    }

    /// Adds a photo reference to the active bake, or to a finished one by id.
    pub fn add_photo(&mut self, reference: String, session_id: Option<&str>) -> Result<()> {
        let active_matches = match (&self.active, session_id) {
            (Some(_), None) => true,
            (Some(record), Some(id)) => record.session.id == id,
            (None, _) => false,
        };

        if active_matches {
            self.active_mut()?.session.photos.push(reference);
            return self.persist_active();
        }

        let id = session_id.ok_or_else(|| anyhow!("no active bake session"))?;
        let mut session = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("no finished bake with id {id}"))?;
        session.photos.push(reference);
        self.history.upsert(session);
        self.persist_history()
    }

    pub fn request_delete_history(&mut self, id: &str) -> Result<()> {
        if self.history.get(id).is_none() {
            bail!("no finished bake with id {id}");
        }
        self.pending_deletion = Some(id.to_string());
        Ok(())
    }

    pub fn confirm_delete_history(&mut self) -> Result<Option<Session>> {
        let Some(id) = self.pending_deletion.take() else {
            return Ok(None);
        };
        let removed = self.history.remove(&id);
        self.persist_history()?;
        if removed.is_some() {
            log_info!("Deleted session {} from history", id);
        }
        Ok(removed)
    }

    pub fn cancel_delete_history(&mut self) -> Option<String> {
        self.pending_deletion.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    fn t(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn analysis() -> BakeAnalysis {
        BakeAnalysis {
            oven_spring: "goed".into(),
            crust: "krokant".into(),
            crumb: "open".into(),
            flavor: "mild".into(),
            sourness: "licht".into(),
            dough_handling: "sterk".into(),
            score: 8,
        }
    }

    fn manager(store: &MemoryStore) -> SessionManager<&MemoryStore> {
        SessionManager::load(store, TrackerSettings::default()).unwrap()
    }

    #[test]
    fn start_seeds_the_log() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        let session = mgr.start(RecipeConfig::default(), t(0), 22.0).unwrap();

        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.logs.len(), 2);
        assert_eq!(session.logs.latest_action().unwrap().action.kind, ActionKind::StarterFed);
        assert!(session
            .logs
            .entries()
            .iter()
            .any(|e| e.action.kind == ActionKind::SessionStarted && !e.is_action()));
        assert!(store.contains(ACTIVE_SESSION_KEY));
    }

    #[test]
    fn start_rejects_invalid_recipe_and_second_session() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        let broken = RecipeConfig {
            spelt_perc: 20.0,
            ..RecipeConfig::default()
        };
        assert!(mgr.start(broken, t(0), 21.0).is_err());
        assert!(!store.contains(ACTIVE_SESSION_KEY));

        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        assert!(mgr.start(RecipeConfig::default(), t(1), 21.0).is_err());
    }

    #[test]
    fn active_session_round_trips_through_storage() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        mgr.log_action(ActionRequest::now(ActionKind::AutolyseStart, 60), t(5))
            .unwrap();
        mgr.log_action(ActionRequest::now(ActionKind::Laminate, 30), t(10))
            .unwrap();
        let before = mgr.active().cloned().unwrap();

        let reloaded = manager(&store);
        let after = reloaded.active().cloned().unwrap();
        assert_eq!(after, before);
        assert_eq!(after.session.status, SessionStatus::Active);
        // The pending guard survives, so a later run can confirm it.
        assert!(matches!(reloaded.prompt(), Some(Prompt::Guard { .. })));
    }

    #[test]
    fn guard_flow_through_manager() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        mgr.log_shortcut(ActionKind::AutolyseStart, t(1)).unwrap();
        let before = mgr.session().unwrap().logs.len();

        let outcome = mgr.log_shortcut(ActionKind::Laminate, t(20)).unwrap();
        assert!(matches!(outcome, LogOutcome::Guarded { .. }));
        assert_eq!(mgr.session().unwrap().logs.len(), before);

        mgr.confirm(t(21)).unwrap();
        let session = mgr.session().unwrap();
        assert_eq!(session.logs.len(), before + 1);
        assert_eq!(session.logs.count_kind(ActionKind::Laminate), 1);
        let timer = mgr.active().unwrap().tracker.timer().active().unwrap();
        assert_eq!(timer.action.kind, ActionKind::Laminate);
    }

    #[test]
    fn finish_files_history_and_clears_active_record() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        mgr.log_shortcut(ActionKind::OvenIn, t(600)).unwrap();

        assert!(mgr.finish(analysis(), t(700)).is_ok());
        assert!(mgr.active().is_none());
        assert!(!store.contains(ACTIVE_SESSION_KEY));
        assert_eq!(mgr.history().len(), 1);

        let finished = &mgr.history().sessions()[0];
        assert_eq!(finished.status, SessionStatus::Finished);
        assert_eq!(finished.end_time, Some(t(700)));
        assert_eq!(finished.analysis.as_ref().map(|a| a.score), Some(8));
        assert_eq!(finished.logs.count_kind(ActionKind::BakingDone), 1);

        let reloaded = manager(&store);
        assert!(reloaded.active().is_none());
        assert_eq!(reloaded.history().len(), 1);
    }

    /// Refuses history writes while `broken` is set.
    struct FlakyStore {
        inner: MemoryStore,
        broken: Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.broken.get() && key == HISTORY_KEY {
                return Err(anyhow!("disk full"));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_finish_keeps_the_active_bake() {
        let store = FlakyStore {
            inner: MemoryStore::new(),
            broken: Cell::new(false),
        };
        let mut mgr = SessionManager::load(&store, TrackerSettings::default()).unwrap();
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        mgr.log_shortcut(ActionKind::OvenIn, t(600)).unwrap();

        store.broken.set(true);
        assert!(mgr.finish(analysis(), t(700)).is_err());
        let active = &mgr.active().unwrap().session;
        assert_eq!(active.status, SessionStatus::Active);
        assert_eq!(active.logs.count_kind(ActionKind::BakingDone), 0);
        assert!(mgr.history().is_empty());
        assert!(store.inner.contains(ACTIVE_SESSION_KEY));

        store.broken.set(false);
        assert!(mgr.finish(analysis(), t(710)).is_ok());
        assert!(mgr.active().is_none());
        assert_eq!(mgr.history().len(), 1);
    }

    #[test]
    fn finish_requires_a_valid_survey() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        let mut bad = analysis();
        bad.score = 0;
        assert!(mgr.finish(bad, t(10)).is_err());
        assert!(mgr.active().is_some());
    }

    #[test]
    fn resume_strips_terminal_entry_and_overwrites_on_refinish() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        let id = mgr.session().unwrap().id.clone();
        mgr.finish(analysis(), t(700)).unwrap();

        let resumed = mgr.resume(&id).unwrap();
        assert_eq!(resumed.status, SessionStatus::Active);
        assert!(resumed.end_time.is_none());
        assert_eq!(resumed.logs.count_kind(ActionKind::BakingDone), 0);
        assert_eq!(
            mgr.find_history(&id).map(|s| s.status),
            Some(SessionStatus::Finished)
        );

        mgr.log_shortcut(ActionKind::Refrigerate, t(710)).unwrap();
        mgr.finish(analysis(), t(720)).unwrap();
        assert_eq!(mgr.history().len(), 1);
        let refinished = mgr.find_history(&id).unwrap();
        assert_eq!(refinished.end_time, Some(t(720)));
        assert_eq!(refinished.logs.count_kind(ActionKind::BakingDone), 1);
        assert_eq!(refinished.logs.count_kind(ActionKind::Refrigerate), 1);
    }

    #[test]
    fn history_delete_needs_confirmation() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        let id = mgr.session().unwrap().id.clone();
        mgr.finish(analysis(), t(100)).unwrap();

        mgr.request_delete_history(&id).unwrap();
        assert_eq!(mgr.cancel_delete_history(), Some(id.clone()));
        assert!(mgr.confirm_delete_history().unwrap().is_none());
        assert_eq!(mgr.history().len(), 1);

        mgr.request_delete_history(&id).unwrap();
        assert!(mgr.confirm_delete_history().unwrap().is_some());
        assert!(mgr.history().is_empty());
        assert!(mgr.request_delete_history(&id).is_err());
        assert!(manager(&store).history().is_empty());
    }

    #[test]
    fn photos_on_finished_bake_update_history() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        mgr.add_photo("crumb.jpg".into(), None).unwrap();
        let id = mgr.session().unwrap().id.clone();
        mgr.finish(analysis(), t(100)).unwrap();

        mgr.add_photo("crust.jpg".into(), Some(&id)).unwrap();
        let reloaded = manager(&store);
        assert_eq!(
            reloaded.find_history(&id).unwrap().photos,
            vec!["crumb.jpg".to_string(), "crust.jpg".to_string()]
        );
        assert!(mgr.add_photo("x.jpg".into(), None).is_err());
    }

    #[test]
    fn rest_timer_uses_remaining_estimate() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        mgr.log_action(ActionRequest::at(ActionKind::MixComplete, t(0)), t(0))
            .unwrap();

        let progress = mgr.bulk_progress(t(120)).unwrap();
        assert_eq!(progress.estimate.minutes, 420);
        assert_eq!(progress.remaining_minutes, 300);
        assert!(!progress.window.as_ref().unwrap().is_finished);

        mgr.log_rest(t(120)).unwrap();
        let timer = mgr.active().unwrap().tracker.timer().active().unwrap();
        assert_eq!(timer.action.kind, ActionKind::BulkRest);
        assert_eq!(timer.target_time, t(420));
    }

    #[test]
    fn estimator_can_be_tuned() {
        let store = MemoryStore::new();
        let estimator = EstimatorConfig {
            baseline_minutes: 300.0,
            ..EstimatorConfig::default()
        };
        let mut mgr = manager(&store).with_estimator(estimator);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        let progress = mgr.bulk_progress(t(0)).unwrap();
        assert_eq!(progress.estimate.minutes, 300);
        assert!(progress.window.is_none());
        assert_eq!(progress.remaining_minutes, 0);
    }

    #[test]
    fn tick_clears_elapsed_timer_and_persists() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        mgr.log_shortcut(ActionKind::Preshape, t(10)).unwrap();
        assert!(mgr.tick(t(20)).unwrap().is_none());
        assert!(mgr.tick(t(30)).unwrap().is_some());
        assert!(!manager(&store).active().unwrap().tracker.timer().is_set());
    }

    #[test]
    fn operations_without_session_fail_cleanly() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        assert!(mgr.log_shortcut(ActionKind::Laminate, t(0)).is_err());
        mgr.start(RecipeConfig::default(), t(0), 21.0).unwrap();
        assert!(mgr.log_shortcut(ActionKind::BakingDone, t(1)).is_err());
        assert_eq!(mgr.session().unwrap().logs.len(), 2);
    }

    #[test]
    fn idle_manager_has_nothing_to_report() {
        let store = MemoryStore::new();
        let mut mgr = manager(&store);
        assert!(mgr.finish(analysis(), t(0)).is_err());
        assert!(mgr.tick(t(0)).unwrap().is_none());
        assert!(mgr.current_phase(t(0)).is_none());
        assert!(mgr.bulk_progress(t(0)).is_none());
    }
}
