use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::{
    models::Session,
    recipe::{Preset, RecipeConfig, StarterType},
    session::{BulkProgress, SessionManager},
    store::KeyValueStore,
    timer::TimerStatus,
    timing::EstimateBasis,
    tracker::{ConfirmOutcome, LogOutcome, PhaseDisplay},
};

const TIME_FORMAT: &str = "%d-%m %H:%M";

pub fn log_outcome(outcome: &LogOutcome) -> String {
    match outcome {
        LogOutcome::Logged {
            id,
            time,
            timer_started,
        } => {
            let mut line = format!("Logged {} at {}", id, time.format(TIME_FORMAT));
            if *timer_started {
                line.push_str(" (timer started)");
            }
            line
        }
        LogOutcome::Guarded { pending, running } => format!(
            "Timer for {running} is still running. Log {pending} anyway? \
             Run `desem confirm` or `desem cancel`."
        ),
        LogOutcome::ProofChoiceRaised { id } => format!(
            "Logged {id}. Choose the proof: `desem proof cold` or `desem proof room`."
        ),
        LogOutcome::NoChoicePending => {
            "No proof choice is open; log Final Shape first.".to_string()
        }
    }
}

pub fn confirm_outcome(outcome: &ConfirmOutcome) -> String {
    match outcome {
        ConfirmOutcome::Logged(logged) => log_outcome(logged),
        ConfirmOutcome::Undone(Some(entry)) => format!("Removed {}", entry.action),
        ConfirmOutcome::Undone(None) => "Nothing to undo".to_string(),
        ConfirmOutcome::ChoiceRequired => {
            "Choose the proof first: `desem proof cold` or `desem proof room`.".to_string()
        }
        ConfirmOutcome::NothingPending => "Nothing to confirm".to_string(),
    }
}

fn bulk_line(progress: &BulkProgress) -> String {
    let basis = match progress.estimate.basis {
        EstimateBasis::Theory => "theory".to_string(),
        EstimateBasis::History { bakes } => format!("{bakes} previous bakes"),
    };
    match &progress.window {
        None => format!(
            "Bulk rise: not started (expected {}m, {basis})",
            progress.estimate.minutes
        ),
        Some(window) if window.is_finished => {
            format!("Bulk rise: {} (done)", window.text)
        }
        Some(window) => format!(
            "Bulk rise: {} / {}m ({:.0}%, {}m left, {basis})",
            window.text, progress.estimate.minutes, progress.percent, progress.remaining_minutes
        ),
    }
}

/// Full status block for `status` and `watch`.
pub fn status<S: KeyValueStore>(manager: &SessionManager<S>, now: DateTime<Utc>) -> String {
    let Some(active) = manager.active() else {
        return "No active bake. Start one with `desem start`.".to_string();
    };
    let session = &active.session;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({}°C, started {})",
        session.name,
        session.temperature,
        session.start_time.format(TIME_FORMAT)
    );

    if let Some(phase) = manager.current_phase(now) {
        let detail = match &phase.display {
            PhaseDisplay::At(time) => time.format(TIME_FORMAT).to_string(),
            PhaseDisplay::Elapsed(text) => text.clone(),
        };
        let _ = writeln!(out, "Phase: {} ({detail})", phase.label);
    }

    let timer = active.tracker.timer();
    if let (Some(running), Some(countdown)) = (timer.active(), timer.countdown_text(now)) {
        let marker = match timer.status(now) {
            TimerStatus::Overdue => " [done]",
            _ => "",
        };
        let _ = writeln!(out, "{}: {countdown}{marker}", running.label());
    }

    if let Some(prompt) = active.tracker.prompt() {
        let _ = writeln!(out, "Open prompt: {prompt}");
    }

    if let Some(progress) = manager.bulk_progress(now) {
        let _ = writeln!(out, "{}", bulk_line(&progress));
    }

    let _ = writeln!(out);
    for entry in session.logs.timeline() {
        let _ = write!(out, "{}  {}", entry.time.format(TIME_FORMAT), entry.action);
        if !entry.notes.is_empty() {
            let _ = write!(out, "  [{}]", entry.notes.join(", "));
        }
        let _ = writeln!(out);
    }
    out
}

pub fn history_line(session: &Session) -> String {
    let score = session
        .analysis
        .as_ref()
        .map(|a| format!("{}/10", a.score))
        .unwrap_or_else(|| "-".to_string());
    format!("{}  {}  {}°C  {}", session.id, session.name, session.temperature, score)
}

pub fn recipe(config: &RecipeConfig, active_recipe: Option<&str>) -> String {
    let r = config.calculate();
    let starter = match config.starter_type {
        StarterType::Stiff => "stiff (1:5:2.5)",
        StarterType::Liquid => "liquid (1:5:5)",
    };
    let mut out = String::new();
    if let Some(name) = active_recipe {
        let _ = writeln!(out, "Preset: {name}");
    }
    let _ = writeln!(
        out,
        "{}g, hydration {}%, inoculation {}%, salt {}%, buffer {}%",
        config.target_weight, config.hydration, config.inoculation, config.salt, config.starter_buffer
    );
    let _ = writeln!(
        out,
        "Flour: wheat {}%, whole wheat {}%, spelt {}%",
        config.wheat_perc, config.whole_wheat_perc, config.spelt_perc
    );
    let _ = writeln!(out, "\nStarter {starter}: build {:.0}g", r.starter_to_make);
    let _ = writeln!(
        out,
        "  old starter {:.0}g, flour {:.0}g, water {:.0}g (left over {:.0}g)",
        r.feed_old_starter, r.feed_flour, r.feed_water, r.starter_left_over
    );
    let _ = writeln!(out, "\nDough:");
    let _ = writeln!(out, "  starter     {:>6.0}g", r.total_starter);
    let _ = writeln!(out, "  wheat       {:>6.0}g", r.dough_wheat);
    let _ = writeln!(out, "  whole wheat {:>6.0}g", r.dough_whole_wheat);
    let _ = writeln!(out, "  spelt       {:>6.0}g", r.dough_spelt);
    let _ = writeln!(out, "  water       {:>6.0}g", r.dough_water);
    let _ = writeln!(out, "  salt        {:>6.1}g", r.total_salt);
    out
}

pub fn preset_line(preset: &Preset, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    format!(
        "{marker} {}  ({}g, {}% hydration)",
        preset.name, preset.config.target_weight, preset.config.hydration
    )
}
