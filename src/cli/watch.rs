use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::{self, Duration, MissedTickBehavior};

use super::render;
use crate::{
    log_error, log_info,
    session::SessionManager,
    settings::TrackerSettings,
    store::SqliteStore,
};

const ENABLE_LOGS: bool = true;

const REDRAW_INTERVAL: Duration = Duration::from_secs(1);

/// Redraws the status every second and runs the timer completion check
/// every `timer_check_secs` until Ctrl-C.
///
/// State is reloaded on every tick so commands from another shell show up.
pub fn run(store: &SqliteStore, settings: TrackerSettings) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the watch runtime")?;
    runtime.block_on(watch_loop(store, settings))
}

async fn watch_loop(store: &SqliteStore, settings: TrackerSettings) -> Result<()> {
    let mut redraw = time::interval(REDRAW_INTERVAL);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut check = time::interval(Duration::from_secs(settings.timer_check_secs.max(1)));
    check.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = redraw.tick() => {
                redraw_status(store, &settings);
            }
            _ = check.tick() => {
                let completed = SessionManager::load(store, settings.clone())
                    .and_then(|mut manager| manager.tick(Utc::now()));
                match completed {
                    Ok(Some(timer)) => {
                        log_info!("{} finished", timer.label());
                        // Terminal bell.
                        print!("\x07");
                    }
                    Ok(None) => {}
                    Err(err) => log_error!("timer completion check failed: {err:#}"),
                }
            }
            _ = &mut shutdown => {
                log_info!("watch stopped");
                break;
            }
        }
    }
    Ok(())
}

/// Draws one status frame. Failures are logged so the loop keeps running.
fn redraw_status(store: &SqliteStore, settings: &TrackerSettings) -> bool {
    let drawn = SessionManager::load(store, settings.clone())
        .and_then(|manager| draw(&render::status(&manager, Utc::now())));
    if let Err(err) = &drawn {
        log_error!("status redraw failed: {err:#}");
    }
    drawn.is_ok()
}

fn draw(status: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H{status}\nCtrl-C to stop\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, ACTIVE_SESSION_KEY};

    #[test]
    fn redraw_survives_unreadable_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("desem.db")).unwrap();
        let settings = TrackerSettings::default();

        store.set(ACTIVE_SESSION_KEY, "{ half a record").unwrap();
        assert!(!redraw_status(&store, &settings));
        assert!(!redraw_status(&store, &settings));

        store.remove(ACTIVE_SESSION_KEY).unwrap();
        assert!(redraw_status(&store, &settings));
    }
}
