use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use super::{
    paths, render, watch, Cli, Commands, HistoryCommands, NoteCommands, PhotoCommands,
    RecipeArgs, RecipeCommands, TimerCommands,
};
use crate::{
    log_debug,
    models::{ActionId, ActionKind, BakeAnalysis, SessionLog, NOTE_TAGS},
    recipe::RecipeConfig,
    report::SessionReport,
    session::{RecipeBook, SessionManager},
    settings::SettingsStore,
    store::SqliteStore,
    tracker::{ActionRequest, LogOutcome},
};

const ENABLE_LOGS: bool = true;

/// Storage handles opened once per invocation.
pub struct App {
    pub store: SqliteStore,
    pub settings: SettingsStore,
}

impl App {
    pub fn open() -> Result<Self> {
        let dir = paths::data_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        let store = SqliteStore::open(dir.join(paths::DATABASE_FILE))?;
        log_debug!("Using database {}", store.path().display());

        Ok(Self {
            store,
            settings: SettingsStore::new(dir.join(paths::SETTINGS_FILE))?,
        })
    }

    fn manager(&self) -> Result<SessionManager<&SqliteStore>> {
        SessionManager::load(&self.store, self.settings.current())
    }

    fn recipes(&self) -> Result<RecipeBook<&SqliteStore>> {
        RecipeBook::load(&self.store)
    }
}

/// Asks a yes/no question on the terminal. `--yes` answers for the user;
/// without a terminal the answer is no.
fn ask(question: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Ok(false);
    }

    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "j" | "ja"))
}

/// Resolves the prompt the last operation opened. Without a terminal (and
/// without `--yes`) it stays open for a later `confirm`/`cancel`.
fn settle_prompt(
    manager: &mut SessionManager<&SqliteStore>,
    yes: bool,
    now: DateTime<Utc>,
    fallback: &str,
) -> Result<()> {
    let Some(prompt) = manager.prompt().cloned() else {
        return Ok(());
    };
    if !yes && !io::stdin().is_terminal() {
        println!("{fallback}");
        return Ok(());
    }

    if ask(&prompt.to_string(), yes)? {
        let outcome = manager.confirm(now)?;
        println!("{}", render::confirm_outcome(&outcome));
    } else {
        manager.cancel()?;
        println!("Cancelled");
    }
    Ok(())
}

/// Newest entry carrying `action`, unless an exact time was given.
fn entry_time(logs: &SessionLog, action: &ActionId, time: Option<DateTime<Utc>>) -> Result<DateTime<Utc>> {
    if let Some(time) = time {
        return Ok(time);
    }
    logs.entries()
        .iter()
        .find(|e| &e.action == action)
        .map(|e| e.time)
        .ok_or_else(|| anyhow!("no log entry for {action}"))
}

fn apply_recipe_args(mut config: RecipeConfig, args: RecipeArgs) -> RecipeConfig {
    if let Some(v) = args.weight {
        config.target_weight = v;
    }
    if let Some(v) = args.hydration {
        config.hydration = v;
    }
    if let Some(v) = args.inoculation {
        config.inoculation = v;
    }
    if let Some(v) = args.salt {
        config.salt = v;
    }
    if let Some(v) = args.wheat {
        config.wheat_perc = v;
    }
    if let Some(v) = args.whole_wheat {
        config.whole_wheat_perc = v;
    }
    if let Some(v) = args.spelt {
        config.spelt_perc = v;
    }
    if let Some(v) = args.starter {
        config.starter_type = v.into();
    }
    if let Some(v) = args.buffer {
        config.starter_buffer = v;
    }
    if let Some(flour) = args.fill {
        config.fill_remainder(flour.into());
    }
    config
}

pub fn execute(cli: Cli) -> Result<()> {
    let app = App::open()?;
    let yes = cli.yes;
    let now = Utc::now();

    match cli.command {
        Commands::Start {
            temperature,
            at,
            preset,
        } => {
            let mut book = app.recipes()?;
            if let Some(name) = preset {
                book.load_preset(&name)?;
            }
            let mut manager = app.manager()?;
            let temperature = temperature.unwrap_or(manager.settings().default_temperature);
            let session = manager.start(book.config().clone(), at.unwrap_or(now), temperature)?;
            println!("Started {} ({})", session.name, session.id);
        }
        Commands::Log {
            action,
            wait,
            at,
            force,
        } => {
            let kind: ActionKind = action.parse()?;
            let mut manager = app.manager()?;
            let mut request = match at {
                Some(at) => ActionRequest::at(kind, at),
                None => ActionRequest::now(
                    kind,
                    wait.unwrap_or_else(|| manager.default_wait_minutes(kind, now)),
                ),
            };
            if force {
                request = request.forced();
            }

            let outcome = manager.log_action(request, now)?;
            let message = render::log_outcome(&outcome);
            match outcome {
                LogOutcome::Guarded { .. } => settle_prompt(&mut manager, yes, now, &message)?,
                _ => println!("{message}"),
            }
        }
        Commands::Confirm => {
            let outcome = app.manager()?.confirm(now)?;
            println!("{}", render::confirm_outcome(&outcome));
        }
        Commands::Cancel => match app.manager()?.cancel()? {
            Some(prompt) => println!("Dismissed: {prompt}"),
            None => println!("Nothing to cancel"),
        },
        Commands::Proof { path } => {
            let outcome = app.manager()?.choose_proof(path.into(), now)?;
            println!("{}", render::log_outcome(&outcome));
        }
        Commands::Undo => {
            let mut manager = app.manager()?;
            if manager.request_undo()? {
                settle_prompt(
                    &mut manager,
                    yes,
                    now,
                    "Undo is waiting: run `desem confirm` or `desem cancel`.",
                )?;
            } else {
                println!("Nothing to undo");
            }
        }
        Commands::Timer { cmd } => {
            let mut manager = app.manager()?;
            match cmd {
                TimerCommands::Stop => match manager.stop_timer()? {
                    Some(timer) => println!("Stopped: {}", timer.label()),
                    None => println!("No timer running"),
                },
                TimerCommands::Delete => {
                    let running = manager
                        .active()
                        .and_then(|a| a.tracker.timer().active().cloned())
                        .ok_or_else(|| anyhow!("no timer running"))?;
                    if ask(&format!("Delete {} and its timer?", running.action), yes)? {
                        if let Some(entry) = manager.delete_timed_action()? {
                            println!("Removed {}", entry.action);
                        }
                    } else {
                        println!("Cancelled");
                    }
                }
            }
        }
        Commands::Note { cmd } => match cmd {
            NoteCommands::Add { action, text, time } => {
                let mut manager = app.manager()?;
                let id: ActionId = action.parse()?;
                let session = manager.session().ok_or_else(|| anyhow!("no active bake session"))?;
                let time = entry_time(&session.logs, &id, time)?;
                if manager.attach_note(time, &id, &text)? {
                    println!("Note added to {id}");
                } else {
                    println!("Nothing added");
                }
            }
            NoteCommands::Remove { action, text, time } => {
                let mut manager = app.manager()?;
                let id: ActionId = action.parse()?;
                let session = manager.session().ok_or_else(|| anyhow!("no active bake session"))?;
                let time = entry_time(&session.logs, &id, time)?;
                if manager.remove_note(time, &id, &text)? {
                    println!("Note removed from {id}");
                } else {
                    println!("No such note on {id}");
                }
            }
            NoteCommands::Tags => {
                for tag in NOTE_TAGS {
                    println!("{tag}");
                }
            }
        },
        Commands::Photo { cmd } => match cmd {
            PhotoCommands::Add { reference, session } => {
                app.manager()?.add_photo(reference, session.as_deref())?;
                println!("Photo added");
            }
        },
        Commands::Status => {
            print!("{}", render::status(&app.manager()?, now));
        }
        Commands::Watch => {
            watch::run(&app.store, app.settings.current())?;
        }
        Commands::Finish {
            oven_spring,
            crust,
            crumb,
            flavor,
            sourness,
            dough_handling,
            score,
        } => {
            let analysis = BakeAnalysis {
                oven_spring,
                crust,
                crumb,
                flavor,
                sourness,
                dough_handling,
                score,
            };
            let session = app.manager()?.finish(analysis, now)?;
            println!("Finished {} ({})\n", session.name, session.id);
            print!("{}", SessionReport::build(&session, now));
        }
        Commands::Resume { id } => {
            let mut manager = app.manager()?;
            let session = manager.resume(&id)?;
            println!("Resumed {} ({})", session.name, session.id);
        }
        Commands::History { cmd } => {
            let mut manager = app.manager()?;
            match cmd {
                HistoryCommands::List => {
                    if manager.history().is_empty() {
                        println!("No finished bakes");
                    }
                    for session in manager.history().sessions() {
                        println!("{}", render::history_line(session));
                    }
                }
                HistoryCommands::Show { id } => {
                    let session = manager
                        .find_history(&id)
                        .ok_or_else(|| anyhow!("no finished bake with id {id}"))?;
                    print!("{}", SessionReport::build(session, now));
                }
                HistoryCommands::Delete { id } => {
                    manager.request_delete_history(&id)?;
                    if ask(&format!("Delete bake {id} from history?"), yes)? {
                        if let Some(session) = manager.confirm_delete_history()? {
                            println!("Deleted {}", session.name);
                        }
                    } else {
                        manager.cancel_delete_history();
                        println!("Cancelled");
                    }
                }
            }
        }
        Commands::Recipe { cmd } => {
            let mut book = app.recipes()?;
            match cmd {
                RecipeCommands::Show => {
                    print!("{}", render::recipe(book.config(), book.active_recipe()));
                }
                RecipeCommands::Set(args) => {
                    let config = apply_recipe_args(book.config().clone(), args);
                    book.set_config(config)?;
                    print!("{}", render::recipe(book.config(), book.active_recipe()));
                }
                RecipeCommands::Presets => {
                    for preset in book.presets() {
                        let active = book.active_recipe() == Some(preset.name.as_str());
                        println!("{}", render::preset_line(preset, active));
                    }
                }
                RecipeCommands::SavePreset { name } => {
                    book.save_preset(&name)?;
                    println!("Saved preset '{}'", name.trim());
                }
                RecipeCommands::LoadPreset { name } => {
                    book.load_preset(&name)?;
                    print!("{}", render::recipe(book.config(), book.active_recipe()));
                }
                RecipeCommands::DeletePreset { name } => {
                    book.request_delete_preset(&name)?;
                    if ask(&format!("Delete preset '{name}'?"), yes)? {
                        if let Some(preset) = book.confirm_delete_preset()? {
                            println!("Deleted preset '{}'", preset.name);
                        }
                    } else {
                        book.cancel_delete_preset();
                        println!("Cancelled");
                    }
                }
            }
        }
    }

    Ok(())
}
