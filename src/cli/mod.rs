pub mod commands;
pub mod paths;
pub mod render;
pub mod watch;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use crate::recipe::{FlourKind, StarterType};
use crate::timing::parse_timestamp;
use crate::tracker::ProofPath;

#[derive(Parser)]
#[command(name = "desem")]
#[command(about = "Sourdough bake tracker: log steps, run timers, estimate bulk rise")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new bake with the saved recipe
    Start {
        /// Ambient temperature in °C (defaults to the configured value)
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Starter feeding time, e.g. 2026-03-01T07:30 (defaults to now)
        #[arg(long, value_parser = parse_time_arg)]
        at: Option<DateTime<Utc>>,

        /// Load this preset before starting
        #[arg(short, long)]
        preset: Option<String>,
    },

    /// Log an action, e.g. `mixen-compleet` or "Stretch & Fold"
    Log {
        action: String,

        /// Wait in minutes before the next step (defaults per action)
        #[arg(short, long)]
        wait: Option<u32>,

        /// Backdate the entry; no timer is started
        #[arg(long, value_parser = parse_time_arg)]
        at: Option<DateTime<Utc>>,

        /// Skip the running-timer confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Confirm the open prompt
    Confirm,

    /// Dismiss the open prompt
    Cancel,

    /// Pick the proof after final shaping
    Proof {
        #[arg(value_enum)]
        path: ProofArg,
    },

    /// Remove the most recent action
    Undo,

    /// Manage the running timer
    Timer {
        #[command(subcommand)]
        cmd: TimerCommands,
    },

    /// Attach or remove notes on a log entry
    Note {
        #[command(subcommand)]
        cmd: NoteCommands,
    },

    /// Attach photos to a bake
    Photo {
        #[command(subcommand)]
        cmd: PhotoCommands,
    },

    /// Show phase, timer, bulk rise and timeline
    Status,

    /// Live view of the active bake
    Watch,

    /// Finish the bake with a short evaluation
    Finish {
        #[arg(long)]
        oven_spring: String,
        #[arg(long)]
        crust: String,
        #[arg(long)]
        crumb: String,
        #[arg(long)]
        flavor: String,
        #[arg(long)]
        sourness: String,
        #[arg(long)]
        dough_handling: String,
        /// Overall score from 1 to 10
        #[arg(long)]
        score: u8,
    },

    /// Reopen a finished bake
    Resume { id: String },

    /// Finished bakes
    History {
        #[command(subcommand)]
        cmd: HistoryCommands,
    },

    /// Recipe, presets and ingredient amounts
    Recipe {
        #[command(subcommand)]
        cmd: RecipeCommands,
    },
}

#[derive(Subcommand)]
pub enum TimerCommands {
    /// Stop the timer and keep the entry
    Stop,
    /// Stop the timer and delete the entry that started it
    Delete,
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Add a note (or tag) to the newest entry of an action
    Add {
        /// Action, e.g. "Stretch & Fold #2"
        action: String,
        text: String,
        /// Exact entry time when the action occurs more than once
        #[arg(long, value_parser = parse_time_arg)]
        time: Option<DateTime<Utc>>,
    },
    /// Remove a note from an entry
    Remove {
        action: String,
        text: String,
        #[arg(long, value_parser = parse_time_arg)]
        time: Option<DateTime<Utc>>,
    },
    /// List the quick tags
    Tags,
}

#[derive(Subcommand)]
pub enum PhotoCommands {
    /// Add a photo reference (path or URL)
    Add {
        reference: String,
        /// Finished bake to attach to (defaults to the active bake)
        #[arg(short, long)]
        session: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List finished bakes, newest first
    List,
    /// Print the report of one bake
    Show { id: String },
    /// Delete a finished bake
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Show the saved recipe and its ingredient amounts
    Show,
    /// Change fields of the saved recipe
    Set(RecipeArgs),
    /// List presets
    Presets,
    /// Save the current recipe as a preset
    SavePreset { name: String },
    /// Make a preset the current recipe
    LoadPreset { name: String },
    /// Delete a preset
    DeletePreset { name: String },
}

#[derive(clap::Args, Default)]
pub struct RecipeArgs {
    /// Dough weight in grams
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub hydration: Option<f64>,
    #[arg(long)]
    pub inoculation: Option<f64>,
    #[arg(long)]
    pub salt: Option<f64>,
    #[arg(long)]
    pub wheat: Option<f64>,
    #[arg(long)]
    pub whole_wheat: Option<f64>,
    #[arg(long)]
    pub spelt: Option<f64>,
    #[arg(long, value_enum)]
    pub starter: Option<StarterArg>,
    /// Extra starter in percent
    #[arg(long)]
    pub buffer: Option<f64>,
    /// Top this flour up so the flours add up to 100%
    #[arg(long, value_enum)]
    pub fill: Option<FlourArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProofArg {
    Cold,
    Room,
}

impl From<ProofArg> for ProofPath {
    fn from(arg: ProofArg) -> Self {
        match arg {
            ProofArg::Cold => ProofPath::Cold,
            ProofArg::Room => ProofPath::Room,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StarterArg {
    Stiff,
    Liquid,
}

impl From<StarterArg> for StarterType {
    fn from(arg: StarterArg) -> Self {
        match arg {
            StarterArg::Stiff => StarterType::Stiff,
            StarterArg::Liquid => StarterType::Liquid,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FlourArg {
    Wheat,
    WholeWheat,
    Spelt,
}

impl From<FlourArg> for FlourKind {
    fn from(arg: FlourArg) -> Self {
        match arg {
            FlourArg::Wheat => FlourKind::Wheat,
            FlourArg::WholeWheat => FlourKind::WholeWheat,
            FlourArg::Spelt => FlourKind::Spelt,
        }
    }
}

fn parse_time_arg(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("unrecognised time '{value}'"))
}
