pub mod state;

pub use state::{ActiveTimer, TimerState, TimerStatus};
