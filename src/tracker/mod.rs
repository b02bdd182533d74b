pub mod machine;
pub mod phase;
pub mod prompt;

pub use machine::{attach_note, remove_note, ConfirmOutcome, LogOutcome, Tracker};
pub use phase::{current_phase, CurrentPhase, PhaseDisplay};
pub use prompt::{ActionRequest, ProofPath, Prompt};
