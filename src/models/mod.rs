pub mod action;
pub mod log;
pub mod session;

pub use action::{ActionId, ActionKind, NOTE_TAGS};
pub use log::{EntryType, LogEntry, SessionLog};
pub use session::{BakeAnalysis, Session, SessionStatus};
