//! Session log: the ordered record of what happened when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::{ActionId, ActionKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EntryType {
    Action,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub action: ActionId,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl LogEntry {
    pub fn action(action: impl Into<ActionId>, time: DateTime<Utc>) -> Self {
        Self {
            action: action.into(),
            time,
            entry_type: EntryType::Action,
            notes: Vec::new(),
        }
    }

    pub fn system(kind: ActionKind, time: DateTime<Utc>) -> Self {
        Self {
            action: ActionId::plain(kind),
            time,
            entry_type: EntryType::System,
            notes: Vec::new(),
        }
    }

    pub fn is_action(&self) -> bool {
        self.entry_type == EntryType::Action
    }

    /// Appends a trimmed note. Blank or duplicate text is ignored.
    pub fn add_note(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.notes.iter().any(|n| n == text) {
            return false;
        }
        self.notes.push(text.to_string());
        true
    }

    pub fn remove_note(&mut self, text: &str) -> bool {
        let text = text.trim();
        match self.notes.iter().position(|n| n == text) {
            Some(index) => {
                self.notes.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Log entries kept newest-first at all times.
///
/// Entries with equal timestamps keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "Vec<LogEntry>", into = "Vec<LogEntry>")]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl From<Vec<LogEntry>> for SessionLog {
    fn from(mut entries: Vec<LogEntry>) -> Self {
        entries.sort_by(|a, b| b.time.cmp(&a.time));
        Self { entries }
    }
}

impl From<SessionLog> for Vec<LogEntry> {
    fn from(log: SessionLog) -> Self {
        log.entries
    }
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: LogEntry) {
        let index = self.entries.partition_point(|e| e.time >= entry.time);
        self.entries.insert(index, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Oldest first, for reports.
    pub fn chronological(&self) -> Vec<&LogEntry> {
        let mut ordered: Vec<&LogEntry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| a.time.cmp(&b.time));
        ordered
    }

    /// Action entries newest first.
    pub fn timeline(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.is_action())
    }

    pub fn latest_action(&self) -> Option<&LogEntry> {
        self.timeline().next()
    }

    pub fn count_kind(&self, kind: ActionKind) -> usize {
        self.entries.iter().filter(|e| e.action.kind == kind).count()
    }

    pub fn remove_latest_action(&mut self) -> Option<LogEntry> {
        let index = self.entries.iter().position(|e| e.is_action())?;
        Some(self.entries.remove(index))
    }

    /// Removes the newest entry carrying `action`.
    pub fn remove_first(&mut self, action: &ActionId) -> Option<LogEntry> {
        let index = self.entries.iter().position(|e| &e.action == action)?;
        Some(self.entries.remove(index))
    }

    pub fn find_mut(&mut self, time: DateTime<Utc>, action: &ActionId) -> Option<&mut LogEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.time == time && &e.action == action)
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&LogEntry) -> bool,
    {
        self.entries.retain(keep);
    }
}
