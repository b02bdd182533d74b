use serde::{Deserialize, Serialize};

use crate::models::Session;

/// Finished bakes keyed by session id, newest insert first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct History {
    sessions: Vec<Session>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record sharing `session.id`.
    pub fn upsert(&mut self, session: Session) {
        self.sessions.retain(|s| s.id != session.id);
        self.sessions.insert(0, session);
    }

    pub fn remove(&mut self, id: &str) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.id == id)?;
        Some(self.sessions.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionLog, SessionStatus};
    use crate::recipe::RecipeConfig;
    use chrono::{TimeZone, Utc};

    fn bake(id: &str, temperature: f64) -> Session {
        let start_time = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        Session {
            id: id.into(),
            name: Session::display_name(start_time),
            start_time,
            end_time: Some(start_time),
            temperature,
            logs: SessionLog::new(),
            photos: Vec::new(),
            config_snapshot: RecipeConfig::default(),
            status: SessionStatus::Finished,
            analysis: None,
        }
    }

    #[test]
    fn upsert_replaces_by_id_and_moves_to_front() {
        let mut history = History::new();
        history.upsert(bake("a", 20.0));
        history.upsert(bake("b", 21.0));
        history.upsert(bake("a", 23.0));

        assert_eq!(history.len(), 2);
        assert_eq!(history.sessions()[0].id, "a");
        assert_eq!(history.get("a").map(|s| s.temperature), Some(23.0));
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut history = History::new();
        history.upsert(bake("a", 20.0));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        let back: History = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
        assert!(history.remove("missing").is_none());
    }
}
