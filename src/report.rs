//! Printable summary of one bake.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{ActionId, Session},
    recipe::RecipeConfig,
    timing::{bulk_rise_window, duration::NO_DURATION, format_duration},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub time: DateTime<Utc>,
    pub action: ActionId,
    /// Time since the previous row; `"-"` on the first.
    pub since_previous: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub name: String,
    pub temperature: f64,
    pub recipe: RecipeConfig,
    /// `None` when mixing was never logged.
    pub total_bulk_rise: Option<String>,
    pub photos: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl SessionReport {
    /// An open bake measures an unfinished bulk rise up to `now`.
    pub fn build(session: &Session, now: DateTime<Utc>) -> Self {
        let end = session.end_time.unwrap_or(now);
        let total_bulk_rise = bulk_rise_window(&session.logs, end).map(|w| w.text);

        let chronological = session.logs.chronological();
        let mut previous: Option<DateTime<Utc>> = None;
        let rows = chronological
            .into_iter()
            .map(|entry| {
                let since_previous = match previous {
                    Some(prev) => format_duration(Some(prev), Some(entry.time)),
                    None => NO_DURATION.to_string(),
                };
                previous = Some(entry.time);
                ReportRow {
                    time: entry.time,
                    action: entry.action,
                    since_previous,
                    notes: entry.notes.clone(),
                }
            })
            .collect();

        Self {
            name: session.name.clone(),
            temperature: session.temperature,
            recipe: session.config_snapshot.clone(),
            total_bulk_rise,
            photos: session.photos.clone(),
            rows,
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(
            f,
            "Receptuur ({}g): hydratatie {}%, desem {}%, temp {}°C",
            self.recipe.target_weight, self.recipe.hydration, self.recipe.inoculation, self.temperature
        )?;
        if let Some(bulk) = &self.total_bulk_rise {
            writeln!(f, "Totale bulkrijs: {bulk}")?;
        }
        for photo in &self.photos {
            writeln!(f, "Foto: {photo}")?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(
                f,
                "{}  {:<28} {:>8}",
                row.time.format("%d-%m %H:%M"),
                row.action.to_string(),
                row.since_previous
            )?;
            if !row.notes.is_empty() {
                write!(f, "  [{}]", row.notes.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionKind, LogEntry, SessionLog, SessionStatus};
    use chrono::{Duration, TimeZone};

    fn t(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn session(end_time: Option<DateTime<Utc>>) -> Session {
        let mut logs = SessionLog::new();
        logs.insert(LogEntry::action(ActionKind::StarterFed, t(0)));
        logs.insert(LogEntry::action(ActionKind::MixComplete, t(30)));
        let mut fold = LogEntry::action(ActionId::numbered(ActionKind::StretchAndFold, 1), t(60));
        fold.add_note("Plakkerig");
        logs.insert(fold);
        logs.insert(LogEntry::action(ActionKind::Preshape, t(305)));
        Session {
            id: "bake".into(),
            name: Session::display_name(t(0)),
            start_time: t(0),
            end_time,
            temperature: 22.0,
            logs,
            photos: Vec::new(),
            config_snapshot: RecipeConfig::default(),
            status: SessionStatus::Finished,
            analysis: None,
        }
    }

    #[test]
    fn rows_run_oldest_first_with_gaps() {
        let report = SessionReport::build(&session(Some(t(400))), t(500));
        let gaps: Vec<_> = report.rows.iter().map(|r| r.since_previous.as_str()).collect();
        assert_eq!(gaps, vec!["-", "30m", "30m", "4u 5m"]);
        assert_eq!(report.rows[2].notes, vec!["Plakkerig".to_string()]);
        assert_eq!(report.total_bulk_rise.as_deref(), Some("4u 35m"));
    }

    #[test]
    fn rendered_report_lists_every_entry() {
        let text = SessionReport::build(&session(Some(t(400))), t(500)).to_string();
        assert!(text.starts_with("Desem 01-03-2026"));
        assert!(text.contains("Totale bulkrijs: 4u 35m"));
        assert!(text.contains("Stretch & Fold #1"));
        assert!(text.contains("[Plakkerig]"));
    }

    #[test]
    fn report_without_mixing_has_no_bulk_total() {
        let mut bake = session(None);
        bake.logs.retain(|e| e.action.kind != ActionKind::MixComplete);
        let report = SessionReport::build(&bake, t(500));
        assert!(report.total_bulk_rise.is_none());
        assert_eq!(report.rows.len(), 3);
    }
}
