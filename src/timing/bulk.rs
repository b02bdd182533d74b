use chrono::{DateTime, Utc};
use serde::Serialize;

use super::duration::{format_duration, minutes_between};
use crate::models::{ActionKind, SessionLog};

/// Bulk rise measured from `Mixen Compleet` to the first closing marker.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkRiseWindow {
    pub text: String,
    pub minutes: i64,
    pub start_time: DateTime<Utc>,
    /// A closing marker was logged; `minutes` no longer moves with time.
    pub is_finished: bool,
}

/// Returns `None` when mixing has not been logged yet.
///
/// Without a closing marker the window runs until `fallback_now`.
pub fn bulk_rise_window(logs: &SessionLog, fallback_now: DateTime<Utc>) -> Option<BulkRiseWindow> {
    let start = logs
        .entries()
        .iter()
        .find(|e| e.action.kind == ActionKind::MixComplete)?;

    // Entries are newest first, so the last match is the earliest marker.
    let end = logs
        .entries()
        .iter()
        .filter(|e| e.action.kind.ends_bulk_rise() && e.time >= start.time)
        .last();

    let end_time = end.map(|e| e.time).unwrap_or(fallback_now);
    Some(BulkRiseWindow {
        text: format_duration(Some(start.time), Some(end_time)),
        minutes: minutes_between(Some(start.time), Some(end_time)).max(0),
        start_time: start.time,
        is_finished: end.is_some(),
    })
}
