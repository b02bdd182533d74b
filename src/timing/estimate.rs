use serde::Serialize;

use super::bulk::bulk_rise_window;
use super::config::EstimatorConfig;
use crate::models::Session;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EstimateBasis {
    Theory,
    History { bakes: usize },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkEstimate {
    pub minutes: i64,
    pub basis: EstimateBasis,
}

/// Theoretical bulk rise: inversely proportional to inoculation and scaled by
/// `temp_factor_per_degree` for every degree away from the reference.
pub fn theoretical_minutes(ambient_temp: f64, inoculation: f64, config: &EstimatorConfig) -> f64 {
    let inoculation = if inoculation > 0.0 {
        inoculation
    } else {
        config.baseline_inoculation
    };
    let temp = if ambient_temp.is_finite() {
        ambient_temp
    } else {
        config.baseline_temp_c
    };

    config.baseline_minutes * (config.baseline_inoculation / inoculation)
        * config
            .temp_factor_per_degree
            .powf(temp - config.baseline_temp_c)
}

/// Blends theory with finished bakes from `history` once enough exist.
pub fn estimate_bulk_rise(
    ambient_temp: f64,
    inoculation: f64,
    history: &[Session],
    config: &EstimatorConfig,
) -> BulkEstimate {
    let theory = theoretical_minutes(ambient_temp, inoculation, config);

    let finished: Vec<i64> = history
        .iter()
        .filter_map(|session| {
            let fallback = session.end_time.unwrap_or(session.start_time);
            bulk_rise_window(&session.logs, fallback)
        })
        .filter(|window| window.is_finished && window.minutes > config.min_history_minutes)
        .map(|window| window.minutes)
        .collect();

    if finished.len() < config.min_history_bakes {
        return BulkEstimate {
            minutes: theory.round() as i64,
            basis: EstimateBasis::Theory,
        };
    }

    let average = finished.iter().sum::<i64>() as f64 / finished.len() as f64;
    BulkEstimate {
        minutes: (theory * config.weight_theory + average * config.weight_history).round() as i64,
        basis: EstimateBasis::History {
            bakes: finished.len(),
        },
    }
}

pub fn estimate_bulk_rise_minutes(ambient_temp: f64, inoculation: f64, history: &[Session]) -> i64 {
    estimate_bulk_rise(ambient_temp, inoculation, history, &EstimatorConfig::default()).minutes
}
