//! Bake session records.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log::SessionLog;
use crate::recipe::RecipeConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Active,
    Finished,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Finished => "finished",
        }
    }
}

/// Post-bake evaluation collected by the survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BakeAnalysis {
    pub oven_spring: String,
    pub crust: String,
    pub crumb: String,
    pub flavor: String,
    pub sourness: String,
    pub dough_handling: String,
    pub score: u8,
}

impl BakeAnalysis {
    pub const MIN_SCORE: u8 = 1;
    pub const MAX_SCORE: u8 = 10;

    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_SCORE..=Self::MAX_SCORE).contains(&self.score) {
            bail!(
                "score must be between {} and {}, got {}",
                Self::MIN_SCORE,
                Self::MAX_SCORE,
                self.score
            );
        }

        let answers = [
            ("oven spring", &self.oven_spring),
            ("crust", &self.crust),
            ("crumb", &self.crumb),
            ("flavor", &self.flavor),
            ("sourness", &self.sourness),
            ("dough handling", &self.dough_handling),
        ];
        for (field, value) in answers {
            if value.trim().is_empty() {
                bail!("{field} answer is required");
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Ambient temperature in °C when the bake started.
    pub temperature: f64,
    pub logs: SessionLog,
    #[serde(default)]
    pub photos: Vec<String>,
    pub config_snapshot: RecipeConfig,
    pub status: SessionStatus,
    #[serde(default)]
    pub analysis: Option<BakeAnalysis>,
}

impl Session {
    pub fn display_name(start_time: DateTime<Utc>) -> String {
        format!("Desem {}", start_time.format("%d-%m-%Y"))
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}
