//! Recipe configuration and baker's-percentage maths.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StarterType {
    /// 50% hydration, fed 1:5:2.5.
    Stiff,
    /// 100% hydration, fed 1:5:5.
    Liquid,
}

impl StarterType {
    fn hydration(&self) -> f64 {
        match self {
            StarterType::Stiff => 50.0,
            StarterType::Liquid => 100.0,
        }
    }

    /// (old starter, flour, water) parts of a feed.
    fn feed_ratio(&self) -> (f64, f64, f64) {
        match self {
            StarterType::Stiff => (1.0, 5.0, 2.5),
            StarterType::Liquid => (1.0, 5.0, 5.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeConfig {
    /// Final dough weight in grams.
    pub target_weight: f64,
    pub hydration: f64,
    /// Starter as a percentage of total flour.
    pub inoculation: f64,
    pub salt: f64,
    pub wheat_perc: f64,
    pub whole_wheat_perc: f64,
    pub spelt_perc: f64,
    pub starter_type: StarterType,
    /// Extra starter to build on top of what the dough needs, in percent.
    pub starter_buffer: f64,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            target_weight: 1000.0,
            hydration: 68.0,
            inoculation: 20.0,
            salt: 2.0,
            wheat_perc: 90.0,
            whole_wheat_perc: 10.0,
            spelt_perc: 0.0,
            starter_type: StarterType::Stiff,
            starter_buffer: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlourKind {
    Wheat,
    WholeWheat,
    Spelt,
}

const PERCENT_TOLERANCE: f64 = 0.01;

impl RecipeConfig {
    pub fn flour_total_perc(&self) -> f64 {
        self.wheat_perc + self.whole_wheat_perc + self.spelt_perc
    }

    pub fn validate(&self) -> Result<()> {
        let total = self.flour_total_perc();
        if (total - 100.0).abs() > PERCENT_TOLERANCE {
            bail!("flour percentages must add up to 100%, got {total}%");
        }
        if self.target_weight <= 0.0 {
            bail!("target weight must be positive");
        }
        for (name, value) in [
            ("hydration", self.hydration),
            ("inoculation", self.inoculation),
            ("salt", self.salt),
            ("starter buffer", self.starter_buffer),
        ] {
            if value < 0.0 {
                bail!("{name} cannot be negative");
            }
        }
        Ok(())
    }

    /// Percentage `kind` needs so that all flours add up to 100.
    pub fn remainder_for(&self, kind: FlourKind) -> f64 {
        let others = match kind {
            FlourKind::Wheat => self.whole_wheat_perc + self.spelt_perc,
            FlourKind::WholeWheat => self.wheat_perc + self.spelt_perc,
            FlourKind::Spelt => self.wheat_perc + self.whole_wheat_perc,
        };
        (100.0 - others).max(0.0)
    }

    pub fn fill_remainder(&mut self, kind: FlourKind) {
        let value = self.remainder_for(kind);
        match kind {
            FlourKind::Wheat => self.wheat_perc = value,
            FlourKind::WholeWheat => self.whole_wheat_perc = value,
            FlourKind::Spelt => self.spelt_perc = value,
        }
    }

    pub fn calculate(&self) -> RecipeBreakdown {
        let total_flour =
            self.target_weight / (1.0 + self.hydration / 100.0 + self.salt / 100.0);
        let total_water = total_flour * self.hydration / 100.0;
        let total_salt = total_flour * self.salt / 100.0;
        let total_starter = total_flour * self.inoculation / 100.0;

        let flour_in_starter = total_starter / (1.0 + self.starter_type.hydration() / 100.0);
        let water_in_starter = total_starter - flour_in_starter;

        let starter_to_make = total_starter * (1.0 + self.starter_buffer / 100.0);
        let (old_parts, flour_parts, water_parts) = self.starter_type.feed_ratio();
        let unit = starter_to_make / (old_parts + flour_parts + water_parts);

        let needed_wheat = total_flour * self.wheat_perc / 100.0;
        let needed_whole_wheat = total_flour * self.whole_wheat_perc / 100.0;
        let needed_spelt = total_flour * self.spelt_perc / 100.0;

        // Starter flour is taken out of wheat first, then whole wheat, then spelt.
        let mut to_subtract = flour_in_starter;
        let dough_wheat = (needed_wheat - to_subtract).max(0.0);
        to_subtract = (to_subtract - needed_wheat).max(0.0);
        let dough_whole_wheat = (needed_whole_wheat - to_subtract).max(0.0);
        to_subtract = (to_subtract - needed_whole_wheat).max(0.0);
        let dough_spelt = (needed_spelt - to_subtract).max(0.0);

        RecipeBreakdown {
            total_flour,
            total_water,
            total_salt,
            total_starter,
            dough_wheat,
            dough_whole_wheat,
            dough_spelt,
            dough_water: (total_water - water_in_starter).max(0.0),
            feed_old_starter: unit * old_parts,
            feed_flour: unit * flour_parts,
            feed_water: unit * water_parts,
            starter_to_make,
            starter_left_over: starter_to_make - total_starter,
        }
    }
}

/// Gram amounts derived from a [`RecipeConfig`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeBreakdown {
    pub total_flour: f64,
    pub total_water: f64,
    pub total_salt: f64,
    pub total_starter: f64,
    pub dough_wheat: f64,
    pub dough_whole_wheat: f64,
    pub dough_spelt: f64,
    pub dough_water: f64,
    pub feed_old_starter: f64,
    pub feed_flour: f64,
    pub feed_water: f64,
    pub starter_to_make: f64,
    pub starter_left_over: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    pub config: RecipeConfig,
}

pub fn default_presets() -> Vec<Preset> {
    let white = RecipeConfig {
        target_weight: 850.0,
        ..RecipeConfig::default()
    };
    vec![
        Preset {
            name: "Wit (1 brood)".into(),
            config: white.clone(),
        },
        Preset {
            name: "Wit (2 broden)".into(),
            config: RecipeConfig {
                target_weight: 1700.0,
                ..white
            },
        },
        Preset {
            name: "Licht Volkoren".into(),
            config: RecipeConfig {
                target_weight: 900.0,
                hydration: 72.0,
                wheat_perc: 70.0,
                whole_wheat_perc: 30.0,
                ..RecipeConfig::default()
            },
        },
    ]
}
