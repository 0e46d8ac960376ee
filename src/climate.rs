//! Cyclical climate system.

use crate::config::{ClimateConfig, ClimateEffects};
use serde::{Deserialize, Serialize};

/// The two climate states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    Rain,
    Dry,
}

impl Climate {
    /// The opposite climate.
    pub fn toggled(&self) -> Climate {
        match self {
            Climate::Rain => Climate::Dry,
            Climate::Dry => Climate::Rain,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Climate::Rain => "rain",
            Climate::Dry => "dry",
        }
    }

    /// Effect multipliers active under this climate.
    pub fn effects<'a>(&self, config: &'a ClimateConfig) -> &'a ClimateEffects {
        match self {
            Climate::Rain => &config.rain_effects,
            Climate::Dry => &config.dry_effects,
        }
    }
}

impl std::fmt::Display for Climate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tracks the current climate and its cycle timer.
///
/// The transition rule is a single unconditional toggle every `cycle_length`
/// steps; the configured rain/dry durations are validated but not consulted
/// here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClimateSystem {
    pub current: Climate,
    pub timer: u32,
    cycle_length: u32,
}

impl ClimateSystem {
    /// Simulations start in the dry season.
    pub fn new(config: &ClimateConfig) -> Self {
        Self {
            current: Climate::Dry,
            timer: 0,
            cycle_length: config.cycle_length,
        }
    }

    /// Advance the timer by one step, toggling the climate at each full
    /// cycle. The timer resets to 0 on every transition.
    pub fn tick(&mut self) {
        self.timer += 1;
        if self.timer >= self.cycle_length {
            self.current = self.current.toggled();
            self.timer = 0;
            log::debug!("climate shifted to {}", self.current);
        }
    }
}
