//! Configuration for the colony simulation.
//!
//! Parameters are grouped per subsystem, validated at construction, and
//! round-trip through YAML files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Raised when a configuration value is out of range or violates a
/// cross-field constraint. Names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration field `{field}`: {message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Plant regeneration mechanics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRegenerationConfig {
    /// Steps between regeneration attempts
    pub interval: u64,
    /// Chance of a new plant per attempt
    pub probability: f32,
    /// Maximum plants on the grid
    pub max_plants: usize,
}

/// Ant reproduction mechanics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReproductionConfig {
    /// Fungus nutrition consumed per reproduction cycle
    pub food_threshold: f32,
    /// Steps between reproduction attempts
    pub larvae_period: u64,
    /// New ants per successful cycle
    pub larvae_per_cycle: usize,
}

/// Effect multipliers applied while a climate is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateEffects {
    pub plant_regen_multiplier: f32,
    pub predator_spawn_reduction: f32,
    pub predator_spawn_increase: f32,
}

/// Climate cycling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateConfig {
    /// Steps between climate changes
    pub cycle_length: u32,
    /// Steps of rainy weather
    pub rain_duration: u32,
    /// Steps of dry weather
    pub dry_duration: u32,
    pub rain_effects: ClimateEffects,
    pub dry_effects: ClimateEffects,
}

/// Predator-prey balance parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredatorBalanceConfig {
    /// Optimal ants per predator
    pub target_ant_predator_ratio: f32,
    /// Rate of spawn adjustment (reserved)
    pub spawn_adjustment_rate: f32,
    /// Baseline predator spawn probability
    pub base_spawn_chance: f32,
}

/// Parasite behavior parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParasiteDynamicsConfig {
    /// Probability of a spread attempt succeeding per step
    pub spread_chance: f32,
    /// Distance for parasite effects (reserved)
    pub infection_radius: usize,
}

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimensions (NxN), 5..=100
    pub grid_size: usize,
    /// Total step budget
    pub simulation_steps: u64,
    /// Delay between frames in seconds (presentation pacing only)
    pub animation_speed: f32,

    pub initial_ants: usize,
    pub initial_plants: usize,
    pub initial_fungi: usize,
    pub initial_parasites: usize,
    pub initial_predators: usize,

    pub plant_regeneration: PlantRegenerationConfig,
    pub reproduction: ReproductionConfig,
    pub climate: ClimateConfig,
    pub predator_balance: PredatorBalanceConfig,
    pub parasite_dynamics: ParasiteDynamicsConfig,
}

impl Default for PlantRegenerationConfig {
    fn default() -> Self {
        Self {
            interval: 5,
            probability: 0.3,
            max_plants: 60,
        }
    }
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            food_threshold: 15.0,
            larvae_period: 10,
            larvae_per_cycle: 1,
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            cycle_length: 25,
            rain_duration: 10,
            dry_duration: 15,
            rain_effects: ClimateEffects {
                plant_regen_multiplier: 2.0,
                predator_spawn_reduction: 0.5,
                predator_spawn_increase: 1.0,
            },
            dry_effects: ClimateEffects {
                plant_regen_multiplier: 0.3,
                predator_spawn_reduction: 1.0,
                predator_spawn_increase: 1.5,
            },
        }
    }
}

impl Default for PredatorBalanceConfig {
    fn default() -> Self {
        Self {
            target_ant_predator_ratio: 10.0,
            spawn_adjustment_rate: 0.1,
            base_spawn_chance: 0.05,
        }
    }
}

impl Default for ParasiteDynamicsConfig {
    fn default() -> Self {
        Self {
            spread_chance: 0.05,
            infection_radius: 1,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            simulation_steps: 100,
            animation_speed: 0.2,
            initial_ants: 30,
            initial_plants: 40,
            initial_fungi: 10,
            initial_parasites: 5,
            initial_predators: 3,
            plant_regeneration: PlantRegenerationConfig::default(),
            reproduction: ReproductionConfig::default(),
            climate: ClimateConfig::default(),
            predator_balance: PredatorBalanceConfig::default(),
            parasite_dynamics: ParasiteDynamicsConfig::default(),
        }
    }
}

fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::new(field, format!("{value} is not in [0, 1]")));
    }
    Ok(())
}

impl PlantRegenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::new("plant_regeneration.interval", "must be > 0"));
        }
        check_probability("plant_regeneration.probability", self.probability)?;
        if self.max_plants == 0 {
            return Err(ConfigError::new("plant_regeneration.max_plants", "must be > 0"));
        }
        Ok(())
    }
}

impl ReproductionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.food_threshold <= 0.0 {
            return Err(ConfigError::new("reproduction.food_threshold", "must be > 0"));
        }
        if self.larvae_period == 0 {
            return Err(ConfigError::new("reproduction.larvae_period", "must be > 0"));
        }
        if self.larvae_per_cycle == 0 {
            return Err(ConfigError::new("reproduction.larvae_per_cycle", "must be > 0"));
        }
        Ok(())
    }
}

impl ClimateEffects {
    fn validate(&self, side: &'static str) -> Result<(), ConfigError> {
        if self.plant_regen_multiplier <= 0.0 {
            return Err(ConfigError::new(side, "plant_regen_multiplier must be > 0"));
        }
        if self.predator_spawn_reduction < 0.0 {
            return Err(ConfigError::new(side, "predator_spawn_reduction must be >= 0"));
        }
        if self.predator_spawn_increase < 0.0 {
            return Err(ConfigError::new(side, "predator_spawn_increase must be >= 0"));
        }
        Ok(())
    }
}

impl ClimateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_length == 0 {
            return Err(ConfigError::new("climate.cycle_length", "must be > 0"));
        }
        if self.rain_duration == 0 {
            return Err(ConfigError::new("climate.rain_duration", "must be > 0"));
        }
        if self.dry_duration == 0 {
            return Err(ConfigError::new("climate.dry_duration", "must be > 0"));
        }
        if self.rain_duration > self.cycle_length {
            return Err(ConfigError::new(
                "climate.rain_duration",
                "cannot exceed cycle_length",
            ));
        }
        if self.dry_duration > self.cycle_length {
            return Err(ConfigError::new(
                "climate.dry_duration",
                "cannot exceed cycle_length",
            ));
        }
        self.rain_effects.validate("climate.rain_effects")?;
        self.dry_effects.validate("climate.dry_effects")?;
        Ok(())
    }
}

impl PredatorBalanceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_ant_predator_ratio <= 0.0 {
            return Err(ConfigError::new(
                "predator_balance.target_ant_predator_ratio",
                "must be > 0",
            ));
        }
        check_probability(
            "predator_balance.spawn_adjustment_rate",
            self.spawn_adjustment_rate,
        )?;
        check_probability("predator_balance.base_spawn_chance", self.base_spawn_chance)?;
        Ok(())
    }
}

impl ParasiteDynamicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("parasite_dynamics.spread_chance", self.spread_chance)
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate all sub-configs, then the cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(5..=100).contains(&self.grid_size) {
            return Err(ConfigError::new("grid_size", "must be between 5 and 100"));
        }
        if self.simulation_steps == 0 {
            return Err(ConfigError::new("simulation_steps", "must be > 0"));
        }
        if self.animation_speed <= 0.0 {
            return Err(ConfigError::new("animation_speed", "must be > 0"));
        }
        if self.initial_ants == 0 {
            return Err(ConfigError::new("initial_ants", "must be >= 1"));
        }

        self.plant_regeneration.validate()?;
        self.reproduction.validate()?;
        self.climate.validate()?;
        self.predator_balance.validate()?;
        self.parasite_dynamics.validate()?;

        if self.initial_plants > self.plant_regeneration.max_plants {
            return Err(ConfigError::new(
                "initial_plants",
                "cannot exceed plant_regeneration.max_plants",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = SimulationConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: SimulationConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_rain_duration_exceeding_cycle_rejected() {
        let mut config = SimulationConfig::default();
        config.climate.rain_duration = config.climate.cycle_length + 1;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "climate.rain_duration");
    }

    #[test]
    fn test_initial_plants_exceeding_max_rejected() {
        let mut config = SimulationConfig::default();
        config.initial_plants = config.plant_regeneration.max_plants + 1;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "initial_plants");
    }

    #[test]
    fn test_grid_size_bounds() {
        let mut config = SimulationConfig::default();
        config.grid_size = 4;
        assert!(config.validate().is_err());
        config.grid_size = 101;
        assert!(config.validate().is_err());
        config.grid_size = 5;
        assert!(config.validate().is_ok());
        config.grid_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ants_rejected() {
        let mut config = SimulationConfig::default();
        config.initial_ants = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "initial_ants");
    }

    #[test]
    fn test_probability_ranges_rejected() {
        let mut config = SimulationConfig::default();
        config.plant_regeneration.probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.predator_balance.base_spawn_chance = -0.1;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.parasite_dynamics.spread_chance = 2.0;
        assert!(config.validate().is_err());
    }
}
