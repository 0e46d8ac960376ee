//! Simulation driver: execution state machine, extinction detection,
//! status reporting.

use crate::balance::EcosystemBalance;
use crate::climate::Climate;
use crate::config::SimulationConfig;
use crate::environment::{EntityCounts, Environment};
use crate::metrics::{Metrics, MetricsSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Driver execution state. `Stopped` is terminal; only `reset` leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimState {
    Idle,
    Running,
    Stopped,
}

/// Ordered extinction risk classification; first matching rule wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtinctionRisk {
    Low,
    Medium,
    High,
    Critical,
    Extinct,
}

impl ExtinctionRisk {
    pub fn label(&self) -> &'static str {
        match self {
            ExtinctionRisk::Low => "Low",
            ExtinctionRisk::Medium => "Medium",
            ExtinctionRisk::High => "High",
            ExtinctionRisk::Critical => "Critical",
            ExtinctionRisk::Extinct => "Extinct",
        }
    }
}

impl std::fmt::Display for ExtinctionRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured snapshot of the driver and environment for presentation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStatus {
    pub step: u64,
    pub max_steps: u64,
    pub is_running: bool,
    pub climate: Climate,
    pub climate_timer: u32,
    pub entity_counts: EntityCounts,
    pub total_food: f32,
    pub extinction_risk: ExtinctionRisk,
    pub progress_percent: f32,
}

/// Wraps an [`Environment`] with step/run/reset control, a step budget, and
/// extinction detection.
pub struct Simulation {
    config: SimulationConfig,
    pub environment: Environment,
    state: SimState,
    current_step: u64,
    seed: u64,
}

impl Simulation {
    /// Create a driver with a random seed.
    pub fn new(config: SimulationConfig) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create a driver with a specific seed for reproducibility.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        let environment = Environment::with_seed(config.clone(), seed);
        Self {
            config,
            environment,
            state: SimState::Idle,
            current_step: 0,
            seed,
        }
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advance by at most one tick. Always returns the rendered grid, even
    /// when the budget or extinction prevented a tick.
    pub fn step_once(&mut self) -> String {
        if self.state == SimState::Idle {
            self.state = SimState::Running;
        }
        if self.state == SimState::Running {
            if self.should_halt() {
                self.halt();
            } else {
                self.environment.step();
                self.current_step += 1;
            }
        }
        self.environment.render_grid()
    }

    /// Iterate grid states: the initial state first, then one per tick,
    /// ending without error at extinction or budget exhaustion.
    pub fn run(&mut self) -> Run<'_> {
        if self.state == SimState::Idle {
            self.state = SimState::Running;
        }
        Run {
            simulation: self,
            yielded_initial: false,
        }
    }

    /// Discard the environment and rebuild it from the same configuration
    /// and seed, returning to `Idle`.
    pub fn reset(&mut self) {
        self.environment = Environment::with_seed(self.config.clone(), self.seed);
        self.state = SimState::Idle;
        self.current_step = 0;
    }

    /// Force Running into Stopped without touching entity state.
    pub fn stop(&mut self) {
        if self.state == SimState::Running {
            self.state = SimState::Stopped;
        }
    }

    /// The colony is extinct or the ecosystem is no longer viable.
    pub fn extinction_reached(&self) -> bool {
        let counts = self.environment.entity_counts();
        counts.ants == 0 || counts.ants + counts.plants + counts.fungi < 3
    }

    fn budget_exhausted(&self) -> bool {
        self.current_step >= self.config.simulation_steps
    }

    fn should_halt(&self) -> bool {
        self.budget_exhausted() || self.extinction_reached()
    }

    fn halt(&mut self) {
        self.state = SimState::Stopped;
        if self.extinction_reached() {
            log::info!(
                "simulation stopped at step {}: ecosystem no longer viable",
                self.current_step
            );
        } else {
            log::info!(
                "simulation stopped at step {}: step budget exhausted",
                self.current_step
            );
        }
    }

    /// Ordered risk ladder over the current populations.
    pub fn extinction_risk(&self) -> ExtinctionRisk {
        let counts = self.environment.entity_counts();
        if counts.ants == 0 {
            ExtinctionRisk::Extinct
        } else if counts.ants <= 3 {
            ExtinctionRisk::Critical
        } else if counts.ants <= 10 || counts.predators > counts.ants / 2 {
            ExtinctionRisk::High
        } else if counts.fungi == 0 && counts.plants == 0 {
            ExtinctionRisk::High
        } else if counts.ants <= 20 {
            ExtinctionRisk::Medium
        } else {
            ExtinctionRisk::Low
        }
    }

    /// Current driver + environment snapshot.
    pub fn status(&self) -> SimulationStatus {
        SimulationStatus {
            step: self.current_step,
            max_steps: self.config.simulation_steps,
            is_running: self.state == SimState::Running,
            climate: self.environment.climate.current,
            climate_timer: self.environment.climate.timer,
            entity_counts: self.environment.entity_counts(),
            total_food: self.environment.total_food(),
            extinction_risk: self.extinction_risk(),
            progress_percent: self.current_step as f32 / self.config.simulation_steps as f32
                * 100.0,
        }
    }

    /// A balance analyzer configured for this simulation.
    pub fn balance(&self) -> EcosystemBalance {
        EcosystemBalance::new(self.config.predator_balance.target_ant_predator_ratio)
    }

    pub fn metrics(&self) -> &Metrics {
        &self.environment.metrics
    }

    /// Derived metrics summary; None before the first tick.
    pub fn metrics_summary(&self) -> Option<MetricsSummary> {
        self.environment.metrics.summary()
    }
}

/// Borrowing iterator over grid states produced by [`Simulation::run`].
pub struct Run<'a> {
    simulation: &'a mut Simulation,
    yielded_initial: bool,
}

impl Iterator for Run<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if !self.yielded_initial {
            self.yielded_initial = true;
            return Some(self.simulation.environment.render_grid());
        }
        if self.simulation.state != SimState::Running {
            return None;
        }
        if self.simulation.should_halt() {
            self.simulation.halt();
            return None;
        }
        self.simulation.environment.step();
        self.simulation.current_step += 1;
        Some(self.simulation.environment.render_grid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TILE_EMPTY;
    use crate::grid::Position;

    /// A colony small enough to reason about: no predators or parasites,
    /// no spawning, no regeneration noise.
    fn quiet_config(ants: usize) -> SimulationConfig {
        let mut config = SimulationConfig {
            grid_size: 5,
            initial_ants: ants,
            initial_plants: 0,
            initial_fungi: 0,
            initial_parasites: 0,
            initial_predators: 0,
            ..SimulationConfig::default()
        };
        config.predator_balance.base_spawn_chance = 0.0;
        config
    }

    fn non_empty_cells(grid: &str) -> usize {
        grid.chars().filter(|&c| c != TILE_EMPTY && c != '\n').count()
    }

    #[test]
    fn test_initial_state() {
        let sim = Simulation::with_seed(SimulationConfig::default(), 1);
        assert_eq!(sim.state(), SimState::Idle);
        assert_eq!(sim.current_step(), 0);
    }

    #[test]
    fn test_step_once_advances() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 1);
        let grid = sim.step_once();
        assert_eq!(sim.current_step(), 1);
        assert_eq!(sim.state(), SimState::Running);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_threatless_colony_survives_a_tick() {
        // Three ants is the minimum viable ecosystem; with no threats on
        // the grid none of them can die.
        let mut sim = Simulation::with_seed(quiet_config(3), 11);

        let grid = sim.step_once();

        assert_eq!(sim.current_step(), 1);
        assert_eq!(sim.environment.ants.len(), 3);
        let cells = non_empty_cells(&grid);
        assert!((1..=3).contains(&cells));
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::Critical);
    }

    #[test]
    fn test_lone_ant_world_is_already_extinct() {
        // One ant with no plants or fungi is below the minimum viable
        // ecosystem, so the driver refuses to tick.
        let mut sim = Simulation::with_seed(quiet_config(1), 11);
        assert!(sim.extinction_reached());

        let grid = sim.step_once();

        assert_eq!(sim.current_step(), 0);
        assert_eq!(sim.state(), SimState::Stopped);
        assert_eq!(non_empty_cells(&grid), 1);
    }

    #[test]
    fn test_run_yields_initial_state_first() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 2);
        let first = sim.run().next();
        assert_eq!(first, Some(sim.environment.render_grid()));
        assert_eq!(sim.current_step(), 0);
    }

    #[test]
    fn test_run_respects_step_budget() {
        let mut config = SimulationConfig::default();
        config.simulation_steps = 5;
        let mut sim = Simulation::with_seed(config, 3);

        let states: Vec<String> = sim.run().collect();

        // Initial state plus at most five ticks.
        assert!(!states.is_empty());
        assert!(states.len() <= 6);
        assert!(sim.current_step() <= 5);
        assert_eq!(sim.state(), SimState::Stopped);
        if !sim.extinction_reached() {
            assert_eq!(sim.current_step(), 5);
        }
    }

    #[test]
    fn test_run_stops_at_extinction() {
        let mut sim = Simulation::with_seed(quiet_config(1), 4);
        let states: Vec<String> = sim.run().collect();

        // Only the initial state; no tick is ever taken.
        assert_eq!(states.len(), 1);
        assert_eq!(sim.current_step(), 0);
        assert_eq!(sim.state(), SimState::Stopped);
    }

    #[test]
    fn test_stop_halts_stepping() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 5);
        sim.step_once();
        sim.stop();
        assert_eq!(sim.state(), SimState::Stopped);

        sim.step_once();
        assert_eq!(sim.current_step(), 1);
    }

    #[test]
    fn test_stop_leaves_idle_untouched() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 5);
        sim.stop();
        assert_eq!(sim.state(), SimState::Idle);
    }

    #[test]
    fn test_reset_replays_identically() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::with_seed(config.clone(), 6);

        let first_grid = sim.step_once();
        for _ in 0..9 {
            sim.step_once();
        }

        sim.reset();
        assert_eq!(sim.state(), SimState::Idle);
        assert_eq!(sim.current_step(), 0);
        assert_eq!(sim.environment.ants.len(), config.initial_ants);
        assert!(sim.metrics().is_empty());

        // Same configuration and seed: the rerun is identical.
        assert_eq!(sim.step_once(), first_grid);
    }

    #[test]
    fn test_status_snapshot() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 7);
        let status = sim.status();
        assert_eq!(status.step, 0);
        assert_eq!(status.max_steps, 100);
        assert!(!status.is_running);
        assert_eq!(status.progress_percent, 0.0);
        assert_eq!(status.entity_counts.ants, 30);

        sim.step_once();
        let status = sim.status();
        assert_eq!(status.step, 1);
        assert!(status.is_running);
        assert!((status.progress_percent - 1.0).abs() < 1e-6);
        assert!(status.climate_timer <= sim.environment.config.climate.cycle_length);
    }

    #[test]
    fn test_extinction_risk_ladder() {
        let mut sim = Simulation::with_seed(quiet_config(3), 8);
        let env = &mut sim.environment;
        env.ants.clear();
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::Extinct);

        let env = &mut sim.environment;
        for _ in 0..2 {
            env.add_ant(Position::new(0, 0));
        }
        env.add_plant(Position::new(1, 1));
        env.add_fungus(Position::new(2, 2));
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::Critical);

        let env = &mut sim.environment;
        for _ in 0..6 {
            env.add_ant(Position::new(0, 0));
        }
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::High);

        // 15 ants with food on the grid: medium.
        let env = &mut sim.environment;
        for _ in 0..7 {
            env.add_ant(Position::new(0, 0));
        }
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::Medium);

        // Outnumbering predators push a large colony back to high.
        let env = &mut sim.environment;
        for _ in 0..15 {
            env.add_ant(Position::new(0, 0));
        }
        for _ in 0..16 {
            env.add_predator(Position::new(3, 3));
        }
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::High);

        let env = &mut sim.environment;
        env.predators.clear();
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::Low);
    }

    #[test]
    fn test_no_food_sources_is_high_risk() {
        let mut sim = Simulation::with_seed(quiet_config(3), 9);
        let env = &mut sim.environment;
        env.ants.clear();
        for _ in 0..12 {
            env.add_ant(Position::new(0, 0));
        }
        assert!(env.plants.is_empty() && env.fungi.is_empty());
        assert_eq!(sim.extinction_risk(), ExtinctionRisk::High);
    }

    #[test]
    fn test_metrics_recorded_per_tick() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 10);
        assert!(sim.metrics_summary().is_none());

        sim.step_once();
        sim.step_once();

        let metrics = sim.metrics();
        assert_eq!(metrics.len(), 2);
        assert!(metrics.is_aligned());

        let summary = sim.metrics_summary().unwrap();
        assert_eq!(summary.total_steps, 2);
    }

    #[test]
    fn test_risk_labels() {
        assert_eq!(ExtinctionRisk::Low.label(), "Low");
        assert_eq!(ExtinctionRisk::Extinct.label(), "Extinct");
    }
}
