//! Environment: entity ownership, climate, and the per-tick pipeline.

use crate::climate::{Climate, ClimateSystem};
use crate::config::SimulationConfig;
use crate::entities::{Ant, Entity, Fungus, Parasite, Plant, Predator, TILE_EMPTY};
use crate::grid::{Position, DIRECTIONS};
use crate::metrics::Metrics;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Live entity counts per type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub ants: usize,
    pub plants: usize,
    pub fungi: usize,
    pub parasites: usize,
    pub predators: usize,
}

/// The simulation world: grid, climate, entity collections, metrics.
///
/// `step()` runs a fixed seven-phase pipeline; all probabilistic decisions
/// draw from one seeded RNG in pipeline order, so runs are deterministic
/// given a seed.
pub struct Environment {
    pub config: SimulationConfig,
    pub grid_size: usize,
    pub step_count: u64,

    pub ants: Vec<Ant>,
    pub plants: Vec<Plant>,
    pub fungi: Vec<Fungus>,
    pub parasites: Vec<Parasite>,
    pub predators: Vec<Predator>,

    pub climate: ClimateSystem,
    pub metrics: Metrics,

    rng: ChaCha8Rng,
    seed: u64,
}

impl Environment {
    /// Bounded search budget when placing a regenerated plant.
    const PLACEMENT_ATTEMPTS: usize = 20;
    /// Manhattan radius of fungus parasite suppression.
    const SUPPRESSION_RADIUS: usize = 2;

    /// Create an environment with a random seed.
    pub fn new(config: SimulationConfig) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create an environment with a specific seed for reproducibility.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid_size = config.grid_size;

        let ants = (0..config.initial_ants)
            .map(|_| Ant::new(Position::random(&mut rng, grid_size)))
            .collect();
        let plants = (0..config.initial_plants)
            .map(|_| Plant::new(Position::random(&mut rng, grid_size)))
            .collect();
        let fungi = (0..config.initial_fungi)
            .map(|_| Fungus::new(Position::random(&mut rng, grid_size)))
            .collect();
        let parasites = (0..config.initial_parasites)
            .map(|_| Parasite::new(Position::random(&mut rng, grid_size)))
            .collect();
        let predators = (0..config.initial_predators)
            .map(|_| Predator::new(Position::random(&mut rng, grid_size)))
            .collect();

        let climate = ClimateSystem::new(&config.climate);

        Self {
            grid_size,
            step_count: 0,
            ants,
            plants,
            fungi,
            parasites,
            predators,
            climate,
            metrics: Metrics::new(),
            config,
            rng,
            seed,
        }
    }

    /// Seed this environment was built with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advance the simulation by one step.
    pub fn step(&mut self) {
        self.step_count += 1;

        // Phase 1: climate
        self.climate.tick();

        // Phase 2: entity updates, fixed order over index-bounded snapshots
        self.update_plants();
        self.update_fungi();
        self.update_parasites();
        self.update_predators();
        self.update_ants();

        // Phase 3: purge inactive entities
        self.cleanup_entities();

        // Phases 4-6: environmental control loops
        self.regenerate_plants();
        self.reproduce_ants();
        self.spawn_predators();

        // Phase 7: metrics
        self.record_metrics();
    }

    fn update_plants(&mut self) {
        let count = self.plants.len();
        for i in 0..count {
            if self.plants[i].active {
                self.plants[i].grow();
            }
        }
    }

    fn update_fungi(&mut self) {
        let count = self.fungi.len();
        for i in 0..count {
            if !self.fungi[i].active {
                continue;
            }
            if !self.fungi[i].tick_growth() {
                continue;
            }

            // Healthy gardens suppress parasites in their vicinity.
            let pos = self.fungi[i].pos;
            let health = self.fungi[i].health();
            if health > 0.4 {
                let suppression_chance = health * 0.3;
                for index in self.parasites_within(pos, Self::SUPPRESSION_RADIUS) {
                    if self.rng.gen::<f32>() < suppression_chance {
                        self.parasites[index].deactivate();
                    }
                }
            }
        }
    }

    fn update_parasites(&mut self) {
        let count = self.parasites.len();
        for i in 0..count {
            if !self.parasites[i].active {
                continue;
            }
            if !self.parasites[i].advance_age() {
                continue;
            }
            self.try_parasite_spread(i);
            self.parasites[i].decay_virulence();
        }
    }

    fn try_parasite_spread(&mut self, index: usize) {
        if !self.parasites[index].can_spread() {
            return;
        }
        let pos = self.parasites[index].pos;
        let chance =
            self.config.parasite_dynamics.spread_chance * self.parasites[index].virulence;
        if self.rng.gen::<f32>() >= chance {
            return;
        }

        // Spread only into neighbor cells not already holding a parasite.
        let open: Vec<Position> = pos
            .neighbors(self.grid_size)
            .into_iter()
            .filter(|cell| !self.parasites.iter().any(|p| p.pos == *cell))
            .collect();
        if open.is_empty() {
            return;
        }
        let target = open[self.rng.gen_range(0..open.len())];
        let virulence = self.parasites[index].offspring_virulence();
        self.parasites.push(Parasite::with_virulence(target, virulence));
        self.parasites[index].spread_attempts += 1;
    }

    fn update_predators(&mut self) {
        let count = self.predators.len();
        for i in 0..count {
            if !self.predators[i].active {
                continue;
            }
            if !self.predators[i].tick_energy() {
                continue;
            }
            self.predator_hunt(i);
            self.predator_move(i);
        }
    }

    fn predator_hunt(&mut self, index: usize) {
        let pos = self.predators[index].pos;
        let Some(target) = self.nearest_ant_within(pos, Predator::HUNT_RANGE) else {
            return;
        };
        let kill_chance = self.predators[index].kill_chance();
        if self.rng.gen::<f32>() < kill_chance {
            self.ants[target].deactivate();
            self.predators[index].gain_energy(Predator::KILL_ENERGY);
        }
    }

    fn predator_move(&mut self, index: usize) {
        let pos = self.predators[index].pos;
        match self.nearest_ant_within(pos, Predator::HUNT_RANGE) {
            Some(target) => {
                let target_pos = self.ants[target].pos;
                self.predators[index].step_toward(target_pos, self.grid_size);
            }
            None => {
                let (dx, dy) = DIRECTIONS[self.rng.gen_range(0..DIRECTIONS.len())];
                self.predators[index].pos = pos.offset(dx, dy, self.grid_size);
            }
        }
    }

    fn update_ants(&mut self) {
        let count = self.ants.len();
        for i in 0..count {
            if !self.ants[i].active {
                continue;
            }
            if self.threat_at(self.ants[i].pos) {
                self.ants[i].deactivate();
                continue;
            }

            let (dx, dy) = DIRECTIONS[self.rng.gen_range(0..DIRECTIONS.len())];
            let next = self.ants[i].pos.offset(dx, dy, self.grid_size);
            self.ants[i].pos = next;

            if self.threat_at(next) {
                self.ants[i].deactivate();
                continue;
            }

            // Harvest a plant into a fresh fungus garden.
            if let Some(plant_index) = self.plants.iter().position(|p| p.pos == next) {
                self.plants[plant_index].deactivate();
                self.add_fungus(next);
            }
        }
    }

    fn cleanup_entities(&mut self) {
        self.ants.retain(|a| a.active);
        self.plants.retain(|p| p.active);
        self.fungi.retain(|f| f.active);
        self.parasites.retain(|p| p.active);
        self.predators.retain(|p| p.active);
    }

    fn regenerate_plants(&mut self) {
        if self.step_count % self.config.plant_regeneration.interval != 0 {
            return;
        }
        if self.plants.len() >= self.config.plant_regeneration.max_plants {
            return;
        }

        let multiplier = self
            .climate
            .current
            .effects(&self.config.climate)
            .plant_regen_multiplier;
        let chance = self.config.plant_regeneration.probability * multiplier;
        if self.rng.gen::<f32>() >= chance {
            return;
        }

        // Bounded search for an unoccupied cell; give up silently on failure.
        let occupied = self.occupied_positions();
        for _ in 0..Self::PLACEMENT_ATTEMPTS {
            let pos = Position::random(&mut self.rng, self.grid_size);
            if !occupied.contains(&pos) {
                self.add_plant(pos);
                break;
            }
        }
    }

    fn reproduce_ants(&mut self) {
        if self.step_count % self.config.reproduction.larvae_period != 0 {
            return;
        }

        let total: f32 = self
            .fungi
            .iter()
            .filter(|f| f.can_be_consumed())
            .map(|f| f.nutrition_value)
            .sum();
        let threshold = self.config.reproduction.food_threshold;
        if total < threshold {
            return;
        }

        // Consume exactly the threshold across consumable gardens, in order.
        let mut needed = threshold;
        for fungus in &mut self.fungi {
            if needed <= 0.0 {
                break;
            }
            if !fungus.can_be_consumed() {
                continue;
            }
            let consumed = needed.min(fungus.nutrition_value);
            needed -= consumed;
            if consumed >= fungus.nutrition_value {
                fungus.deactivate();
            } else {
                fungus.nutrition_value -= consumed;
            }
        }

        for _ in 0..self.config.reproduction.larvae_per_cycle {
            let pos = self.larva_position();
            self.add_ant(pos);
        }
    }

    /// Place a larva next to (or on) a random existing ant when possible,
    /// falling back to a fully random cell.
    fn larva_position(&mut self) -> Position {
        if self.ants.is_empty() {
            return Position::random(&mut self.rng, self.grid_size);
        }
        let parent_index = self.rng.gen_range(0..self.ants.len());
        let parent = self.ants[parent_index].pos;
        let mut candidates = parent.neighbors(self.grid_size);
        candidates.push(parent);

        let mut occupied = HashSet::new();
        collect_positions(&mut occupied, &self.plants);
        collect_positions(&mut occupied, &self.fungi);
        collect_positions(&mut occupied, &self.parasites);
        collect_positions(&mut occupied, &self.predators);

        let available: Vec<Position> = candidates
            .into_iter()
            .filter(|cell| !occupied.contains(cell))
            .collect();
        if available.is_empty() {
            Position::random(&mut self.rng, self.grid_size)
        } else {
            available[self.rng.gen_range(0..available.len())]
        }
    }

    fn spawn_predators(&mut self) {
        let ant_count = self.ants.len();
        if ant_count == 0 {
            return;
        }

        let target = target_predator_count(
            ant_count,
            self.config.predator_balance.target_ant_predator_ratio,
        );
        let mut multiplier = spawn_multiplier(self.predators.len() as f32, target);

        let effects = self.climate.current.effects(&self.config.climate);
        multiplier *= match self.climate.current {
            Climate::Rain => effects.predator_spawn_reduction,
            Climate::Dry => effects.predator_spawn_increase,
        };

        let chance = self.config.predator_balance.base_spawn_chance * multiplier;
        if self.rng.gen::<f32>() < chance {
            let pos = Position::random(&mut self.rng, self.grid_size);
            self.add_predator(pos);
        }
    }

    fn record_metrics(&mut self) {
        self.metrics.record(
            self.step_count,
            self.entity_counts(),
            self.total_food(),
            self.climate.current,
        );
    }

    /// Indices of active parasites within a Manhattan radius of a cell.
    pub fn parasites_within(&self, pos: Position, radius: usize) -> Vec<usize> {
        self.parasites
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active && p.pos.manhattan_distance(pos) <= radius)
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the nearest active ant within a Manhattan radius, earliest
    /// in collection order on ties.
    pub fn nearest_ant_within(&self, pos: Position, radius: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, ant) in self.ants.iter().enumerate() {
            if !ant.active {
                continue;
            }
            let distance = ant.pos.manhattan_distance(pos);
            if distance > radius {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Whether a predator or parasite occupies the cell. Deliberately
    /// ignores the active flag: an entity killed earlier in the same tick
    /// still counts until cleanup.
    pub fn threat_at(&self, pos: Position) -> bool {
        self.predators.iter().any(|p| p.pos == pos)
            || self.parasites.iter().any(|p| p.pos == pos)
    }

    /// Cells occupied by any entity of any type.
    pub fn occupied_positions(&self) -> HashSet<Position> {
        let mut occupied = HashSet::new();
        collect_positions(&mut occupied, &self.ants);
        collect_positions(&mut occupied, &self.plants);
        collect_positions(&mut occupied, &self.fungi);
        collect_positions(&mut occupied, &self.parasites);
        collect_positions(&mut occupied, &self.predators);
        occupied
    }

    pub fn add_ant(&mut self, pos: Position) {
        self.ants.push(Ant::new(pos));
    }

    pub fn add_plant(&mut self, pos: Position) {
        self.plants.push(Plant::new(pos));
    }

    pub fn add_fungus(&mut self, pos: Position) {
        self.fungi.push(Fungus::new(pos));
    }

    pub fn add_parasite(&mut self, pos: Position, virulence: f32) {
        self.parasites.push(Parasite::with_virulence(pos, virulence));
    }

    pub fn add_predator(&mut self, pos: Position) {
        self.predators.push(Predator::new(pos));
    }

    /// Per-type entity counts.
    pub fn entity_counts(&self) -> EntityCounts {
        EntityCounts {
            ants: self.ants.len(),
            plants: self.plants.len(),
            fungi: self.fungi.len(),
            parasites: self.parasites.len(),
            predators: self.predators.len(),
        }
    }

    /// Total fungus nutrition available.
    pub fn total_food(&self) -> f32 {
        self.fungi.iter().map(|f| f.nutrition_value).sum()
    }

    /// Render the grid as newline-joined rows of tile symbols, layering
    /// plant, fungus, parasite, predator, ant (ants on top).
    pub fn render_grid(&self) -> String {
        let mut grid = vec![vec![TILE_EMPTY; self.grid_size]; self.grid_size];
        stamp(&mut grid, &self.plants);
        stamp(&mut grid, &self.fungi);
        stamp(&mut grid, &self.parasites);
        stamp(&mut grid, &self.predators);
        stamp(&mut grid, &self.ants);

        let rows: Vec<String> = grid
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        rows.join("\n")
    }
}

fn stamp<E: Entity>(grid: &mut [Vec<char>], entities: &[E]) {
    for entity in entities {
        if entity.is_active() {
            let pos = entity.position();
            grid[pos.x][pos.y] = entity.symbol();
        }
    }
}

fn collect_positions<E: Entity>(occupied: &mut HashSet<Position>, entities: &[E]) {
    occupied.extend(entities.iter().map(|e| e.position()));
}

/// Desired predator population for an ant population, never below one.
fn target_predator_count(ant_count: usize, target_ratio: f32) -> f32 {
    (ant_count as f32 / target_ratio).floor().max(1.0)
}

/// Spawn pressure: boost when under target, damp when over.
fn spawn_multiplier(current_predators: f32, target_predators: f32) -> f32 {
    if current_predators < target_predators {
        1.5
    } else if current_predators > target_predators {
        0.3
    } else {
        1.0
    }
}
