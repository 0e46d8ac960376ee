//! # leafcutter
//!
//! Discrete-time, grid-based leafcutter ant colony ecosystem simulator.
//!
//! Ants, plants, fungus gardens, parasites and predators share a square
//! grid under a cyclical rain/dry climate. Each tick runs a fixed
//! seven-phase pipeline (climate, entity updates, cleanup, plant
//! regeneration, ant reproduction, predator spawning, metrics), and a
//! balance analyzer scores the resulting ecological health.
//!
//! ## Features
//!
//! - **Deterministic**: a single seeded RNG drives every probabilistic
//!   decision in fixed pipeline order
//! - **Observable**: per-tick metrics series, status snapshots, rendered
//!   grids
//! - **Scored**: multi-factor health and sustainability analysis
//!
//! ## Quick Start
//!
//! ```rust
//! use leafcutter::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! let mut sim = Simulation::with_seed(config, 42);
//!
//! for grid in sim.run().take(10) {
//!     println!("{grid}");
//! }
//!
//! let status = sim.status();
//! println!("{} ants after {} steps", status.entity_counts.ants, status.step);
//! ```
//!
//! ## Scoring
//!
//! ```rust
//! use leafcutter::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::with_seed(SimulationConfig::default(), 7);
//! sim.step_once();
//!
//! let balance = sim.balance();
//! let (score, assessment) = balance.sustainability(&sim.environment);
//! println!("{score:.2}: {assessment}");
//! ```

pub mod balance;
pub mod climate;
pub mod config;
pub mod entities;
pub mod environment;
pub mod grid;
pub mod metrics;
pub mod simulation;

// Re-export main types
pub use balance::{Assessment, EcosystemBalance, HealthReport};
pub use climate::Climate;
pub use config::{ConfigError, SimulationConfig};
pub use environment::{EntityCounts, Environment};
pub use grid::Position;
pub use metrics::{Metrics, MetricsSummary};
pub use simulation::{ExtinctionRisk, SimState, Simulation, SimulationStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
