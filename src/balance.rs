//! Ecological balance scoring over environment snapshots.

use crate::environment::Environment;
use serde::{Deserialize, Serialize};

/// Component health scores in [0, 1] plus their unweighted mean.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct HealthReport {
    pub population: f32,
    pub food: f32,
    pub predator_balance: f32,
    pub parasite_impact: f32,
    pub diversity: f32,
    pub overall: f32,
}

/// Textual sustainability band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    Thriving,
    Stable,
    Vulnerable,
    AtRisk,
    Critical,
}

impl Assessment {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            Assessment::Thriving
        } else if score >= 0.6 {
            Assessment::Stable
        } else if score >= 0.4 {
            Assessment::Vulnerable
        } else if score >= 0.2 {
            Assessment::AtRisk
        } else {
            Assessment::Critical
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Assessment::Thriving => "Thriving: The ecosystem is well-balanced and sustainable",
            Assessment::Stable => "Stable: The ecosystem is maintaining equilibrium",
            Assessment::Vulnerable => "Vulnerable: The ecosystem shows signs of instability",
            Assessment::AtRisk => "At Risk: The ecosystem is struggling to maintain balance",
            Assessment::Critical => "Critical: The ecosystem is approaching collapse",
        }
    }
}

impl std::fmt::Display for Assessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Scores ecosystem health and keeps a rolling history of reports.
#[derive(Clone, Debug, Default)]
pub struct EcosystemBalance {
    target_ant_predator_ratio: f32,
    pub history: Vec<HealthReport>,
}

impl EcosystemBalance {
    /// Optimal ant population range.
    const OPTIMAL_POPULATION: (usize, usize) = (20, 60);
    /// Optimal count of food sources (plants + fungi).
    const OPTIMAL_FOOD: usize = 30;

    pub fn new(target_ant_predator_ratio: f32) -> Self {
        Self {
            target_ant_predator_ratio,
            history: Vec::new(),
        }
    }

    /// Score the current environment state.
    pub fn analyze(&self, env: &Environment) -> HealthReport {
        let counts = env.entity_counts();

        let population = population_health(counts.ants);
        let food = food_health(counts.plants, counts.fungi);
        let predator_balance = predator_balance_health(
            counts.ants,
            counts.predators,
            self.target_ant_predator_ratio,
        );
        let parasite_impact = parasite_impact_health(counts.ants, counts.parasites);
        let diversity = diversity_health(
            counts.ants,
            counts.plants,
            counts.fungi,
            counts.parasites,
            counts.predators,
        );

        HealthReport {
            population,
            food,
            predator_balance,
            parasite_impact,
            diversity,
            overall: (population + food + predator_balance + parasite_impact + diversity) / 5.0,
        }
    }

    /// Overall health discounted by stability factors, with its band.
    pub fn sustainability(&self, env: &Environment) -> (f32, Assessment) {
        let overall = self.analyze(env).overall;
        let counts = env.entity_counts();

        let food_sources = counts.plants + counts.fungi;
        let predator_ratio = counts.predators as f32 / (counts.ants.max(1)) as f32;

        let population_stable = counts.ants >= 10;
        let food_sufficient = food_sources as f32 >= counts.ants as f32 * 0.5;
        let predator_balanced = (0.05..=0.2).contains(&predator_ratio);

        let score = overall
            * if population_stable { 1.0 } else { 0.6 }
            * if food_sufficient { 1.0 } else { 0.7 }
            * if predator_balanced { 1.0 } else { 0.8 };

        (score, Assessment::from_score(score))
    }

    /// Append the current report to the rolling history.
    pub fn record_state(&mut self, env: &Environment) {
        let report = self.analyze(env);
        self.history.push(report);
    }
}

/// 0 with no ants, ramping to 1.0 at the optimal range, with a capped
/// overpopulation penalty that never drops the score below 0.5.
fn population_health(ant_count: usize) -> f32 {
    let (low, high) = EcosystemBalance::OPTIMAL_POPULATION;
    if ant_count == 0 {
        0.0
    } else if ant_count < low {
        ant_count as f32 / low as f32
    } else if ant_count <= high {
        1.0
    } else {
        let excess = (ant_count - high) as f32;
        let penalty = (excess / high as f32).min(0.5);
        1.0 - penalty
    }
}

fn food_health(plant_count: usize, fungus_count: usize) -> f32 {
    let total = (plant_count + fungus_count) as f32;
    (total / EcosystemBalance::OPTIMAL_FOOD as f32).min(1.0)
}

fn predator_balance_health(ant_count: usize, predator_count: usize, target_ratio: f32) -> f32 {
    if ant_count == 0 {
        return if predator_count == 0 { 1.0 } else { 0.0 };
    }
    if predator_count == 0 {
        // Suboptimal but not critical.
        return 0.8;
    }
    let current_ratio = ant_count as f32 / predator_count as f32;
    let difference = (current_ratio - target_ratio).abs() / target_ratio;
    (1.0 - difference).max(0.0)
}

fn parasite_impact_health(ant_count: usize, parasite_count: usize) -> f32 {
    if ant_count == 0 {
        return 0.0;
    }
    if parasite_count == 0 {
        return 1.0;
    }
    let pressure = parasite_count as f32 / ant_count as f32;
    if pressure <= 0.2 {
        1.0 - pressure * 0.5
    } else {
        (1.0 - pressure).max(0.0)
    }
}

fn diversity_health(
    ants: usize,
    plants: usize,
    fungi: usize,
    parasites: usize,
    predators: usize,
) -> f32 {
    let types_present = [ants, plants, fungi, parasites, predators]
        .iter()
        .filter(|&&count| count > 0)
        .count();
    match types_present {
        n if n >= 4 => 1.0,
        3 => 0.8,
        2 => 0.5,
        _ => 0.0,
    }
}
