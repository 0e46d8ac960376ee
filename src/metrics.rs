//! Per-tick metrics series and derived run summaries.

use crate::climate::Climate;
use crate::environment::EntityCounts;
use serde::{Deserialize, Serialize};

/// Append-only time series, one entry per tick. All arrays share the same
/// length at all times; indices align across arrays.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub step: Vec<u64>,
    pub ant_count: Vec<usize>,
    pub plant_count: Vec<usize>,
    pub fungus_count: Vec<usize>,
    pub parasite_count: Vec<usize>,
    pub predator_count: Vec<usize>,
    pub food_stock: Vec<f32>,
    pub climate: Vec<Climate>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one tick's readings.
    pub fn record(&mut self, step: u64, counts: EntityCounts, food_stock: f32, climate: Climate) {
        self.step.push(step);
        self.ant_count.push(counts.ants);
        self.plant_count.push(counts.plants);
        self.fungus_count.push(counts.fungi);
        self.parasite_count.push(counts.parasites);
        self.predator_count.push(counts.predators);
        self.food_stock.push(food_stock);
        self.climate.push(climate);
        debug_assert!(self.is_aligned());
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.step.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step.is_empty()
    }

    /// All series have the same length.
    pub fn is_aligned(&self) -> bool {
        let n = self.step.len();
        self.ant_count.len() == n
            && self.plant_count.len() == n
            && self.fungus_count.len() == n
            && self.parasite_count.len() == n
            && self.predator_count.len() == n
            && self.food_stock.len() == n
            && self.climate.len() == n
    }

    /// Derived statistical summary; None before the first tick.
    pub fn summary(&self) -> Option<MetricsSummary> {
        if self.is_empty() {
            return None;
        }
        Some(MetricsSummary {
            total_steps: self.len(),
            final_counts: EntityCounts {
                ants: last(&self.ant_count),
                plants: last(&self.plant_count),
                fungi: last(&self.fungus_count),
                parasites: last(&self.parasite_count),
                predators: last(&self.predator_count),
            },
            peak_counts: EntityCounts {
                ants: peak(&self.ant_count),
                plants: peak(&self.plant_count),
                fungi: peak(&self.fungus_count),
                parasites: peak(&self.parasite_count),
                predators: peak(&self.predator_count),
            },
            average_counts: AverageCounts {
                ants: mean(&self.ant_count),
                plants: mean(&self.plant_count),
                fungi: mean(&self.fungus_count),
                parasites: mean(&self.parasite_count),
                predators: mean(&self.predator_count),
            },
            colony_survived: last(&self.ant_count) > 0,
            steps_survived: self.len(),
            max_food_stock: self
                .food_stock
                .iter()
                .copied()
                .fold(0.0f32, f32::max),
        })
    }

    /// Save all series to a JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

/// Mean population per type across the run.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct AverageCounts {
    pub ants: f32,
    pub plants: f32,
    pub fungi: f32,
    pub parasites: f32,
    pub predators: f32,
}

/// Statistical summary of a simulation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_steps: usize,
    pub final_counts: EntityCounts,
    pub peak_counts: EntityCounts,
    pub average_counts: AverageCounts,
    pub colony_survived: bool,
    pub steps_survived: usize,
    pub max_food_stock: f32,
}

fn last(series: &[usize]) -> usize {
    series.last().copied().unwrap_or(0)
}

fn peak(series: &[usize]) -> usize {
    series.iter().copied().max().unwrap_or(0)
}

fn mean(series: &[usize]) -> f32 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<usize>() as f32 / series.len() as f32
}
