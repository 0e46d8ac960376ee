//! Worker ants: the colony population everything else revolves around.

use super::{Entity, Fungus, TILE_ANT};
use crate::grid::Position;
use serde::{Deserialize, Serialize};

/// A worker ant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ant {
    pub pos: Position,
    pub active: bool,
    pub energy: f32,
    /// Reserved for foraging mechanics.
    pub carrying_food: bool,
}

impl Ant {
    /// Nutrition an ant can take from a fungus garden in one meal.
    pub const MEAL_SIZE: f32 = 5.0;

    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            active: true,
            energy: 100.0,
            carrying_food: false,
        }
    }

    /// Feed from a fungus garden, gaining the consumed nutrition as energy.
    ///
    /// Not invoked by the tick pipeline; ant energy is tracked but not yet
    /// drained or replenished during normal simulation.
    pub fn consume_fungus(&mut self, fungus: &mut Fungus) -> f32 {
        if fungus.can_be_consumed() {
            let consumed = fungus.consume().min(Self::MEAL_SIZE);
            self.energy += consumed;
            return consumed;
        }
        0.0
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Entity for Ant {
    fn position(&self) -> Position {
        self.pos
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn symbol(&self) -> char {
        TILE_ANT
    }
}
