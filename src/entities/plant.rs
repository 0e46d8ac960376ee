//! Plants: passive growth, harvested by ants into fungus gardens.

use super::{Entity, TILE_PLANT};
use crate::grid::Position;
use serde::{Deserialize, Serialize};

/// A plant that ants can harvest once mature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plant {
    pub pos: Position,
    pub active: bool,
    /// Maturity level, 0..=100
    pub maturity: f32,
    pub growth_rate: f32,
}

impl Plant {
    /// New plants start fully mature.
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            active: true,
            maturity: 100.0,
            growth_rate: 1.0,
        }
    }

    /// Grow toward full maturity; plants never die on their own.
    pub fn grow(&mut self) {
        if self.maturity < 100.0 {
            self.maturity = (self.maturity + self.growth_rate).min(100.0);
        }
    }

    pub fn can_be_harvested(&self) -> bool {
        self.maturity >= 50.0
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Entity for Plant {
    fn position(&self) -> Position {
        self.pos
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn symbol(&self) -> char {
        TILE_PLANT
    }
}
