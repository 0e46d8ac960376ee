//! Grid geometry: positions, neighborhoods, movement directions.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Movement offsets: north, south, west, east, stay.
pub const DIRECTIONS: [(i32, i32); 5] = [(-1, 0), (1, 0), (0, -1), (0, 1), (0, 0)];

/// A cell coordinate on the square simulation grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Draw a uniformly random cell within the grid.
    pub fn random<R: Rng>(rng: &mut R, grid_size: usize) -> Self {
        Self {
            x: rng.gen_range(0..grid_size),
            y: rng.gen_range(0..grid_size),
        }
    }

    /// Manhattan distance to another cell.
    pub fn manhattan_distance(&self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Offset by a delta, clamped to grid bounds.
    pub fn offset(&self, dx: i32, dy: i32, grid_size: usize) -> Position {
        let max = grid_size as i32 - 1;
        Position {
            x: (self.x as i32 + dx).clamp(0, max) as usize,
            y: (self.y as i32 + dy).clamp(0, max) as usize,
        }
    }

    /// In-bounds cells of the 4-neighborhood.
    pub fn neighbors(&self, grid_size: usize) -> Vec<Position> {
        let mut cells = Vec::with_capacity(4);
        for (dx, dy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
            let nx = self.x as i32 + dx;
            let ny = self.y as i32 + dy;
            if nx >= 0 && nx < grid_size as i32 && ny >= 0 && ny < grid_size as i32 {
                cells.push(Position::new(nx as usize, ny as usize));
            }
        }
        cells
    }
}
