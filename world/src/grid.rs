//! Uniform spatial hash that bounds the collision narrow phase.

use std::collections::HashMap;

use skyfall_defence_core::{AsteroidId, Vec2};

/// Coarse bucketing of asteroid centres into fixed-size square cells.
///
/// The grid is rebuilt from scratch every tick; queries gather the ids from
/// every cell a circle of the requested radius can touch, so callers still
/// perform the exact circle test on the candidates.
#[derive(Debug)]
pub(crate) struct SpatialGrid {
    cell_size: f32,
    buckets: HashMap<(i32, i32), Vec<AsteroidId>>,
}

impl SpatialGrid {
    pub(crate) fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            buckets: HashMap::new(),
        }
    }

    fn cell_of(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Empties every bucket while keeping their allocations warm.
    pub(crate) fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }

    pub(crate) fn insert(&mut self, id: AsteroidId, position: Vec2) {
        let cell = self.cell_of(position);
        self.buckets.entry(cell).or_default().push(id);
    }

    /// Collects the ids stored in every cell within `radius` of `position`.
    ///
    /// Cells are visited in a fixed row-major order so the output is
    /// deterministic for identical world states.
    pub(crate) fn nearby(&self, position: Vec2, radius: f32, out: &mut Vec<AsteroidId>) {
        out.clear();
        let reach = (radius / self.cell_size).ceil().max(0.0) as i32;
        let (center_x, center_y) = self.cell_of(position);
        for row in -reach..=reach {
            for column in -reach..=reach {
                if let Some(bucket) = self.buckets.get(&(center_x + column, center_y + row)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }
}
