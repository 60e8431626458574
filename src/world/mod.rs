//! World management: shared layout configuration and spatial partitioning.

use bevy::prelude::*;

pub mod grid;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldConfig>();
    }
}

/// Global world layout configuration.
#[derive(Resource)]
pub struct WorldConfig {
    /// Street map dimension in cells (the map is always square).
    pub grid_size: usize,
    /// Half-extent of a ground tile in world units. Cells sit on a
    /// doubled-pitch grid, so each tile owns a `2 * tile_size` square.
    pub tile_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 16,
            tile_size: 2.0,
        }
    }
}
