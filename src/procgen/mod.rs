//! Procedural street map generation.
//!
//! - Wave-function collapse over a road/building tile alphabet
//! - Entity instantiation for the resolved map
//! - Connectivity queries over the walkable network

use bevy::prelude::*;
use thiserror::Error;

pub mod connectivity;
pub mod map_builder;
pub mod tiles;
pub mod wave;

pub use map_builder::{Building, EndGoal, Pickup, StreetMap, StreetTile};
pub use tiles::{AdjacencyRules, Direction, TileKind};
pub use wave::WaveGrid;

pub struct ProcgenPlugin;

impl Plugin for ProcgenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapConfig>()
            .init_resource::<StreetMap>()
            .init_resource::<map_builder::MapElementsSpawned>()
            .add_systems(
                Update,
                (
                    map_builder::generate_street_map.run_if(map_builder::should_generate),
                    map_builder::spawn_map_elements.run_if(map_builder::should_spawn),
                )
                    .chain(),
            );
    }
}

/// Settings for a generation run.
#[derive(Resource)]
pub struct MapConfig {
    /// How many goal cells to seed.
    pub end_points: usize,
    /// Chance for a road cell to hold a point pickup.
    pub pickup_chance: f64,
    /// Seed keeping generation deterministic between runs.
    pub seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            end_points: 1,
            pickup_chance: 0.2,
            seed: 42,
        }
    }
}

/// Construction-time generation failures.
#[derive(Debug, Error)]
pub enum ProcgenError {
    #[error("grid size must be at least 1")]
    InvalidGridSize,
}
