//! Streetrunner - simulation core for a top-down street-grid action game.
//!
//! Procedural street maps via wave-function collapse, a spatial-hash
//! broad phase, and per-axis collision-aware movement. Rendering, input,
//! and game flow live in the host application; the host composes the
//! plugins below into its `App` and attaches meshes to the spawned
//! entities.

use bevy::prelude::*;

pub mod collision;
pub mod procgen;
pub mod simulation;
pub mod world;

/// Everything the simulation core needs, in one plugin.
pub struct StreetRunnerPlugin;

impl Plugin for StreetRunnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(world::WorldPlugin)
            .add_plugins(collision::CollisionPlugin)
            .add_plugins(procgen::ProcgenPlugin)
            .add_plugins(simulation::SimulationPlugin);
    }
}
