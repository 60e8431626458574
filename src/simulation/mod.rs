//! Simulation systems: movement integration and enemy spawning.

use bevy::prelude::*;

pub mod movement;
pub mod spawning;

pub use movement::{apply_locomotion, ContactEvent, Locomotion};
pub use spawning::{Enemy, EnemySpawnConfig};

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemySpawnConfig>()
            .add_event::<ContactEvent>()
            .add_systems(
                Update,
                (
                    spawning::spawn_enemies.run_if(spawning::should_spawn_enemies),
                    movement::apply_locomotion,
                )
                    .chain(),
            );
    }
}
