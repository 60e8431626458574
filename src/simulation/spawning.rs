//! Enemy spawn placement on vacant street cells.

use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use crate::collision::{Collider, CollisionMap};
use crate::procgen::StreetMap;

use super::movement::Locomotion;

/// Marker for hostile movers.
#[derive(Component)]
pub struct Enemy;

#[derive(Resource)]
pub struct EnemySpawnConfig {
    /// How many enemies the map should hold.
    pub target_count: usize,
    /// Movement speed handed to each enemy's `Locomotion`.
    pub speed: f32,
    /// Elliptical footprint radii and height.
    pub x_radius: f32,
    pub z_radius: f32,
    pub height: f32,
    /// Seed keeping placement deterministic between runs.
    pub seed: u64,
}

impl Default for EnemySpawnConfig {
    fn default() -> Self {
        Self {
            target_count: 8,
            speed: 4.0,
            x_radius: 2.0,
            z_radius: 2.0,
            height: 1.0,
            seed: 1337,
        }
    }
}

pub(super) fn should_spawn_enemies(
    map: Res<StreetMap>,
    config: Res<EnemySpawnConfig>,
    enemies: Query<&Enemy>,
) -> bool {
    map.generated
        && !map.vacant_cells().is_empty()
        && enemies.iter().count() < config.target_count
}

/// Top enemies up to the configured count, each on a random vacant cell.
/// Enemies spawn standing still; host AI steers them.
pub(super) fn spawn_enemies(
    mut commands: Commands,
    map: Res<StreetMap>,
    config: Res<EnemySpawnConfig>,
    mut collision: ResMut<CollisionMap>,
    enemies: Query<&Enemy>,
    mut local_rng: Local<Option<StdRng>>,
) {
    let rng = local_rng.get_or_insert_with(|| StdRng::seed_from_u64(config.seed));

    let missing = config.target_count.saturating_sub(enemies.iter().count());
    for _ in 0..missing {
        let Some(position) = map.random_vacant_position(rng) else {
            warn!("no vacant cells left for enemy spawning");
            return;
        };
        let entity = commands
            .spawn((
                Enemy,
                Collider::cylinder(config.x_radius, config.z_radius, config.height),
                Locomotion::stationary(config.speed),
                Transform::from_translation(position),
            ))
            .id();
        collision.insert_mover(entity, position);
    }
    info!("Spawned {missing} enemies");
}
