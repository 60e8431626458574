//! Street map instantiation: ground tiles, buildings, pickups, goals,
//! and the vacant spawn pool.
//!
//! Spawned entities carry only a `Transform` plus a marker component;
//! the host attaches meshes and materials. Colliders are registered in
//! the [`CollisionMap`] as they spawn.

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

use crate::collision::{Collider, CollisionMap};
use crate::world::WorldConfig;

use super::connectivity::RoadNetwork;
use super::tiles::TileKind;
use super::wave::WaveGrid;
use super::MapConfig;

/// Marker for ground tiles.
#[derive(Component)]
pub struct StreetTile {
    pub kind: TileKind,
    pub cell: usize,
}

/// Building blocking movement.
#[derive(Component)]
pub struct Building;

/// Collectible point pickup.
#[derive(Component)]
pub struct Pickup;

/// The goal the player must reach.
#[derive(Component)]
pub struct EndGoal;

/// Marker that map entities have been instantiated.
#[derive(Resource, Default)]
pub struct MapElementsSpawned(pub bool);

/// The resolved street map and its spawnable-cell pool.
#[derive(Resource, Default)]
pub struct StreetMap {
    pub tiles: Vec<TileKind>,
    pub size: usize,
    pub tile_size: f32,
    /// Walkable cells not occupied by a pickup or goal.
    vacant: Vec<usize>,
    pub generated: bool,
}

impl StreetMap {
    pub fn tile(&self, x: usize, z: usize) -> Option<TileKind> {
        if x < self.size && z < self.size {
            self.tiles.get(x + z * self.size).copied()
        } else {
            None
        }
    }

    /// World-space center of a cell. Cells sit on a doubled-pitch grid,
    /// each tile owning a full `2 * tile_size` square.
    pub fn world_position(&self, idx: usize) -> Vec3 {
        let x = (idx % self.size) as f32;
        let z = (idx / self.size) as f32;
        Vec3::new(
            x * (2.0 * self.tile_size) + self.tile_size / 2.0,
            0.0,
            z * (2.0 * self.tile_size) + self.tile_size / 2.0,
        )
    }

    /// A uniformly random vacant cell center, for player or enemy
    /// placement. Selection does not consume the cell.
    pub fn random_vacant_position(&self, rng: &mut impl Rng) -> Option<Vec3> {
        if self.vacant.is_empty() {
            return None;
        }
        let idx = self.vacant[rng.gen_range(0..self.vacant.len())];
        Some(self.world_position(idx))
    }

    pub fn vacant_cells(&self) -> &[usize] {
        &self.vacant
    }

    /// ASCII rendering of the resolved map, one row per line.
    pub fn ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.size);
        for row in self.tiles.chunks(self.size.max(1)) {
            out.extend(row.iter().map(|t| t.glyph()));
            out.push('\n');
        }
        out
    }
}

/// Walkable cells minus the occupied ones. Pickups and goals claim their
/// cells, so spawn placement cannot stack onto collectibles.
fn vacant_cells(tiles: &[TileKind], occupied: &HashSet<usize>) -> Vec<usize> {
    tiles
        .iter()
        .enumerate()
        .filter(|(idx, kind)| kind.is_walkable() && !occupied.contains(idx))
        .map(|(idx, _)| idx)
        .collect()
}

pub(super) fn should_generate(map: Res<StreetMap>) -> bool {
    !map.generated
}

/// Run the wave-function collapse and store the resolved map.
pub(super) fn generate_street_map(
    world_config: Res<WorldConfig>,
    config: Res<MapConfig>,
    mut map: ResMut<StreetMap>,
) {
    map.generated = true;

    let mut wave = match WaveGrid::new(world_config.grid_size, config.end_points) {
        Ok(wave) => wave,
        Err(err) => {
            error!("street map generation aborted: {err}");
            return;
        }
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let tiles = wave.generate(&mut rng);

    let patched = wave.resolved_anomalies().len();
    if patched > 0 {
        warn!("{patched} contradictory cell(s) patched to crossings");
    }

    map.tiles = tiles;
    map.size = world_config.grid_size;
    map.tile_size = world_config.tile_size;

    info!(
        "Generated {}x{} street map with {} endpoint(s)",
        map.size,
        map.size,
        map.tiles
            .iter()
            .filter(|t| **t == TileKind::Endpoint)
            .count()
    );
    debug!("street map:\n{}", map.ascii());
}

pub(super) fn should_spawn(map: Res<StreetMap>, spawned: Res<MapElementsSpawned>) -> bool {
    map.generated && !map.tiles.is_empty() && !spawned.0
}

/// Instantiate world entities for every resolved cell and derive the
/// vacant spawn pool.
pub(super) fn spawn_map_elements(
    mut commands: Commands,
    config: Res<MapConfig>,
    mut map: ResMut<StreetMap>,
    mut collision: ResMut<CollisionMap>,
    mut spawned: ResMut<MapElementsSpawned>,
    mut local_rng: Local<Option<StdRng>>,
) {
    let rng = local_rng.get_or_insert_with(|| StdRng::seed_from_u64(config.seed.wrapping_add(1)));

    let tile_size = map.tile_size;
    let mut occupied: HashSet<usize> = HashSet::new();

    for idx in 0..map.tiles.len() {
        let kind = map.tiles[idx];
        let center = map.world_position(idx);
        let ground = Vec3::new(center.x, -1.0, center.z);

        commands.spawn((
            StreetTile { kind, cell: idx },
            Transform::from_translation(ground)
                .with_scale(Vec3::new(tile_size, 1.0, tile_size)),
        ));

        match kind {
            TileKind::Block => {
                let entity = commands
                    .spawn((
                        Building,
                        Collider::box_shape(tile_size, tile_size, 2.0),
                        Transform::from_translation(center),
                    ))
                    .id();
                collision.insert_obstacle(entity, center);
            }
            TileKind::Endpoint => {
                let entity = commands
                    .spawn((
                        EndGoal,
                        Collider::box_shape(2.0, 1.0, 1.0),
                        Transform::from_translation(center),
                    ))
                    .id();
                collision.insert_mover(entity, center);
                occupied.insert(idx);
            }
            TileKind::Cross | TileKind::RoadNS | TileKind::RoadEW => {
                if rng.gen_bool(config.pickup_chance) {
                    let entity = commands
                        .spawn((
                            Pickup,
                            Collider::box_shape(0.5, 0.5, 0.5),
                            Transform::from_translation(center),
                        ))
                        .id();
                    collision.insert_mover(entity, center);
                    occupied.insert(idx);
                }
            }
            _ => {}
        }
    }

    map.vacant = vacant_cells(&map.tiles, &occupied);

    let network = RoadNetwork::from_tiles(&map.tiles, map.size);
    let any_goal_reachable = map
        .tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| **t == TileKind::Endpoint)
        .any(|(goal, _)| {
            map.vacant
                .iter()
                .any(|&from| network.is_connected(from, goal))
        });
    if !any_goal_reachable {
        warn!("no endpoint is reachable from the vacant pool");
    }

    spawned.0 = true;
    info!(
        "Spawned street entities: {} cells, {} vacant",
        map.tiles.len(),
        map.vacant.len()
    );
}
