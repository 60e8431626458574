//! Broad-phase collision: two spatial grids and directional prediction.

use bevy::prelude::*;
use thiserror::Error;

use crate::world::grid::SpatialGrid;

pub mod shapes;

pub use shapes::{bodies_collide, Body, Collider, ColliderKind};

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionMap>();
    }
}

/// Construction-time configuration failures.
#[derive(Debug, Error)]
pub enum CollisionError {
    #[error("cell grain must be positive, got {0}")]
    NonPositiveGrain(f32),
}

/// Default cell grain for both grids, sized for the largest stock
/// footprint.
const DEFAULT_GRAIN: f32 = 4.0;

/// Broad-phase index answering "what would this entity hit moving along
/// direction D". Movers and static obstacles live in separate grids;
/// both hold entity handles only and never own the entities.
///
/// Callers keep the grids current: remove before moving or despawning an
/// entity, insert after placing it.
#[derive(Resource)]
pub struct CollisionMap {
    movers: SpatialGrid,
    obstacles: SpatialGrid,
}

impl Default for CollisionMap {
    fn default() -> Self {
        Self {
            movers: SpatialGrid::new(DEFAULT_GRAIN, DEFAULT_GRAIN),
            obstacles: SpatialGrid::new(DEFAULT_GRAIN, DEFAULT_GRAIN),
        }
    }
}

impl CollisionMap {
    /// Custom cell grains; fails fast on a non-positive grain.
    pub fn with_grain(mover_grain: f32, obstacle_grain: f32) -> Result<Self, CollisionError> {
        for grain in [mover_grain, obstacle_grain] {
            if grain <= 0.0 {
                return Err(CollisionError::NonPositiveGrain(grain));
            }
        }
        Ok(Self {
            movers: SpatialGrid::new(mover_grain, mover_grain),
            obstacles: SpatialGrid::new(obstacle_grain, obstacle_grain),
        })
    }

    pub fn insert_mover(&mut self, entity: Entity, pos: Vec3) {
        let key = self.movers.key_for(pos);
        self.movers.insert(key, entity);
    }

    pub fn remove_mover(&mut self, entity: Entity, pos: Vec3) -> usize {
        let key = self.movers.key_for(pos);
        self.movers.remove(key, entity)
    }

    pub fn insert_obstacle(&mut self, entity: Entity, pos: Vec3) {
        let key = self.obstacles.key_for(pos);
        self.obstacles.insert(key, entity);
    }

    pub fn remove_obstacle(&mut self, entity: Entity, pos: Vec3) -> usize {
        let key = self.obstacles.key_for(pos);
        self.obstacles.remove(key, entity)
    }

    pub fn clear(&mut self) {
        self.movers.clear();
        self.obstacles.clear();
    }

    pub fn mover_count(&self) -> usize {
        self.movers.len()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// First entity `mover` would hit after one full-speed step along
    /// `direction`, if any. Movers are checked before obstacles;
    /// `lookup` supplies each candidate's current body, and candidates
    /// it cannot resolve are skipped. A zero direction never collides.
    pub fn predict_collision<F>(
        &self,
        mover: Entity,
        body: &Body,
        direction: Vec3,
        lookup: F,
    ) -> Option<Entity>
    where
        F: Fn(Entity) -> Option<Body>,
    {
        if direction.length_squared() <= f32::EPSILON {
            return None;
        }
        let future = body.future_position(direction);

        for grid in [&self.movers, &self.obstacles] {
            let key = grid.key_for(body.position);
            for bucket in grid.quadrant(key) {
                for &candidate in bucket {
                    if candidate == mover {
                        continue;
                    }
                    let Some(other) = lookup(candidate) else {
                        continue;
                    };
                    if shapes::bodies_collide(&body.collider, future, &other) {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn non_positive_grain_is_rejected() {
        assert!(CollisionMap::with_grain(0.0, 2.0).is_err());
        assert!(CollisionMap::with_grain(2.0, -1.0).is_err());
        assert!(CollisionMap::with_grain(2.0, 2.0).is_ok());
    }

    #[test]
    fn mover_predicts_hit_on_adjacent_obstacle() {
        // box mover at the origin, box obstacle half-overlapping its path
        let mut map = CollisionMap::with_grain(2.0, 2.0).unwrap();
        let mover = entity(1);
        let obstacle = entity(2);
        let mover_pos = Vec3::ZERO;
        let obstacle_pos = Vec3::new(1.5, 0.0, 0.0);

        map.insert_mover(mover, mover_pos);
        map.insert_obstacle(obstacle, obstacle_pos);

        let mut bodies = HashMap::new();
        bodies.insert(
            mover,
            Body::new(mover_pos, Collider::box_shape(1.0, 1.0, 1.0), 1.0),
        );
        bodies.insert(
            obstacle,
            Body::new(obstacle_pos, Collider::box_shape(1.0, 1.0, 1.0), 0.0),
        );

        let hit = map.predict_collision(mover, &bodies[&mover], Vec3::X, |e| {
            bodies.get(&e).copied()
        });
        assert_eq!(hit, Some(obstacle));

        // moving away finds nothing
        let hit = map.predict_collision(mover, &bodies[&mover], Vec3::NEG_X, |e| {
            bodies.get(&e).copied()
        });
        assert_eq!(hit, None);
    }

    #[test]
    fn zero_direction_never_collides() {
        let mut map = CollisionMap::with_grain(2.0, 2.0).unwrap();
        let mover = entity(1);
        let obstacle = entity(2);
        map.insert_obstacle(obstacle, Vec3::ZERO);

        let bodies: HashMap<Entity, Body> = [(
            obstacle,
            Body::new(Vec3::ZERO, Collider::box_shape(1.0, 1.0, 1.0), 0.0),
        )]
        .into_iter()
        .collect();

        let body = Body::new(Vec3::ZERO, Collider::box_shape(1.0, 1.0, 1.0), 1.0);
        let hit = map.predict_collision(mover, &body, Vec3::ZERO, |e| bodies.get(&e).copied());
        assert_eq!(hit, None);
    }

    #[test]
    fn movers_take_precedence_over_obstacles() {
        let mut map = CollisionMap::with_grain(2.0, 2.0).unwrap();
        let mover = entity(1);
        let other_mover = entity(2);
        let obstacle = entity(3);
        let blocking_pos = Vec3::new(1.5, 0.0, 0.0);

        map.insert_mover(mover, Vec3::ZERO);
        map.insert_mover(other_mover, blocking_pos);
        map.insert_obstacle(obstacle, blocking_pos);

        let blocker_body = Body::new(blocking_pos, Collider::box_shape(1.0, 1.0, 1.0), 0.0);
        let bodies: HashMap<Entity, Body> = [
            (other_mover, blocker_body),
            (obstacle, blocker_body),
        ]
        .into_iter()
        .collect();

        let body = Body::new(Vec3::ZERO, Collider::box_shape(1.0, 1.0, 1.0), 1.0);
        let hit = map.predict_collision(mover, &body, Vec3::X, |e| bodies.get(&e).copied());
        assert_eq!(hit, Some(other_mover));
    }

    #[test]
    fn removal_makes_entities_invisible_to_prediction() {
        let mut map = CollisionMap::with_grain(2.0, 2.0).unwrap();
        let mover = entity(1);
        let obstacle = entity(2);
        let obstacle_pos = Vec3::new(1.5, 0.0, 0.0);
        map.insert_obstacle(obstacle, obstacle_pos);

        let bodies: HashMap<Entity, Body> = [(
            obstacle,
            Body::new(obstacle_pos, Collider::box_shape(1.0, 1.0, 1.0), 0.0),
        )]
        .into_iter()
        .collect();

        assert_eq!(map.remove_obstacle(obstacle, obstacle_pos), 1);
        // removing again is a benign no-op
        assert_eq!(map.remove_obstacle(obstacle, obstacle_pos), 0);

        let body = Body::new(Vec3::ZERO, Collider::box_shape(1.0, 1.0, 1.0), 1.0);
        let hit = map.predict_collision(mover, &body, Vec3::X, |e| bodies.get(&e).copied());
        assert_eq!(hit, None);
    }

    #[test]
    fn cylinder_mover_hits_box_wall() {
        let mut map = CollisionMap::with_grain(4.0, 4.0).unwrap();
        let mover = entity(1);
        let wall = entity(2);
        let wall_pos = Vec3::new(3.0, 0.0, 0.0);
        map.insert_obstacle(wall, wall_pos);

        let bodies: HashMap<Entity, Body> = [(
            wall,
            Body::new(wall_pos, Collider::box_shape(1.0, 1.0, 2.0), 0.0),
        )]
        .into_iter()
        .collect();

        let body = Body::new(Vec3::ZERO, Collider::cylinder(1.0, 1.0, 1.0), 1.5);
        let hit = map.predict_collision(mover, &body, Vec3::X, |e| bodies.get(&e).copied());
        assert_eq!(hit, Some(wall));
    }
}
