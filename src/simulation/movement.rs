//! Per-axis collision-aware movement integration.
//!
//! Each ground axis is tested and applied independently, so a mover
//! blocked on X still advances on Z and slides along walls instead of
//! stopping dead.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::collision::{Body, Collider, CollisionMap};

/// Steering state for anything the movement integrator drives. Hosts
/// set `direction` (player input, enemy AI); the integrator applies it.
#[derive(Component, Clone, Copy, Debug)]
pub struct Locomotion {
    /// Movement direction in world space (Y ignored).
    pub direction: Vec3,
    /// World units per second at full throttle.
    pub speed: f32,
}

impl Locomotion {
    pub fn stationary(speed: f32) -> Self {
        Self {
            direction: Vec3::ZERO,
            speed,
        }
    }
}

/// Emitted when a mover's axis step is blocked by another entity. The
/// host decides what a contact means (pickup, damage, goal).
#[derive(Event, Debug, Clone, Copy)]
pub struct ContactEvent {
    pub mover: Entity,
    pub hit: Entity,
}

/// Move every `Locomotion` entity, testing each ground axis
/// independently against the collision map.
pub fn apply_locomotion(
    time: Res<Time>,
    mut collision: ResMut<CollisionMap>,
    mut contacts: EventWriter<ContactEvent>,
    mut queries: ParamSet<(
        Query<(Entity, &Transform, &Collider)>,
        Query<(Entity, &mut Transform, &Collider, &Locomotion)>,
    )>,
) {
    let dt = time.delta_secs();

    // snapshot every collidable body once; prediction resolves
    // candidates against this frame-start view
    let bodies: HashMap<Entity, Body> = queries
        .p0()
        .iter()
        .map(|(entity, transform, collider)| {
            (entity, Body::new(transform.translation, *collider, 0.0))
        })
        .collect();

    for (entity, mut transform, collider, locomotion) in queries.p1().iter_mut() {
        if locomotion.direction.length_squared() <= f32::EPSILON {
            continue;
        }

        let start = transform.translation;
        collision.remove_mover(entity, start);

        let mut body = Body::new(start, *collider, locomotion.speed);

        // prediction looks a full speed-step ahead; the applied
        // translation is the dt-scaled slice of it
        for axis in [Vec3::X, Vec3::Z] {
            let partial = locomotion.direction * axis;
            if partial.length_squared() <= f32::EPSILON {
                continue;
            }
            match collision.predict_collision(entity, &body, partial, |e| bodies.get(&e).copied())
            {
                None => {
                    body.position += partial * locomotion.speed * dt;
                }
                Some(hit) => {
                    contacts.send(ContactEvent { mover: entity, hit });
                }
            }
        }

        transform.translation = body.position;
        collision.insert_mover(entity, body.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_event::<ContactEvent>();
        app.init_resource::<CollisionMap>();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs_f32(0.1));
        app.insert_resource(time);
        app.add_systems(Update, apply_locomotion);
        app
    }

    fn drain_contacts(app: &mut App) -> Vec<ContactEvent> {
        app.world_mut()
            .resource_mut::<Events<ContactEvent>>()
            .drain()
            .collect()
    }

    #[test]
    fn free_mover_translates_along_its_direction() {
        let mut app = test_app();
        let mover = app
            .world_mut()
            .spawn((
                Collider::box_shape(1.0, 1.0, 1.0),
                Transform::default(),
                Locomotion {
                    direction: Vec3::X,
                    speed: 2.0,
                },
            ))
            .id();
        app.world_mut()
            .resource_mut::<CollisionMap>()
            .insert_mover(mover, Vec3::ZERO);

        app.update();

        let translation = app.world().get::<Transform>(mover).unwrap().translation;
        assert!((translation.x - 0.2).abs() < 1e-5);
        assert_eq!(translation.z, 0.0);
        assert!(drain_contacts(&mut app).is_empty());
    }

    #[test]
    fn blocked_axis_stays_put_and_reports_contact() {
        let mut app = test_app();
        let wall_pos = Vec3::new(1.5, 0.0, 0.0);
        let wall = app
            .world_mut()
            .spawn((
                Collider::box_shape(1.0, 1.0, 2.0),
                Transform::from_translation(wall_pos),
            ))
            .id();
        let mover = app
            .world_mut()
            .spawn((
                Collider::box_shape(1.0, 1.0, 1.0),
                Transform::default(),
                Locomotion {
                    direction: Vec3::X,
                    speed: 1.0,
                },
            ))
            .id();
        {
            let mut map = app.world_mut().resource_mut::<CollisionMap>();
            map.insert_obstacle(wall, wall_pos);
            map.insert_mover(mover, Vec3::ZERO);
        }

        app.update();

        let translation = app.world().get::<Transform>(mover).unwrap().translation;
        assert_eq!(translation, Vec3::ZERO);

        let contacts = drain_contacts(&mut app);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].mover, mover);
        assert_eq!(contacts[0].hit, wall);
    }

    #[test]
    fn mover_slides_along_a_wall() {
        let mut app = test_app();
        // wall blocks X only; the diagonal mover keeps its Z motion
        let wall_pos = Vec3::new(2.5, 0.0, 0.0);
        let wall = app
            .world_mut()
            .spawn((
                Collider::box_shape(1.0, 1.0, 2.0),
                Transform::from_translation(wall_pos),
            ))
            .id();
        let mover = app
            .world_mut()
            .spawn((
                Collider::box_shape(1.0, 1.0, 1.0),
                Transform::default(),
                Locomotion {
                    direction: Vec3::new(1.0, 0.0, 1.0),
                    speed: 1.0,
                },
            ))
            .id();
        {
            let mut map = app.world_mut().resource_mut::<CollisionMap>();
            map.insert_obstacle(wall, wall_pos);
            map.insert_mover(mover, Vec3::ZERO);
        }

        app.update();

        let translation = app.world().get::<Transform>(mover).unwrap().translation;
        assert_eq!(translation.x, 0.0);
        assert!((translation.z - 0.1).abs() < 1e-5);

        let contacts = drain_contacts(&mut app);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].hit, wall);
    }

    #[test]
    fn stationary_locomotion_is_skipped() {
        let mut app = test_app();
        let mover = app
            .world_mut()
            .spawn((
                Collider::cylinder(1.0, 1.0, 1.0),
                Transform::default(),
                Locomotion::stationary(3.0),
            ))
            .id();
        app.world_mut()
            .resource_mut::<CollisionMap>()
            .insert_mover(mover, Vec3::ZERO);

        app.update();

        let translation = app.world().get::<Transform>(mover).unwrap().translation;
        assert_eq!(translation, Vec3::ZERO);
    }
}
