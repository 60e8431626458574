//! Bounding footprints and the shape-pair intersection tests.
//!
//! All tests run on the ground plane: the mover's X/Z extents at its
//! future position against the other body's current extents. Heights are
//! carried for the host but play no part in the overlap math.

use bevy::prelude::*;

/// Shape category approximating an entity's collidable footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColliderKind {
    Box,
    Cylinder,
}

/// Collidable footprint: half-extents (box) or elliptical radii
/// (cylinder) on X/Z, plus a height.
#[derive(Component, Clone, Copy, Debug)]
pub struct Collider {
    pub kind: ColliderKind,
    pub x_radius: f32,
    pub z_radius: f32,
    pub height: f32,
}

impl Collider {
    pub fn box_shape(x_radius: f32, z_radius: f32, height: f32) -> Self {
        Self {
            kind: ColliderKind::Box,
            x_radius,
            z_radius,
            height,
        }
    }

    pub fn cylinder(x_radius: f32, z_radius: f32, height: f32) -> Self {
        Self {
            kind: ColliderKind::Cylinder,
            x_radius,
            z_radius,
            height,
        }
    }
}

/// Positional snapshot of one entity, as handed to the geometry tests.
#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub position: Vec3,
    pub collider: Collider,
    pub speed: f32,
}

impl Body {
    pub fn new(position: Vec3, collider: Collider, speed: f32) -> Self {
        Self {
            position,
            collider,
            speed,
        }
    }

    /// Where the body ends up after one full-speed step along
    /// `direction`.
    pub fn future_position(&self, direction: Vec3) -> Vec3 {
        self.position + direction * self.speed
    }
}

/// Would `mover`, displaced to `future`, overlap `other` where it
/// stands? Dispatches the four kind pairings exhaustively.
pub fn bodies_collide(mover: &Collider, future: Vec3, other: &Body) -> bool {
    match (mover.kind, other.collider.kind) {
        (ColliderKind::Box, ColliderKind::Box) => box_box(mover, future, other),
        (ColliderKind::Box, ColliderKind::Cylinder) => box_cylinder(mover, future, other),
        (ColliderKind::Cylinder, ColliderKind::Box) => cylinder_box(mover, future, other),
        (ColliderKind::Cylinder, ColliderKind::Cylinder) => cylinder_cylinder(mover, future, other),
    }
}

fn axis_overlap(min_a: f32, max_a: f32, min_b: f32, max_b: f32) -> bool {
    min_a.max(min_b) < max_a.min(max_b)
}

/// Strict AABB overlap on X/Z; an exact touch does not collide.
fn box_box(mover: &Collider, future: Vec3, other: &Body) -> bool {
    let o = &other.collider;
    let p = other.position;
    axis_overlap(
        future.x - mover.x_radius,
        future.x + mover.x_radius,
        p.x - o.x_radius,
        p.x + o.x_radius,
    ) && axis_overlap(
        future.z - mover.z_radius,
        future.z + mover.z_radius,
        p.z - o.z_radius,
        p.z + o.z_radius,
    )
}

/// Unit bearing from `from` toward `to` on the ground plane; `None` when
/// the centers coincide (callers treat that as a collision rather than
/// dividing by zero).
fn bearing(from: Vec3, to: Vec3) -> Option<(f32, f32)> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    let dist = (dx * dx + dz * dz).sqrt();
    if dist <= f32::EPSILON {
        return None;
    }
    Some((dx / dist, dz / dist))
}

/// Parametric boundary point of an elliptical footprint along a bearing.
fn elliptic_offset(collider: &Collider, cos: f32, sin: f32) -> (f32, f32) {
    (collider.x_radius * cos, collider.z_radius * sin)
}

/// Moving box against a standing cylinder: the cylinder's boundary point
/// toward the box must fall inside the box's future extents.
fn box_cylinder(mover: &Collider, future: Vec3, other: &Body) -> bool {
    let Some((cos, sin)) = bearing(other.position, future) else {
        return true;
    };
    let (ox, oz) = elliptic_offset(&other.collider, cos, sin);
    let px = other.position.x + ox;
    let pz = other.position.z + oz;
    px > future.x - mover.x_radius
        && px < future.x + mover.x_radius
        && pz > future.z - mover.z_radius
        && pz < future.z + mover.z_radius
}

/// Moving cylinder against a standing box: the cylinder's own boundary
/// point toward the box, evaluated at the future position.
fn cylinder_box(mover: &Collider, future: Vec3, other: &Body) -> bool {
    let Some((cos, sin)) = bearing(future, other.position) else {
        return true;
    };
    let (ox, oz) = elliptic_offset(mover, cos, sin);
    let px = future.x + ox;
    let pz = future.z + oz;
    let o = &other.collider;
    px > other.position.x - o.x_radius
        && px < other.position.x + o.x_radius
        && pz > other.position.z - o.z_radius
        && pz < other.position.z + o.z_radius
}

/// Moving cylinder against a standing cylinder: centers closer than the
/// sum of both directional radii along the connecting line. Strict, so
/// an exact touch does not collide, matching the box test.
fn cylinder_cylinder(mover: &Collider, future: Vec3, other: &Body) -> bool {
    let dx = other.position.x - future.x;
    let dz = other.position.z - future.z;
    let dist = (dx * dx + dz * dz).sqrt();
    if dist <= f32::EPSILON {
        return true;
    }
    let (cos, sin) = (dx / dist, dz / dist);
    let (mx, mz) = elliptic_offset(mover, cos, sin);
    let (ox, oz) = elliptic_offset(&other.collider, cos, sin);
    let mover_reach = (mx * mx + mz * mz).sqrt();
    let other_reach = (ox * ox + oz * oz).sqrt();
    dist < mover_reach + other_reach
}
