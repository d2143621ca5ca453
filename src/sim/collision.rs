//! Hit tests and projectile steering
//!
//! Each projectile kind has its own notion of "touching" a target:
//! travelling shots use a circle test, fire uses an enlarged area, and beams
//! test a vertical band above their anchor point.

use glam::Vec2;

use super::state::{Projectile, WeaponKind};
use crate::consts::*;

/// Plain circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

/// Effective hit radius of a target for a given projectile kind
#[inline]
pub fn hit_radius(kind: WeaponKind, radius: f32, tolerance: f32) -> f32 {
    match kind {
        WeaponKind::Fire => radius * FIRE_RADIUS_SCALE * tolerance,
        _ => radius * tolerance,
    }
}

/// Beam band test: target x within the band, target above the anchor
#[inline]
pub fn beam_hits(beam_x: f32, anchor_y: f32, target: Vec2, half_width: f32) -> bool {
    (target.x - beam_x).abs() <= half_width && target.y < anchor_y
}

/// Beam half-width for a viewport (wider screens get a wider beam)
#[inline]
pub fn beam_half_width(viewport_width: f32, target_radius: f32) -> f32 {
    let scale = (viewport_width / 800.0).clamp(0.6, 1.5);
    BEAM_HALF_WIDTH * scale + target_radius
}

/// Does `projectile` touch a circular target this tick?
///
/// Projectiles that already resolved a hit never hit again.
pub fn projectile_hits(
    projectile: &Projectile,
    target: Vec2,
    radius: f32,
    tolerance: f32,
    viewport_width: f32,
) -> bool {
    if projectile.has_hit {
        return false;
    }
    match projectile.kind {
        WeaponKind::Beam => beam_hits(
            projectile.pos.x,
            projectile.pos.y,
            target,
            beam_half_width(viewport_width, radius),
        ),
        kind => {
            let r = hit_radius(kind, radius, tolerance);
            projectile.pos.distance_squared(target) <= r * r
        }
    }
}

/// Turn a homing missile toward `target` and keep its facing in sync
pub fn steer_missile(projectile: &mut Projectile, target: Option<Vec2>, dt: f32) {
    if let Some(target) = target {
        let desired = (target - projectile.pos).normalize_or_zero();
        projectile.vel += desired * MISSILE_TURN_ACCEL * dt;
        projectile.vel = projectile.vel.clamp_length_max(MISSILE_MAX_SPEED);
    }
    if projectile.vel.length_squared() > 0.0 {
        projectile.angle = projectile.vel.y.atan2(projectile.vel.x);
    }
}
