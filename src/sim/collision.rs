//! Axis-aligned hit tests
//!
//! Everything is compared on the (x, z) plane with per-axis thresholds;
//! y is decorative and never participates.

use super::state::{Player, Shot, Star};

/// Minimum lateral gap between a new Survival spawn and any existing object
pub const MIN_SPAWN_GAP_X: f32 = 0.85;
/// Minimum depth gap between a new Survival spawn and any existing object
pub const MIN_SPAWN_GAP_Z: f32 = 9.0;

/// Per-axis half extents of a hit window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub x: f32,
    pub z: f32,
}

impl HitBox {
    /// Survival obstacles against the ship
    pub fn survival(size: f32) -> Self {
        Self {
            x: (size * 0.7).max(0.5),
            z: size.max(0.6),
        }
    }

    /// Collector stars against the ship
    pub fn collector(size: f32) -> Self {
        Self {
            x: size.max(0.6),
            z: (size * 1.2).max(0.6),
        }
    }

    /// Strict containment of the offset (dx, dz)
    #[inline]
    pub fn contains(&self, dx: f32, dz: f32) -> bool {
        dx.abs() < self.x && dz.abs() < self.z
    }
}

/// Does the star overlap the player within `hit_box`?
pub fn hits_player(star: &Star, player: &Player, hit_box: HitBox) -> bool {
    hit_box.contains(star.pos.x - player.x, star.pos.z - player.z)
}

/// Shot/star test. The depth window widens with the distance the shot
/// travelled this frame so fast shots cannot tunnel.
pub fn shot_hits(star: &Star, shot: &Shot, dt: f32, shot_speed: f32) -> bool {
    let window = HitBox {
        x: (star.size - 0.1).max(0.2),
        z: 0.2 + dt * shot_speed,
    };
    window.contains(star.pos.x - shot.pos.x, star.pos.z - shot.pos.z)
}

/// True when (x, z) keeps the minimum spawn spacing from every object
pub fn position_is_clear(stars: &[Star], x: f32, z: f32) -> bool {
    !stars
        .iter()
        .any(|s| (s.pos.x - x).abs() < MIN_SPAWN_GAP_X && (s.pos.z - z).abs() < MIN_SPAWN_GAP_Z)
}
