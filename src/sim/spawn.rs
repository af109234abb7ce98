//! Procedural spawning
//!
//! Survival batches scatter obstacles across random lanes while keeping a
//! minimum spacing; Collector waves chain stars backward in depth so lane
//! changes between consecutive stars stay reachable.

use glam::Vec3;
use rand::Rng;

use super::collision::position_is_clear;
use super::state::{RoundState, Star, StarKind};
use crate::consts::COLS;
use crate::difficulty::{CollectorProfile, SurvivalProfile};

/// Depth range sampled for Survival spawns (far end, near end)
pub const Z_SPAWN_RANGE: (f32, f32) = (-110.0, -40.0);
/// Random samples tried before the walk-back fallback
pub const SPAWN_SAMPLE_ATTEMPTS: usize = 8;
/// Walk-back step and step count for the fallback search
pub const RESOLVE_STEP: f32 = 4.0;
pub const RESOLVE_STEPS: usize = 10;

/// Depth the first star of a Collector wave is placed at
pub const COLLECTOR_Z_SPAWN: f32 = -40.0;
pub const COLLECTOR_BASE_SEP: f32 = 8.0;
pub const COLLECTOR_EXTRA_SEP: f32 = 34.0;
/// How far behind the base depth a wave may chain
pub const COLLECTOR_MAX_CHAIN_BACK: f32 = 260.0;
/// Minimum depth gap to any active Collector star
pub const COLLECTOR_MIN_GAP_Z: f32 = 6.0;
/// Lanes nearest the player favoured by Collector waves
pub const COLLECTOR_NEAR_LANES: usize = 4;
pub const COLLECTOR_NEAR_BIAS: f32 = 0.6;
pub const COLLECTOR_ATTEMPTS_PER_STAR: usize = 15;

const ASTEROID_COLOR: [f32; 3] = [0.5, 0.45, 0.35];
const ENEMY_COLOR: [f32; 3] = [1.0, 0.2, 0.45];
const PICKUP_COLOR: [f32; 3] = [0.2, 1.0, 0.6];
const COLLECTOR_COLOR: [f32; 3] = [1.0, 0.9, 0.2];

/// Where a Survival spawn ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub z: f32,
    /// True when no random sample was clear and the walk-back search was used
    pub via_fallback: bool,
}

/// Spawn one Survival batch. Returns how many obstacles were added.
pub fn spawn_survival_wave(round: &mut RoundState, profile: &SurvivalProfile) -> usize {
    let lo = profile.spawn_min.min(profile.spawn_max);
    let count = round.rng.random_range(lo..=profile.spawn_max);

    for _ in 0..count {
        let lane = round.rng.random_range(0..COLS);
        let placement = pick_spawn_slot(round, lane);
        if placement.via_fallback {
            log::debug!(
                "Lane {} crowded, placed by walk-back at z={:.1}",
                lane,
                placement.z
            );
        }
        let kind = roll_obstacle_kind(round.rng.random::<f32>());
        let star = make_obstacle(round, kind, placement.x, placement.z);
        round.stars.push(star);
    }
    count
}

/// Weighted kind draw: 8% pickup, 22% enemy, the rest asteroids
pub fn roll_obstacle_kind(roll: f32) -> StarKind {
    if roll < 0.08 {
        StarKind::Pickup
    } else if roll < 0.3 {
        StarKind::Enemy
    } else {
        StarKind::Asteroid
    }
}

/// Find a spot in `lane` that keeps the minimum spacing
pub fn pick_spawn_slot(round: &mut RoundState, lane: usize) -> Placement {
    let lane = lane as f32;
    for _ in 0..SPAWN_SAMPLE_ATTEMPTS {
        let x = lane + round.rng.random_range(-0.18..=0.18);
        let z = round.rng.random_range(Z_SPAWN_RANGE.0..=Z_SPAWN_RANGE.1);
        if position_is_clear(&round.stars, x, z) {
            return Placement {
                x,
                z,
                via_fallback: false,
            };
        }
    }

    let x = lane + round.rng.random_range(-0.22..=0.22);
    let z = round
        .rng
        .random_range(Z_SPAWN_RANGE.0 - 10.0..=Z_SPAWN_RANGE.1);
    let (x, z) = resolve_spacing(&round.stars, x, z);
    Placement {
        x,
        z,
        via_fallback: true,
    }
}

/// Walk backward in depth until clear. Best effort: after the step budget
/// the last position is returned even if still crowded.
pub fn resolve_spacing(stars: &[Star], x: f32, mut z: f32) -> (f32, f32) {
    for _ in 0..RESOLVE_STEPS {
        if position_is_clear(stars, x, z) {
            return (x, z);
        }
        z -= RESOLVE_STEP;
    }
    (x, z)
}

/// Build a Survival object with its kind's size, colour, hit points and spin
pub fn make_obstacle(round: &mut RoundState, kind: StarKind, x: f32, z: f32) -> Star {
    let rng = &mut round.rng;
    let (size, color) = match kind {
        StarKind::Asteroid => (rng.random_range(0.5..=1.0), ASTEROID_COLOR),
        StarKind::Enemy => (rng.random_range(0.34..=0.6), ENEMY_COLOR),
        StarKind::Pickup => (rng.random_range(0.25..=0.45), PICKUP_COLOR),
        StarKind::CollectorStar => (rng.random_range(0.45..=0.55), COLLECTOR_COLOR),
    };
    let (spin_angle, spin_speed) = spin_profile(rng, kind);
    Star {
        pos: Vec3::new(x, 0.0, z),
        kind,
        size,
        color,
        hp: kind.base_hp(),
        spin_angle,
        spin_speed,
    }
}

/// Random start angle and kind-dependent spin rate (degrees, degrees/s)
pub fn spin_profile(rng: &mut impl Rng, kind: StarKind) -> (f32, f32) {
    let angle = rng.random_range(0.0..360.0);
    let speed = match kind {
        StarKind::Asteroid => rng.random_range(-70.0..=70.0),
        StarKind::Enemy => 0.0,
        StarKind::Pickup => rng.random_range(20.0..=35.0),
        StarKind::CollectorStar => rng.random_range(8.0..=16.0),
    };
    (angle, speed)
}

/// Drop a bonus pickup near (x, z), nudged back until clear
pub fn spawn_bonus_pickup(round: &mut RoundState, x: f32, z: f32) {
    let (x, z) = resolve_spacing(&round.stars, x, z);
    let mut pickup = make_obstacle(round, StarKind::Pickup, x, z);
    pickup.size = round.rng.random_range(0.25..=0.4);
    log::debug!("Bonus pickup at ({:.2}, {:.1})", x, z);
    round.stars.push(pickup);
}

/// Spawn one Collector wave. Returns how many stars were added; stars that
/// cannot be placed within the attempt budget are skipped.
pub fn spawn_collector_wave(round: &mut RoundState, profile: &CollectorProfile) -> usize {
    let mut active_z: Vec<f32> = round
        .stars
        .iter()
        .filter(|s| s.kind == StarKind::CollectorStar)
        .map(|s| s.pos.z)
        .collect();

    let player_lane = round.player.x.round() as i64;
    let mut lanes: Vec<usize> = (0..COLS).collect();
    lanes.sort_by_key(|&lane| (lane as i64 - player_lane).abs());
    let near = COLLECTOR_NEAR_LANES.min(lanes.len());

    let speed_factor = profile.star_speed / 10.0;
    let max_attempts = profile.stars_per_wave * COLLECTOR_ATTEMPTS_PER_STAR;
    let floor_z = COLLECTOR_Z_SPAWN - COLLECTOR_MAX_CHAIN_BACK;

    let mut last_lane: Option<usize> = None;
    let mut last_z = COLLECTOR_Z_SPAWN;
    let mut spawned = 0;
    let mut attempts = 0;

    while spawned < profile.stars_per_wave && attempts < max_attempts {
        attempts += 1;

        let pool = if round.rng.random::<f32>() < COLLECTOR_NEAR_BIAS {
            &lanes[..near]
        } else {
            &lanes[..]
        };
        let lane = pool[round.rng.random_range(0..pool.len())];

        let mut z = match last_lane {
            None => last_z,
            Some(prev) => last_z - collector_separation(prev, lane, speed_factor),
        };
        z = z.max(floor_z);
        z += round.rng.random_range(-1.0..=1.0);

        if active_z
            .iter()
            .any(|&other| (z - other).abs() < COLLECTOR_MIN_GAP_Z)
        {
            continue;
        }

        let x = lane as f32 + round.rng.random_range(-0.15..=0.15);
        let mut star = make_obstacle(round, StarKind::CollectorStar, x, z);
        star.spin_speed = round.rng.random_range(40.0..=60.0);
        round.stars.push(star);

        active_z.push(z);
        last_lane = Some(lane);
        last_z = z;
        spawned += 1;
    }

    if spawned < profile.stars_per_wave {
        log::debug!(
            "Collector wave placed {}/{} stars",
            spawned,
            profile.stars_per_wave
        );
    }
    spawned
}

/// Depth gap between consecutive wave stars: wider lane jumps and faster
/// stars get more room
pub fn collector_separation(prev_lane: usize, lane: usize, speed_factor: f32) -> f32 {
    let lane_factor = prev_lane.abs_diff(lane) as f32 / (COLS - 1).max(1) as f32;
    let sep = COLLECTOR_BASE_SEP + lane_factor * lane_factor * COLLECTOR_EXTRA_SEP * speed_factor;
    sep.min(COLLECTOR_BASE_SEP + COLLECTOR_EXTRA_SEP)
}
