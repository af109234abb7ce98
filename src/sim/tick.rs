//! Per-frame simulation step
//!
//! Advances one round by a variable delta. Entity collections are rebuilt
//! as filtered next generations rather than edited while being scanned.

use glam::Vec3;
use rand::Rng;

use super::collision::{self, HitBox};
use super::spawn;
use super::state::{GameMode, RoundState, Shot, StarKind};
use crate::consts::*;
use crate::difficulty::{CollectorProfile, Difficulty, SurvivalProfile};
use crate::smooth_lerp;

/// Survival objects are kept while still in front of this depth
pub const SURVIVAL_DESPAWN_Z: f32 = 8.0;
/// A Collector star this far past the player counts as missed
pub const COLLECTOR_MISS_MARGIN: f32 = 2.0;
/// Collector stars are kept while within this window past the player
pub const COLLECTOR_LOOKAHEAD: f32 = 15.0;

/// Points awarded by Survival events
pub const PICKUP_POINTS: u64 = 2;
pub const SHIELD_ENEMY_POINTS: u64 = 5;
pub const SHIELD_ASTEROID_POINTS: u64 = 2;
pub const ENEMY_KILL_POINTS: u64 = 15;
pub const ASTEROID_KILL_POINTS: u64 = 5;
/// Chance an enemy kill drops a bonus pickup
pub const BONUS_PICKUP_CHANCE: f32 = 0.25;
/// Bonus pickups appear this far behind the kill
pub const BONUS_PICKUP_OFFSET_Z: f32 = 2.0;

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// Unshielded contact with a hostile object
    Collision,
    /// Too many Collector stars slipped past
    TooManyMisses,
}

/// Result of advancing a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Alive,
    Failed(FailReason),
}

impl RoundStatus {
    pub fn is_alive(&self) -> bool {
        matches!(self, RoundStatus::Alive)
    }
}

/// Effect granted by a collected pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    Shield,
    SlowTime,
    FullCharge,
}

impl PickupEffect {
    /// 50% shield, 35% slow-time, 15% full charge
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.5 {
            PickupEffect::Shield
        } else if roll < 0.85 {
            PickupEffect::SlowTime
        } else {
            PickupEffect::FullCharge
        }
    }
}

/// Advance the active round by `dt` seconds
pub fn tick(round: &mut RoundState, mode: GameMode, difficulty: Difficulty, dt: f32) -> RoundStatus {
    update_player(round, dt);

    round.spawn_timer += dt;
    let status = match mode {
        GameMode::Survival => {
            let profile = difficulty.survival();
            if round.spawn_timer > profile.spawn_interval {
                spawn::spawn_survival_wave(round, &profile);
                round.spawn_timer = 0.0;
            }
            let status = update_survival(round, &profile, dt);
            update_shots(round, dt);
            status
        }
        GameMode::Collector => {
            let profile = difficulty.collector();
            if round.spawn_timer > profile.spawn_interval {
                spawn::spawn_collector_wave(round, &profile);
                round.spawn_timer = 0.0;
            }
            update_collector(round, &profile, dt)
        }
    };

    round.time_alive += dt;
    update_effects(round, dt);
    update_explosions(round, dt);
    status
}

/// Smooth the ship toward its target lane and drag the camera along
pub fn update_player(round: &mut RoundState, dt: f32) {
    let player = &mut round.player;
    let target = player.target_x();

    let diff = target - player.x;
    player.x = smooth_lerp(player.x, target, dt, PLAYER_LATERAL_SPEED);

    let lateral = (target - player.x).abs();
    let desired_z = CAMERA_Z - (lateral * 2.0).min(CAMERA_MAX_PULL);
    let velocity = diff / dt.max(1e-6);
    let look_ahead = (velocity * 0.02).clamp(-CAMERA_MAX_LOOK_AHEAD, CAMERA_MAX_LOOK_AHEAD);

    let camera = &mut round.camera;
    camera.x = smooth_lerp(camera.x, player.x + look_ahead, dt, 10.0);
    camera.y = smooth_lerp(camera.y, CAMERA_Y, dt, 6.0);
    camera.z = smooth_lerp(camera.z, desired_z, dt, 6.0);
}

/// Recharge the weapon and run down shield and slow-time
pub fn update_effects(round: &mut RoundState, dt: f32) {
    let player = &mut round.player;
    let cooldown = player.shot_cooldown.max(f32::EPSILON);
    player.shot_charge = (player.shot_charge + dt / cooldown).min(1.0);
    player.shield_time = (player.shield_time - dt).max(0.0);
    round.effects.global_slow_time = (round.effects.global_slow_time - dt).max(0.0);
}

/// Age explosions, dropping finished ones
pub fn update_explosions(round: &mut RoundState, dt: f32) {
    for explosion in &mut round.explosions {
        explosion.update(dt);
    }
    round.explosions.retain(|e| !e.is_finished());
}

/// Fire the weapon if fully charged. Returns whether a shot was created.
pub fn fire_shot(round: &mut RoundState) -> bool {
    if !round.player.weapon_ready() {
        return false;
    }
    round.player.shot_charge = 0.0;
    round.shots.push(Shot {
        pos: Vec3::new(round.player.x, 0.0, round.player.z),
    });
    true
}

/// Apply a pickup effect. Timed effects refresh to their full duration
/// without stacking.
pub fn grant_pickup(round: &mut RoundState, effect: PickupEffect) {
    match effect {
        PickupEffect::Shield => {
            round.player.shield_time = round.player.shield_time.max(SHIELD_DURATION);
        }
        PickupEffect::SlowTime => {
            round.effects.global_slow_time = round.effects.global_slow_time.max(SLOW_DURATION);
        }
        PickupEffect::FullCharge => round.player.shot_charge = 1.0,
    }
}

/// Draw and apply a random pickup effect
pub fn apply_random_pickup(round: &mut RoundState) -> PickupEffect {
    let effect = PickupEffect::from_roll(round.rng.random::<f32>());
    grant_pickup(round, effect);
    log::debug!("Pickup: {:?}", effect);
    effect
}

/// Move Survival obstacles and resolve contact with the ship.
///
/// On an unshielded hit the round fails immediately; the remaining
/// obstacles are kept untouched for the game-over backdrop.
pub fn update_survival(round: &mut RoundState, profile: &SurvivalProfile, dt: f32) -> RoundStatus {
    let slow_factor = if round.effects.slow_active() { 0.5 } else { 1.0 };
    let mut pending = std::mem::take(&mut round.stars).into_iter();
    let mut kept = Vec::with_capacity(pending.len());

    while let Some(mut star) = pending.next() {
        let move_factor = if star.kind == StarKind::Enemy { 1.2 } else { 1.0 };
        star.pos.z += dt * profile.star_speed * move_factor * slow_factor;
        star.advance_spin(dt);

        if collision::hits_player(&star, &round.player, HitBox::survival(star.size)) {
            if star.kind == StarKind::Pickup {
                apply_random_pickup(round);
                round.spawn_explosion(star.pos);
                round.score += PICKUP_POINTS;
                continue;
            }
            if round.player.shield_active() {
                round.player.shield_time = 0.0;
                round.spawn_explosion(round.player.pos());
                round.score += if star.kind == StarKind::Enemy {
                    SHIELD_ENEMY_POINTS
                } else {
                    SHIELD_ASTEROID_POINTS
                };
                continue;
            }
            round.spawn_explosion(round.player.pos());
            kept.push(star);
            kept.extend(pending);
            round.stars = kept;
            return RoundStatus::Failed(FailReason::Collision);
        }

        if star.pos.z < SURVIVAL_DESPAWN_Z {
            kept.push(star);
        }
    }

    round.stars = kept;
    RoundStatus::Alive
}

/// Move shots and resolve the first obstacle each one touches
pub fn update_shots(round: &mut RoundState, dt: f32) {
    let travel = dt * SHOT_SPEED;
    let shots = std::mem::take(&mut round.shots);
    let mut kept = Vec::with_capacity(shots.len());

    for mut shot in shots {
        shot.pos.z -= travel;
        if shot.pos.z <= SHOT_MAX_DEPTH {
            continue;
        }
        match round
            .stars
            .iter()
            .position(|star| collision::shot_hits(star, &shot, dt, SHOT_SPEED))
        {
            Some(index) => resolve_shot_hit(round, index),
            None => kept.push(shot),
        }
    }

    round.shots = kept;
}

fn resolve_shot_hit(round: &mut RoundState, index: usize) {
    let star = &mut round.stars[index];
    if star.kind != StarKind::Pickup && star.hp > 1 {
        star.hp -= 1;
        return;
    }

    let star = round.stars.remove(index);
    round.spawn_explosion(star.pos);
    match star.kind {
        StarKind::Pickup => {
            apply_random_pickup(round);
        }
        StarKind::Enemy => {
            round.score += ENEMY_KILL_POINTS;
            if round.rng.random::<f32>() < BONUS_PICKUP_CHANCE {
                spawn::spawn_bonus_pickup(round, star.pos.x, star.pos.z - BONUS_PICKUP_OFFSET_Z);
            }
        }
        _ => round.score += ASTEROID_KILL_POINTS,
    }
}

/// Move Collector stars, count catches and misses.
///
/// Non-collector objects are dropped. The round fails once the miss count
/// exceeds the profile's allowance.
pub fn update_collector(
    round: &mut RoundState,
    profile: &CollectorProfile,
    dt: f32,
) -> RoundStatus {
    let player_z = round.player.z;
    let mut pending = std::mem::take(&mut round.stars).into_iter();
    let mut kept = Vec::with_capacity(pending.len());

    while let Some(mut star) = pending.next() {
        if star.kind != StarKind::CollectorStar {
            continue;
        }
        star.pos.z += dt * profile.star_speed;
        star.advance_spin(dt);

        if collision::hits_player(&star, &round.player, HitBox::collector(star.size)) {
            round.spawn_explosion(star.pos);
            round.score += 1;
            continue;
        }

        if star.pos.z > player_z + COLLECTOR_MISS_MARGIN {
            round.missed_stars += 1;
            if round.missed_stars > profile.max_misses {
                kept.extend(pending.filter(|s| s.kind == StarKind::CollectorStar));
                round.stars = kept;
                return RoundStatus::Failed(FailReason::TooManyMisses);
            }
            continue;
        }

        if star.pos.z < player_z + COLLECTOR_LOOKAHEAD {
            kept.push(star);
        }
    }

    round.stars = kept;
    RoundStatus::Alive
}
