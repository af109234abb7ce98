//! Game state and core simulation types
//!
//! Everything a round mutates lives under [`RoundState`], owned by the game
//! controller and borrowed by the simulation for the duration of one tick.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Top-level phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu (and leaderboard browser)
    Menu,
    /// Active round
    Playing,
    /// Round frozen behind the pause menu
    Paused,
    /// Round ended, possibly capturing a leaderboard name
    GameOver,
}

/// Rule set for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Dodge or shoot hostiles; unshielded collision ends the round
    #[default]
    Survival,
    /// Catch falling stars; too many misses end the round
    Collector,
}

impl GameMode {
    /// Menu order
    pub const ALL: [GameMode; 2] = [GameMode::Survival, GameMode::Collector];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Survival => "Survival",
            GameMode::Collector => "Collector",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            GameMode::Survival => 0,
            GameMode::Collector => 1,
        }
    }

    /// Clamped lookup by menu index
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// What an approaching object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarKind {
    Asteroid,
    Enemy,
    Pickup,
    CollectorStar,
}

impl StarKind {
    /// Hit points a freshly spawned object starts with
    pub fn base_hp(&self) -> u32 {
        match self {
            StarKind::Asteroid | StarKind::Enemy => 1,
            StarKind::Pickup | StarKind::CollectorStar => 0,
        }
    }

    /// Hostile objects end the round on unshielded contact
    pub fn is_hostile(&self) -> bool {
        matches!(self, StarKind::Asteroid | StarKind::Enemy)
    }
}

/// An obstacle or collectible moving along the depth axis
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// x: lane position (fractional), y: decorative, z: depth
    pub pos: Vec3,
    pub kind: StarKind,
    /// Hit radius and render scale, always > 0
    pub size: f32,
    /// Cosmetic RGB
    pub color: [f32; 3],
    pub hp: u32,
    /// Degrees, kept in [0, 360)
    pub spin_angle: f32,
    /// Degrees per second (may be negative)
    pub spin_speed: f32,
}

impl Star {
    /// Advance the cosmetic spin, wrapping into [0, 360)
    pub fn advance_spin(&mut self, dt: f32) {
        self.spin_angle = (self.spin_angle + self.spin_speed * dt).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negatives
        if self.spin_angle >= 360.0 {
            self.spin_angle = 0.0;
        }
    }

    /// Nearest lane index
    pub fn lane(&self) -> i32 {
        self.pos.x.round() as i32
    }
}

/// A weapon projectile travelling away from the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec3,
}

/// Cosmetic blast left behind by a destructive collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub pos: Vec3,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
}

impl Explosion {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            size: EXPLOSION_START_SIZE,
            life: 0.0,
            max_life: EXPLOSION_MAX_LIFE,
        }
    }

    /// Grow and age the blast
    pub fn update(&mut self, dt: f32) {
        self.life += dt;
        self.size += dt * EXPLOSION_GROWTH;
    }

    pub fn is_finished(&self) -> bool {
        self.life >= self.max_life
    }

    /// Fade factor for renderers (1 = fresh, 0 = gone)
    pub fn alpha(&self) -> f32 {
        (1.0 - self.life / self.max_life).max(0.0)
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Continuous lane position (smoothed toward `target_x`)
    pub x: f32,
    /// Fixed depth
    pub z: f32,
    /// Requested lane, always within [0, COLS - 1]
    target_x: f32,
    /// Weapon charge in [0, 1]
    pub shot_charge: f32,
    /// Seconds to recharge from empty
    pub shot_cooldown: f32,
    /// Remaining shield seconds
    pub shield_time: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_START_X,
            z: PLAYER_Z,
            target_x: PLAYER_START_X,
            shot_charge: 1.0,
            shot_cooldown: SHOT_COOLDOWN,
            shield_time: 0.0,
        }
    }
}

impl Player {
    pub fn target_x(&self) -> f32 {
        self.target_x
    }

    /// Request a lane; out-of-range requests are clamped
    pub fn set_target(&mut self, lane: f32) {
        self.target_x = if lane.is_finite() {
            lane.clamp(0.0, MAX_LANE)
        } else {
            self.target_x
        };
    }

    /// Move the requested lane by `lanes` (negative = left)
    pub fn shift_target(&mut self, lanes: i32) {
        self.set_target(self.target_x + lanes as f32);
    }

    pub fn shield_active(&self) -> bool {
        self.shield_time > 0.0
    }

    pub fn weapon_ready(&self) -> bool {
        self.shot_charge >= 1.0
    }

    /// Ship position as a point
    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, 0.2, self.z)
    }
}

/// Round-wide timed effects and cosmetic clocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// Remaining slow-time seconds (halves Survival obstacle speed)
    pub global_slow_time: f32,
    /// Background moon rotation (degrees)
    pub moon_angle: f32,
}

impl Effects {
    pub fn slow_active(&self) -> bool {
        self.global_slow_time > 0.0
    }
}

/// Chase camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: PLAYER_START_X,
            y: CAMERA_Y,
            z: CAMERA_Z,
        }
    }
}

/// Everything one round mutates
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Round RNG (seeded for reproducible tests)
    pub rng: Pcg32,
    pub player: Player,
    pub effects: Effects,
    pub camera: Camera,
    pub stars: Vec<Star>,
    pub shots: Vec<Shot>,
    pub explosions: Vec<Explosion>,
    /// Survival: points; Collector: stars caught
    pub score: u64,
    pub time_alive: f32,
    /// Collector only
    pub missed_stars: u32,
    /// Seconds since the last spawn batch
    pub spawn_timer: f32,
}

impl RoundState {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            player: Player::default(),
            effects: Effects::default(),
            camera: Camera::default(),
            stars: Vec::new(),
            shots: Vec::new(),
            explosions: Vec::new(),
            score: 0,
            time_alive: 0.0,
            missed_stars: 0,
            spawn_timer: 0.0,
        }
    }

    /// Clear everything round-specific. The RNG stream continues.
    pub fn reset(&mut self) {
        self.stars.clear();
        self.shots.clear();
        self.explosions.clear();
        self.score = 0;
        self.time_alive = 0.0;
        self.missed_stars = 0;
        self.spawn_timer = 0.0;
        self.player = Player::default();
        self.camera = Camera::default();
        self.effects.global_slow_time = 0.0;
    }

    pub fn spawn_explosion(&mut self, pos: Vec3) {
        self.explosions.push(Explosion::new(pos));
    }
}
