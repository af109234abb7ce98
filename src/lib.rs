//! Space Dodger - a lane-based arcade space game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (entities, spawning, per-frame update)
//! - `game`: Menu/pause/game-over state machine and leaderboard handshake
//! - `difficulty`: Data-driven difficulty profiles
//! - `highscores`: Per-difficulty top-10 leaderboards
//! - `persistence`: JSON load/save helpers
//! - `platform`: Input vocabulary, frame clock, renderer boundary
//! - `settings`: Runtime configuration

pub mod difficulty;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use difficulty::Difficulty;
pub use game::{Game, GameMode, GamePhase};
pub use highscores::{HighScores, Leaderboard};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Number of lanes the player and obstacles align to
    pub const COLS: usize = 12;
    /// Highest valid lane index
    pub const MAX_LANE: f32 = (COLS - 1) as f32;

    /// Player defaults
    pub const PLAYER_START_X: f32 = COLS as f32 / 2.0;
    pub const PLAYER_Z: f32 = 1.0;
    /// Exponential smoothing rate for lateral movement
    pub const PLAYER_LATERAL_SPEED: f32 = 10.0;
    /// Seconds for the weapon to recharge from empty
    pub const SHOT_COOLDOWN: f32 = 5.0;

    /// Camera rest position
    pub const CAMERA_Y: f32 = 3.0;
    pub const CAMERA_Z: f32 = 12.0;
    pub const CAMERA_MAX_PULL: f32 = 4.5;
    pub const CAMERA_MAX_LOOK_AHEAD: f32 = 2.0;

    /// Shots
    pub const SHOT_SPEED: f32 = 20.0;
    pub const SHOT_MAX_DEPTH: f32 = -75.0;

    /// Pickup effects (seconds)
    pub const SHIELD_DURATION: f32 = 5.0;
    pub const SLOW_DURATION: f32 = 6.0;

    /// Explosions
    pub const EXPLOSION_START_SIZE: f32 = 0.1;
    pub const EXPLOSION_GROWTH: f32 = 4.0;
    pub const EXPLOSION_MAX_LIFE: f32 = 0.4;

    /// Maximum characters in a leaderboard name
    pub const MAX_NAME_LEN: usize = 32;
}

/// Frame-rate independent exponential approach of `current` toward `target`
#[inline]
pub fn smooth_lerp(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if dt <= 0.0 {
        return target;
    }
    let alpha = 1.0 - (-speed * dt).exp();
    current + (target - current) * alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_lerp_moves_toward_target() {
        let x = smooth_lerp(0.0, 10.0, 0.016, 10.0);
        assert!(x > 0.0 && x < 10.0);
    }

    #[test]
    fn test_smooth_lerp_zero_dt_snaps() {
        assert_eq!(smooth_lerp(3.0, 7.0, 0.0, 10.0), 7.0);
    }

    #[test]
    fn test_smooth_lerp_never_overshoots() {
        let mut x = 0.0;
        for _ in 0..1000 {
            x = smooth_lerp(x, 5.0, 0.5, 10.0);
            assert!(x <= 5.0);
        }
    }
}
