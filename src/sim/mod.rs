//! Gameplay simulation module
//!
//! All round logic lives here:
//! - Variable timestep, frame-rate adaptive
//! - Randomness only through the round's RNG
//! - Collections rebuilt per frame, never edited mid-scan
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{HitBox, hits_player, position_is_clear, shot_hits};
pub use spawn::{Placement, spawn_collector_wave, spawn_survival_wave};
pub use state::{
    Camera, Effects, Explosion, GameMode, GamePhase, Player, RoundState, Shot, Star, StarKind,
};
pub use tick::{
    FailReason, PickupEffect, RoundStatus, apply_random_pickup, fire_shot, grant_pickup, tick,
    update_collector, update_effects, update_player, update_shots, update_survival,
};
