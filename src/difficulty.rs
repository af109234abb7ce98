//! Difficulty profiles
//!
//! One row per difficulty for each game mode. Lookups by name never fail:
//! unknown names resolve to the Normal profile so a round is always runnable.

use serde::{Deserialize, Serialize};

use crate::consts::COLS;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Menu order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Position in [`Difficulty::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Clamped lookup by menu index
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Survival-mode tuning for this difficulty
    pub fn survival(&self) -> SurvivalProfile {
        match self {
            Difficulty::Easy => SurvivalProfile {
                spawn_interval: 1.2,
                star_speed: 6.0,
                spawn_min: (COLS / 5).max(1),
                spawn_max: (COLS / 3).max(1),
            },
            Difficulty::Normal => SurvivalProfile {
                spawn_interval: 0.8,
                star_speed: 10.0,
                spawn_min: (COLS / 4).max(1),
                spawn_max: (COLS / 2).max(1),
            },
            Difficulty::Hard => SurvivalProfile {
                spawn_interval: 0.7,
                star_speed: 16.0,
                spawn_min: (COLS / 3).max(1),
                spawn_max: COLS.max(1),
            },
        }
    }

    /// Collector-mode tuning for this difficulty
    pub fn collector(&self) -> CollectorProfile {
        match self {
            Difficulty::Easy => CollectorProfile {
                spawn_interval: 2.0,
                star_speed: 7.0,
                stars_per_wave: 1,
                max_misses: 5,
            },
            Difficulty::Normal => CollectorProfile {
                spawn_interval: 1.5,
                star_speed: 9.0,
                stars_per_wave: 2,
                max_misses: 3,
            },
            Difficulty::Hard => CollectorProfile {
                spawn_interval: 1.2,
                star_speed: 13.0,
                stars_per_wave: 2,
                max_misses: 2,
            },
        }
    }
}

/// Survival spawn and movement tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalProfile {
    /// Seconds between spawn batches
    pub spawn_interval: f32,
    /// Base approach speed (depth units per second)
    pub star_speed: f32,
    /// Inclusive batch size range
    pub spawn_min: usize,
    pub spawn_max: usize,
}

/// Collector spawn, movement and failure tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorProfile {
    pub spawn_interval: f32,
    pub star_speed: f32,
    pub stars_per_wave: usize,
    /// Missed stars that end the round
    pub max_misses: u32,
}

/// Resolve a difficulty by name, falling back to Normal
pub fn resolve(name: &str) -> Difficulty {
    Difficulty::from_str(name).unwrap_or_else(|| {
        log::debug!("Unknown difficulty {:?}, using Normal", name);
        Difficulty::Normal
    })
}

/// Survival profile by name (Normal for unknown names)
pub fn survival_profile(name: &str) -> SurvivalProfile {
    resolve(name).survival()
}

/// Collector profile by name (Normal for unknown names)
pub fn collector_profile(name: &str) -> CollectorProfile {
    resolve(name).collector()
}
