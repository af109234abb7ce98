//! Runtime settings
//!
//! Loaded from a JSON file next to the binary (or a path passed on the
//! command line). Any key missing from the file keeps its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::game::GameMode;
use crate::persistence;

/// Default settings file name
pub const SETTINGS_FILE: &str = "space-dodger.json";

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upper bound on ticks per second
    pub frame_rate_cap: u32,
    /// Longest delta a single tick may consume (seconds)
    pub max_frame_delta: f32,
    /// Leaderboard document location
    pub leaderboard_path: PathBuf,
    /// Mode preselected in the main menu
    pub default_mode: GameMode,
    /// Difficulty preselected in the main menu
    pub default_difficulty: Difficulty,
    /// Name committed when the player confirms an empty name
    pub player_name_placeholder: String,
    /// Headless runs stop after this many simulated seconds
    pub demo_round_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate_cap: 60,
            max_frame_delta: 0.1,
            leaderboard_path: default_leaderboard_path(),
            default_mode: GameMode::Survival,
            default_difficulty: Difficulty::Normal,
            player_name_placeholder: "Player".to_string(),
            demo_round_seconds: 120.0,
        }
    }
}

impl Settings {
    /// Target seconds per tick
    pub fn frame_budget(&self) -> f32 {
        1.0 / self.frame_rate_cap.max(1) as f32
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match persistence::load_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings.validated()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from `path`, writing the defaults there first if the
    /// file doesn't exist yet so they can be edited
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        let settings = Self::default();
        settings.save(path);
        settings
    }

    /// Save settings; failures are logged
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match persistence::save_json(path, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }

    /// Clamp out-of-range values to something runnable
    fn validated(mut self) -> Self {
        self.frame_rate_cap = self.frame_rate_cap.clamp(1, 1000);
        if !self.max_frame_delta.is_finite() || self.max_frame_delta <= 0.0 {
            self.max_frame_delta = 0.1;
        }
        if self.player_name_placeholder.trim().is_empty() {
            self.player_name_placeholder = "Player".to_string();
        }
        self
    }
}

fn default_leaderboard_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("space-dodger").join("leaderboard.json"))
        .unwrap_or_else(|| PathBuf::from("leaderboard.json"))
}
