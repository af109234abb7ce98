//! High score leaderboards
//!
//! One top-10 board per composite key (difficulty, plus a suffix for
//! Collector mode), persisted as a single JSON document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::MAX_NAME_LEN;
use crate::difficulty::Difficulty;
use crate::game::GameMode;
use crate::persistence;

/// Maximum number of high scores to keep per board
pub const MAX_HIGH_SCORES: usize = 10;

/// Key suffix separating Collector boards from Survival boards
pub const COLLECTOR_SUFFIX: &str = "-Collector";

/// Composite board key for a difficulty and mode
pub fn leaderboard_key(difficulty: Difficulty, mode: GameMode) -> String {
    match mode {
        GameMode::Survival => difficulty.as_str().to_string(),
        GameMode::Collector => format!("{}{}", difficulty.as_str(), COLLECTOR_SUFFIX),
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

/// Leaderboard operations the game controller depends on.
///
/// Implementations never fail toward the caller: storage problems are
/// logged and the in-memory board stays authoritative.
pub trait Leaderboard {
    /// Ordered (descending) top entries for a key, empty if none
    fn get(&self, key: &str) -> &[ScoreEntry];

    /// True if `score` would enter the board for `key`
    fn qualifies(&self, key: &str, score: u64) -> bool {
        let entries = self.get(key);
        if entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score, keep the board sorted and trimmed, persist
    fn commit(&mut self, key: &str, name: &str, score: u64);
}

/// Keyed top-10 boards with optional file backing
#[derive(Debug, Clone, Default)]
pub struct HighScores {
    boards: BTreeMap<String, Vec<ScoreEntry>>,
    path: Option<PathBuf>,
}

impl HighScores {
    /// Empty, memory-only leaderboard
    pub fn new() -> Self {
        let mut scores = Self::default();
        scores.ensure_known_keys();
        scores
    }

    /// Load from `path`. Missing or unreadable files start fresh; malformed
    /// entries are dropped individually so one bad row can't wipe a board.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let boards = match persistence::load_json::<Value>(path) {
            Ok(Some(document)) => {
                log::info!("Loaded leaderboard from {}", path.display());
                parse_boards(document)
            }
            Ok(None) => {
                log::info!("No leaderboard at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Failed to load leaderboard: {}", e);
                BTreeMap::new()
            }
        };

        let mut scores = Self {
            boards,
            path: Some(path.to_path_buf()),
        };
        scores.sanitize();
        scores
    }

    /// Write all boards to the backing file, if any
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match persistence::save_json(path, &self.boards) {
            Ok(()) => log::info!("Leaderboard saved to {}", path.display()),
            Err(e) => log::warn!("Failed to save leaderboard: {}", e),
        }
    }

    /// Top score on a board (if any)
    pub fn top_score(&self, key: &str) -> Option<u64> {
        self.get(key).first().map(|e| e.score)
    }

    /// Board keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.boards.keys().map(String::as_str)
    }

    fn ensure_known_keys(&mut self) {
        for difficulty in Difficulty::ALL {
            for mode in [GameMode::Survival, GameMode::Collector] {
                self.boards
                    .entry(leaderboard_key(difficulty, mode))
                    .or_default();
            }
        }
    }

    fn sanitize(&mut self) {
        self.ensure_known_keys();
        for entries in self.boards.values_mut() {
            for entry in entries.iter_mut() {
                entry.name = truncate_name(&entry.name);
            }
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(MAX_HIGH_SCORES);
        }
    }
}

impl Leaderboard for HighScores {
    fn get(&self, key: &str) -> &[ScoreEntry] {
        self.boards.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn commit(&mut self, key: &str, name: &str, score: u64) {
        let entries = self.boards.entry(key.to_string()).or_default();
        entries.push(ScoreEntry {
            name: truncate_name(name),
            score,
        });
        // Stable: earlier equal scores keep the higher rank
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        log::info!("Leaderboard {}: {} scored {}", key, name, score);
        self.save();
    }
}

fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LEN).collect()
}

/// Lenient read of the board document. Non-list boards become empty and
/// only the first `MAX_HIGH_SCORES` rows of each board are considered.
fn parse_boards(document: Value) -> BTreeMap<String, Vec<ScoreEntry>> {
    let Value::Object(map) = document else {
        log::warn!("Leaderboard document is not an object, ignoring it");
        return BTreeMap::new();
    };
    map.into_iter()
        .map(|(key, board)| {
            let entries = match board {
                Value::Array(rows) => rows
                    .iter()
                    .take(MAX_HIGH_SCORES)
                    .filter_map(parse_entry)
                    .collect(),
                _ => Vec::new(),
            };
            (key, entries)
        })
        .collect()
}

fn parse_entry(row: &Value) -> Option<ScoreEntry> {
    let name = match row.get("name")? {
        Value::String(name) => name.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let score = parse_score(row.get("score")?)?;
    Some(ScoreEntry {
        name: truncate_name(&name),
        score,
    })
}

/// Integer-like scores: negatives clamp to 0, fractions truncate
fn parse_score(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => n.clone(),
        Value::String(s) => serde_json::from_str::<serde_json::Number>(s.trim()).ok()?,
        _ => return None,
    };
    if let Some(score) = number.as_u64() {
        Some(score)
    } else if number.as_i64().is_some() {
        Some(0)
    } else {
        number
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc().max(0.0) as u64)
    }
}
