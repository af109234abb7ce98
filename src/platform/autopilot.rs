//! Scripted input source for headless runs

use crate::consts::MAX_LANE;
use crate::game::{Game, GameMode, GamePhase, MenuItem};
use crate::sim::StarKind;

use super::{InputEvent, Key};

/// How far ahead of the ship (in depth units) threats are considered
const THREAT_RANGE: f32 = 14.0;
/// Lateral distance at which an object counts as in a lane
const LANE_WIDTH: f32 = 0.9;

/// Plays the game from the menu onward: starts rounds, dodges, shoots,
/// enters a name when asked, and quits after `time_cap` simulated seconds.
#[derive(Debug, Clone)]
pub struct Autopilot {
    name: String,
    typed: usize,
    elapsed: f32,
    time_cap: f32,
    finished: bool,
}

impl Autopilot {
    pub fn new(name: impl Into<String>, time_cap: f32) -> Self {
        Self {
            name: name.into(),
            typed: 0,
            elapsed: 0.0,
            time_cap,
            finished: false,
        }
    }

    /// Events to feed the game for this frame
    pub fn poll(&mut self, game: &Game, dt: f32) -> Vec<InputEvent> {
        if self.finished {
            return Vec::new();
        }
        self.elapsed += dt;
        if self.elapsed >= self.time_cap {
            log::info!("Autopilot time cap reached ({:.0}s)", self.time_cap);
            self.finished = true;
            return vec![InputEvent::Quit];
        }

        let keys = match game.phase {
            GamePhase::Menu => self.menu_keys(game),
            GamePhase::Playing => self.playing_keys(game),
            GamePhase::Paused => vec![Key::Escape],
            GamePhase::GameOver => self.game_over_keys(game),
        };
        keys.into_iter().map(InputEvent::Key).collect()
    }

    fn menu_keys(&self, game: &Game) -> Vec<Key> {
        if game.menu.show_leaderboard {
            vec![Key::Escape]
        } else if game.menu.selected_item() != MenuItem::Start {
            vec![Key::Up]
        } else {
            vec![Key::Enter]
        }
    }

    fn playing_keys(&mut self, game: &Game) -> Vec<Key> {
        self.typed = 0;
        match game.mode {
            GameMode::Survival => survival_keys(game),
            GameMode::Collector => collector_keys(game).into_iter().collect(),
        }
    }

    fn game_over_keys(&mut self, game: &Game) -> Vec<Key> {
        if !game.prompt.capturing_name {
            self.typed = 0;
            return vec![Key::Enter];
        }
        match self.name.chars().nth(self.typed) {
            Some(c) => {
                self.typed += 1;
                vec![Key::Char(c)]
            }
            None => vec![Key::Enter],
        }
    }
}

fn lane_blocked(game: &Game, lane: f32) -> bool {
    let player_z = game.round.player.z;
    game.round.stars.iter().any(|s| {
        s.kind.is_hostile()
            && (s.pos.x - lane).abs() < LANE_WIDTH
            && s.pos.z < player_z + 1.0
            && s.pos.z > player_z - THREAT_RANGE
    })
}

fn survival_keys(game: &Game) -> Vec<Key> {
    let player = &game.round.player;
    let lane = player.target_x();
    if !lane_blocked(game, lane) {
        return Vec::new();
    }

    let mut keys = Vec::new();
    if player.weapon_ready() {
        keys.push(Key::Space);
    }
    if lane > 0.0 && !lane_blocked(game, lane - 1.0) {
        keys.push(Key::Left);
    } else if lane < MAX_LANE && !lane_blocked(game, lane + 1.0) {
        keys.push(Key::Right);
    }
    keys
}

fn collector_keys(game: &Game) -> Option<Key> {
    let player = &game.round.player;
    let nearest = game
        .round
        .stars
        .iter()
        .filter(|s| s.kind == StarKind::CollectorStar && s.pos.z <= player.z + 0.5)
        .max_by(|a, b| a.pos.z.total_cmp(&b.pos.z))?;

    let dx = nearest.lane() as f32 - player.target_x();
    if dx > 0.5 {
        Some(Key::Right)
    } else if dx < -0.5 {
        Some(Key::Left)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::settings::Settings;
    use crate::sim::Star;
    use glam::Vec3;

    fn new_game() -> Game {
        Game::new(Box::new(HighScores::new()), &Settings::default(), 9)
    }

    fn star(kind: StarKind, x: f32, z: f32) -> Star {
        Star {
            pos: Vec3::new(x, 0.0, z),
            kind,
            size: 0.5,
            color: [1.0; 3],
            hp: kind.base_hp(),
            spin_angle: 0.0,
            spin_speed: 0.0,
        }
    }

    #[test]
    fn test_starts_round_from_menu() {
        let mut game = new_game();
        game.menu.selected = 2;
        let mut pilot = Autopilot::new("Bot", 60.0);
        for _ in 0..4 {
            for event in pilot.poll(&game, 0.016) {
                game.handle_event(event);
            }
        }
        assert_eq!(game.phase, GamePhase::Playing);
    }

    #[test]
    fn test_dodges_and_fires() {
        let mut game = new_game();
        game.handle_event(InputEvent::Key(Key::Enter));
        game.round.stars.push(star(StarKind::Asteroid, 6.0, -5.0));

        let mut pilot = Autopilot::new("Bot", 60.0);
        let events = pilot.poll(&game, 0.016);
        assert!(events.contains(&InputEvent::Key(Key::Space)));
        assert!(events.contains(&InputEvent::Key(Key::Left)));
    }

    #[test]
    fn test_steers_toward_collector_star() {
        let mut game = new_game();
        game.menu.mode_index = GameMode::Collector.index();
        game.handle_event(InputEvent::Key(Key::Enter));
        game.round.stars.push(star(StarKind::CollectorStar, 9.0, -10.0));

        let mut pilot = Autopilot::new("Bot", 60.0);
        assert_eq!(pilot.poll(&game, 0.016), [InputEvent::Key(Key::Right)]);
    }

    #[test]
    fn test_types_name_then_confirms() {
        let mut game = new_game();
        game.handle_event(InputEvent::Key(Key::Enter));
        game.round.stars.push(star(StarKind::Asteroid, 6.0, 1.0));
        game.update(0.0);
        assert!(game.prompt.capturing_name);

        let mut pilot = Autopilot::new("Bo", 60.0);
        for _ in 0..3 {
            for event in pilot.poll(&game, 0.016) {
                game.handle_event(event);
            }
        }
        assert!(!game.prompt.capturing_name);
        assert_eq!(game.leaderboard().get("Normal")[0].name, "Bo");
    }

    #[test]
    fn test_quits_once_at_cap() {
        let game = new_game();
        let mut pilot = Autopilot::new("Bot", 1.0);
        assert_ne!(pilot.poll(&game, 0.5), [InputEvent::Quit]);
        assert_eq!(pilot.poll(&game, 0.6), [InputEvent::Quit]);
        assert!(pilot.poll(&game, 0.6).is_empty());
    }
}
