//! Game controller
//!
//! Owns the round state and routes discrete input events through the
//! Menu → Playing ⇄ Paused → GameOver state machine. The only transition the
//! simulation drives on its own is Playing → GameOver.

use crate::consts::MAX_NAME_LEN;
use crate::difficulty::Difficulty;
use crate::highscores::{Leaderboard, ScoreEntry, leaderboard_key};
use crate::platform::{InputEvent, Key};
use crate::settings::Settings;
use crate::sim::{self, RoundState, RoundStatus};

pub use crate::sim::{GameMode, GamePhase};

/// Main menu rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Mode,
    Difficulty,
    Leaderboard,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Start,
        MenuItem::Mode,
        MenuItem::Difficulty,
        MenuItem::Leaderboard,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Start => "Start game",
            MenuItem::Mode => "Mode",
            MenuItem::Difficulty => "Difficulty",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Pause menu rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    MainMenu,
    Quit,
}

impl PauseItem {
    pub const ALL: [PauseItem; 3] = [PauseItem::Resume, PauseItem::MainMenu, PauseItem::Quit];

    pub fn label(&self) -> &'static str {
        match self {
            PauseItem::Resume => "Resume (P / Esc)",
            PauseItem::MainMenu => "Main menu (M)",
            PauseItem::Quit => "Quit (Q)",
        }
    }
}

/// Menu cursors and selectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuState {
    /// Main menu cursor (index into [`MenuItem::ALL`])
    pub selected: usize,
    /// Mode selector (index into [`GameMode::ALL`])
    pub mode_index: usize,
    /// Difficulty selector (index into [`Difficulty::ALL`])
    pub difficulty_index: usize,
    /// Pause menu cursor (index into [`PauseItem::ALL`])
    pub pause_selected: usize,
    /// Leaderboard browser open
    pub show_leaderboard: bool,
    /// Cosmetic clock for cursor animation
    pub anim: f32,
}

impl MenuState {
    pub fn selected_item(&self) -> MenuItem {
        MenuItem::ALL[self.selected.min(MenuItem::ALL.len() - 1)]
    }

    pub fn selected_pause_item(&self) -> PauseItem {
        PauseItem::ALL[self.pause_selected.min(PauseItem::ALL.len() - 1)]
    }

    pub fn mode(&self) -> GameMode {
        GameMode::from_index(self.mode_index)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_index(self.difficulty_index)
    }

    fn step_mode(&mut self, delta: isize) {
        self.mode_index = step_clamped(self.mode_index, delta, GameMode::ALL.len());
    }

    fn step_difficulty(&mut self, delta: isize) {
        self.difficulty_index = step_clamped(self.difficulty_index, delta, Difficulty::ALL.len());
    }
}

/// Characters accepted into a leaderboard name: plain space plus anything
/// visible. Controls, other whitespace, invisible format characters and
/// private-use or noncharacter code points are rejected.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    let cp = u32::from(c);
    let invisible = matches!(
        cp,
        0x00AD
            | 0x0600..=0x0605
            | 0x061C
            | 0x06DD
            | 0x070F
            | 0x0890..=0x0891
            | 0x08E2
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x206F
            | 0xFEFF
            | 0xFFF9..=0xFFFB
            | 0x110BD
            | 0x110CD
            | 0x13430..=0x1343F
            | 0x1BCA0..=0x1BCA3
            | 0x1D173..=0x1D17A
            | 0xE0000..=0xE007F
    );
    let private_use = matches!(cp, 0xE000..=0xF8FF | 0xF0000..=0x10FFFF);
    let noncharacter = (cp & 0xFFFE) == 0xFFFE || (0xFDD0..=0xFDEF).contains(&cp);
    !(invisible || private_use || noncharacter)
}

fn step_clamped(index: usize, delta: isize, len: usize) -> usize {
    index.saturating_add_signed(delta).min(len.saturating_sub(1))
}

/// Leaderboard qualification and name capture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardPrompt {
    pub capturing_name: bool,
    pub name_buffer: String,
    /// Board the captured name will be committed to
    pub pending_key: Option<String>,
    /// Difficulty of the most recent round started from the menu
    pub last_played: Option<Difficulty>,
    /// Qualification already evaluated for this round
    pub prompted: bool,
}

impl LeaderboardPrompt {
    /// Clear per-round flags (keeps `last_played`)
    fn reset_round(&mut self) {
        self.capturing_name = false;
        self.name_buffer.clear();
        self.pending_key = None;
        self.prompted = false;
    }

    fn close(&mut self) {
        self.capturing_name = false;
        self.pending_key = None;
    }
}

/// Top-level game: phase, mode, round state and collaborators
pub struct Game {
    pub phase: GamePhase,
    /// Mode of the current (or last) round
    pub mode: GameMode,
    /// Difficulty of the current (or last) round
    pub difficulty: Difficulty,
    pub round: RoundState,
    pub menu: MenuState,
    pub prompt: LeaderboardPrompt,
    /// Last reported window size
    pub window: (u32, u32),
    leaderboard: Box<dyn Leaderboard>,
    name_placeholder: String,
    running: bool,
}

impl Game {
    pub fn new(leaderboard: Box<dyn Leaderboard>, settings: &Settings, seed: u64) -> Self {
        let menu = MenuState {
            mode_index: settings.default_mode.index(),
            difficulty_index: settings.default_difficulty.index(),
            ..Default::default()
        };
        Self {
            phase: GamePhase::Menu,
            mode: menu.mode(),
            difficulty: menu.difficulty(),
            round: RoundState::new(seed),
            menu,
            prompt: LeaderboardPrompt::default(),
            window: (800, 800),
            leaderboard,
            name_placeholder: settings.player_name_placeholder.clone(),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn leaderboard(&self) -> &dyn Leaderboard {
        self.leaderboard.as_ref()
    }

    /// Score compared against the board: seconds survived in Collector,
    /// points in Survival
    pub fn qualifying_score(&self) -> u64 {
        match self.mode {
            GameMode::Collector => self.round.time_alive.max(0.0).floor() as u64,
            GameMode::Survival => self.round.score,
        }
    }

    /// Board selected in the leaderboard browser
    pub fn browsed_board(&self) -> (String, &[ScoreEntry]) {
        let key = leaderboard_key(self.menu.difficulty(), self.menu.mode());
        let entries = self.leaderboard.get(&key);
        (key, entries)
    }

    /// One-line HUD summary for renderers
    pub fn hud_line(&self) -> String {
        let round = &self.round;
        match self.mode {
            GameMode::Collector => format!(
                "Time: {}s  Stars: {}  Missed: {}/{}  Difficulty: {}",
                round.time_alive as u64,
                round.score,
                round.missed_stars,
                self.difficulty.collector().max_misses,
                self.difficulty.as_str()
            ),
            GameMode::Survival => format!(
                "Score: {}  Time: {}s  Difficulty: {}",
                round.score,
                round.time_alive as u64,
                self.difficulty.as_str()
            ),
        }
    }

    /// Dispatch one input event
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => self.quit(),
            InputEvent::Resize { width, height } => self.window = (width, height),
            InputEvent::Key(key) => match self.phase {
                GamePhase::Menu => self.handle_menu_key(key),
                GamePhase::Playing => self.handle_playing_key(key),
                GamePhase::Paused => self.handle_pause_key(key),
                GamePhase::GameOver => self.handle_game_over_key(key),
            },
        }
    }

    /// Advance by `dt` seconds in the current phase
    pub fn update(&mut self, dt: f32) {
        self.menu.anim += dt;
        self.round.effects.moon_angle = (self.round.effects.moon_angle + dt * 2.0) % 360.0;

        match self.phase {
            GamePhase::Playing => {
                let status = sim::tick(&mut self.round, self.mode, self.difficulty, dt);
                if let RoundStatus::Failed(reason) = status {
                    log::info!(
                        "Round over ({:?}): {} {} score={} time={:.1}s",
                        reason,
                        self.mode.as_str(),
                        self.difficulty.as_str(),
                        self.round.score,
                        self.round.time_alive
                    );
                    self.phase = GamePhase::GameOver;
                }
            }
            GamePhase::GameOver => sim::tick::update_explosions(&mut self.round, dt),
            GamePhase::Menu | GamePhase::Paused => {}
        }

        if self.phase == GamePhase::GameOver && !self.prompt.prompted {
            self.evaluate_leaderboard();
        }
    }

    fn quit(&mut self) {
        log::info!("Quit requested");
        self.running = false;
    }

    /// Start a fresh round with the menu's mode and difficulty
    fn start_round(&mut self) {
        self.mode = self.menu.mode();
        self.difficulty = self.menu.difficulty();
        self.prompt.last_played = Some(self.difficulty);
        self.reset_round();
    }

    /// Reset everything round-specific and enter Playing
    fn reset_round(&mut self) {
        self.round.reset();
        self.prompt.reset_round();
        self.phase = GamePhase::Playing;
        log::info!(
            "Round start: {} / {}",
            self.mode.as_str(),
            self.difficulty.as_str()
        );
    }

    /// Runs once per round on entering GameOver
    fn evaluate_leaderboard(&mut self) {
        self.prompt.prompted = true;
        let Some(difficulty) = self.prompt.last_played else {
            return;
        };
        let key = leaderboard_key(difficulty, self.mode);
        let score = self.qualifying_score();
        if self.leaderboard.qualifies(&key, score) {
            log::info!("Score {} qualifies for {}", score, key);
            self.prompt.capturing_name = true;
            self.prompt.name_buffer.clear();
            self.prompt.pending_key = Some(key);
        }
    }

    fn handle_menu_key(&mut self, key: Key) {
        let menu = &mut self.menu;

        if menu.show_leaderboard {
            match key {
                Key::Escape | Key::Enter | Key::Space | Key::Char('m' | 'M') => {
                    menu.show_leaderboard = false
                }
                Key::Left => menu.step_difficulty(-1),
                Key::Right => menu.step_difficulty(1),
                Key::Up => menu.step_mode(-1),
                Key::Down => menu.step_mode(1),
                _ => {}
            }
            return;
        }

        match (key, menu.selected_item()) {
            (Key::Up, _) => menu.selected = step_clamped(menu.selected, -1, MenuItem::ALL.len()),
            (Key::Down, _) => menu.selected = step_clamped(menu.selected, 1, MenuItem::ALL.len()),
            (Key::Left, MenuItem::Mode) => menu.step_mode(-1),
            (Key::Right, MenuItem::Mode) => menu.step_mode(1),
            (Key::Left, MenuItem::Difficulty) => menu.step_difficulty(-1),
            (Key::Right, MenuItem::Difficulty) => menu.step_difficulty(1),
            (Key::Enter | Key::Space, item) => match item {
                MenuItem::Start => self.start_round(),
                MenuItem::Mode => {
                    menu.mode_index = (menu.mode_index + 1) % GameMode::ALL.len();
                }
                MenuItem::Difficulty => {
                    menu.difficulty_index = (menu.difficulty_index + 1) % Difficulty::ALL.len();
                }
                MenuItem::Leaderboard => menu.show_leaderboard = true,
                MenuItem::Quit => self.quit(),
            },
            _ => {}
        }
    }

    fn handle_playing_key(&mut self, key: Key) {
        match key {
            Key::Left => self.round.player.shift_target(-1),
            Key::Right => self.round.player.shift_target(1),
            Key::Space if self.mode == GameMode::Survival => {
                sim::fire_shot(&mut self.round);
            }
            Key::Escape | Key::Char('p' | 'P') => {
                self.menu.pause_selected = 0;
                self.phase = GamePhase::Paused;
            }
            _ => {}
        }
    }

    fn handle_pause_key(&mut self, key: Key) {
        let len = PauseItem::ALL.len();
        match key {
            Key::Up => self.menu.pause_selected = step_clamped(self.menu.pause_selected, -1, len),
            Key::Down => self.menu.pause_selected = step_clamped(self.menu.pause_selected, 1, len),
            Key::Enter | Key::Space => match self.menu.selected_pause_item() {
                PauseItem::Resume => self.phase = GamePhase::Playing,
                PauseItem::MainMenu => self.phase = GamePhase::Menu,
                PauseItem::Quit => self.quit(),
            },
            Key::Escape | Key::Char('p' | 'P') => self.phase = GamePhase::Playing,
            Key::Char('m' | 'M') => self.phase = GamePhase::Menu,
            Key::Char('q' | 'Q') => self.quit(),
            _ => {}
        }
    }

    fn handle_game_over_key(&mut self, key: Key) {
        if self.prompt.capturing_name {
            self.handle_name_key(key);
            return;
        }
        match key {
            Key::Enter | Key::Space => self.reset_round(),
            Key::Char('m' | 'M') => self.phase = GamePhase::Menu,
            Key::Char('q' | 'Q') => self.quit(),
            _ => {}
        }
    }

    fn handle_name_key(&mut self, key: Key) {
        match key {
            Key::Backspace => {
                self.prompt.name_buffer.pop();
            }
            Key::Enter => self.commit_name(),
            Key::Escape => {
                log::info!("Leaderboard entry skipped");
                self.prompt.close();
            }
            Key::Space => self.push_name_char(' '),
            Key::Char(c) => self.push_name_char(c),
            _ => {}
        }
    }

    fn push_name_char(&mut self, c: char) {
        if is_printable(c) && self.prompt.name_buffer.chars().count() < MAX_NAME_LEN {
            self.prompt.name_buffer.push(c);
        }
    }

    fn commit_name(&mut self) {
        if let Some(key) = self.prompt.pending_key.take() {
            let trimmed = self.prompt.name_buffer.trim();
            let name = if trimmed.is_empty() {
                self.name_placeholder.as_str()
            } else {
                trimmed
            };
            let score = self.qualifying_score();
            self.leaderboard.commit(&key, name, score);
        }
        self.prompt.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::sim::{Star, StarKind};
    use glam::Vec3;

    fn new_game() -> Game {
        Game::new(Box::new(HighScores::new()), &Settings::default(), 42)
    }

    fn press(game: &mut Game, key: Key) {
        game.handle_event(InputEvent::Key(key));
    }

    fn crash(game: &mut Game) {
        let p = game.round.player.clone();
        game.round.stars.push(Star {
            pos: Vec3::new(p.x, 0.0, p.z),
            kind: StarKind::Asteroid,
            size: 0.6,
            color: [1.0; 3],
            hp: 1,
            spin_angle: 0.0,
            spin_speed: 0.0,
        });
        game.update(0.0);
    }

    #[test]
    fn test_menu_start_enters_playing() {
        let mut game = new_game();
        assert_eq!(game.phase, GamePhase::Menu);
        press(&mut game, Key::Enter);
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.prompt.last_played, Some(Difficulty::Normal));
    }

    #[test]
    fn test_step_clamped() {
        assert_eq!(step_clamped(0, -1, 5), 0);
        assert_eq!(step_clamped(4, 1, 5), 4);
        assert_eq!(step_clamped(2, 1, 5), 3);
    }

    #[test]
    fn test_selector_rows() {
        let mut game = new_game();
        press(&mut game, Key::Down);
        press(&mut game, Key::Right);
        assert_eq!(game.menu.mode(), GameMode::Collector);
        press(&mut game, Key::Right);
        assert_eq!(game.menu.mode(), GameMode::Collector);
        press(&mut game, Key::Enter);
        assert_eq!(game.menu.mode(), GameMode::Survival);

        press(&mut game, Key::Down);
        press(&mut game, Key::Left);
        press(&mut game, Key::Left);
        assert_eq!(game.menu.difficulty(), Difficulty::Easy);
        press(&mut game, Key::Enter);
        assert_eq!(game.menu.difficulty(), Difficulty::Normal);
    }

    #[test]
    fn test_crash_enters_game_over_and_prompts_once() {
        let mut game = new_game();
        press(&mut game, Key::Enter);
        crash(&mut game);
        assert_eq!(game.phase, GamePhase::GameOver);
        assert!(game.prompt.prompted);
        // Empty boards accept any score
        assert!(game.prompt.capturing_name);
        assert_eq!(game.prompt.pending_key.as_deref(), Some("Normal"));

        press(&mut game, Key::Escape);
        game.update(0.1);
        assert!(!game.prompt.capturing_name);
        assert!(game.leaderboard().get("Normal").is_empty());
    }

    #[test]
    fn test_name_capture_commits() {
        let mut game = new_game();
        press(&mut game, Key::Enter);
        game.round.score = 40;
        crash(&mut game);

        for c in "Ada".chars() {
            press(&mut game, Key::Char(c));
        }
        press(&mut game, Key::Char('\u{7}'));
        press(&mut game, Key::Backspace);
        press(&mut game, Key::Char('a'));
        press(&mut game, Key::Enter);

        assert!(!game.prompt.capturing_name);
        let board = game.leaderboard().get("Normal");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "Ada");
        assert_eq!(board[0].score, 40);
    }

    #[test]
    fn test_empty_name_uses_placeholder() {
        let mut game = new_game();
        press(&mut game, Key::Enter);
        crash(&mut game);
        press(&mut game, Key::Space);
        press(&mut game, Key::Enter);
        assert_eq!(game.leaderboard().get("Normal")[0].name, "Player");
    }

    #[test]
    fn test_invisible_chars_are_rejected() {
        let mut game = new_game();
        press(&mut game, Key::Enter);
        crash(&mut game);
        for c in [
            '\u{200B}', '\u{200D}', '\u{FEFF}', '\u{00AD}', '\u{2028}', '\u{00A0}', '\t',
            '\u{E000}', '\u{FFFF}',
        ] {
            press(&mut game, Key::Char(c));
        }
        assert!(game.prompt.name_buffer.is_empty());

        for c in ['Z', 'é', '界', '!'] {
            press(&mut game, Key::Char(c));
        }
        press(&mut game, Key::Char(' '));
        press(&mut game, Key::Space);
        assert_eq!(game.prompt.name_buffer, "Zé界!  ");
    }

    #[test]
    fn test_name_is_capped() {
        let mut game = new_game();
        press(&mut game, Key::Enter);
        crash(&mut game);
        for _ in 0..50 {
            press(&mut game, Key::Char('z'));
        }
        assert_eq!(game.prompt.name_buffer.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_pause_menu_navigation() {
        let mut game = new_game();
        press(&mut game, Key::Enter);
        press(&mut game, Key::Char('p'));
        assert_eq!(game.phase, GamePhase::Paused);

        let before = game.round.time_alive;
        game.update(1.0);
        assert_eq!(game.round.time_alive, before);

        press(&mut game, Key::Down);
        press(&mut game, Key::Down);
        press(&mut game, Key::Down);
        assert_eq!(game.menu.selected_pause_item(), PauseItem::Quit);
        press(&mut game, Key::Up);
        press(&mut game, Key::Enter);
        assert_eq!(game.phase, GamePhase::Menu);
        assert!(game.is_running());
    }

    #[test]
    fn test_fire_only_in_survival() {
        let mut game = new_game();
        game.menu.mode_index = GameMode::Collector.index();
        press(&mut game, Key::Enter);
        press(&mut game, Key::Space);
        assert!(game.round.shots.is_empty());
        assert_eq!(game.round.player.shot_charge, 1.0);
    }

    #[test]
    fn test_collector_key_and_score() {
        let mut game = new_game();
        game.menu.mode_index = GameMode::Collector.index();
        game.menu.difficulty_index = Difficulty::Hard.index();
        press(&mut game, Key::Enter);
        game.round.time_alive = 12.7;
        game.round.score = 3;
        assert_eq!(game.qualifying_score(), 12);
        game.round.missed_stars = 5;
        game.round.stars.push(Star {
            pos: Vec3::new(0.0, 0.0, 10.0),
            kind: StarKind::CollectorStar,
            size: 0.5,
            color: [1.0; 3],
            hp: 0,
            spin_angle: 0.0,
            spin_speed: 0.0,
        });
        game.update(0.0);
        assert_eq!(game.phase, GamePhase::GameOver);
        assert_eq!(game.prompt.pending_key.as_deref(), Some("Hard-Collector"));
    }

    #[test]
    fn test_leaderboard_browser() {
        let mut game = new_game();
        for _ in 0..3 {
            press(&mut game, Key::Down);
        }
        press(&mut game, Key::Enter);
        assert!(game.menu.show_leaderboard);
        press(&mut game, Key::Down);
        press(&mut game, Key::Left);
        assert_eq!(game.browsed_board().0, "Easy-Collector");
        press(&mut game, Key::Escape);
        assert!(!game.menu.show_leaderboard);
        assert_eq!(game.phase, GamePhase::Menu);
    }

    #[test]
    fn test_quit_paths() {
        let mut game = new_game();
        game.handle_event(InputEvent::Quit);
        assert!(!game.is_running());

        let mut game = new_game();
        for _ in 0..10 {
            press(&mut game, Key::Down);
        }
        assert_eq!(game.menu.selected_item(), MenuItem::Quit);
        press(&mut game, Key::Enter);
        assert!(!game.is_running());
    }
}
