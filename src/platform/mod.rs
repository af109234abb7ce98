//! Platform abstraction layer
//!
//! Everything that differs between front ends:
//! - Input event vocabulary
//! - Frame timing
//! - Drawing (the `Renderer` trait)

mod autopilot;

pub use autopilot::Autopilot;

use std::time::{Duration, Instant};

use crate::game::{Game, GameMode, GamePhase};
use crate::settings::Settings;

/// Discrete key presses the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Escape,
    Backspace,
    /// Printable character (letter commands and name entry)
    Char(char),
}

/// Events delivered to [`Game::handle_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize { width: u32, height: u32 },
    /// Window closed or equivalent
    Quit,
}

/// Clamp a measured frame delta so long stalls don't teleport objects
pub fn cap_delta(dt: f32, max_delta: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_delta)
    } else {
        0.0
    }
}

/// Measures per-frame deltas and sleeps to honour the frame-rate cap
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    frame_start: Instant,
    budget: Duration,
    max_delta: f32,
}

impl FrameClock {
    pub fn new(settings: &Settings) -> Self {
        let now = Instant::now();
        Self {
            last: now,
            frame_start: now,
            budget: Duration::from_secs_f32(settings.frame_budget()),
            max_delta: settings.max_frame_delta.max(0.0),
        }
    }

    /// Start a frame, returning the capped seconds since the previous one
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frame_start = now;
        cap_delta(dt, self.max_delta)
    }

    /// Sleep away whatever is left of this frame's budget
    pub fn end_frame(&self) {
        if let Some(rest) = self.budget.checked_sub(self.frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

/// Drawing backend. Reads the game, never mutates it.
pub trait Renderer {
    fn initialize(&mut self, width: u32, height: u32);
    fn resize(&mut self, width: u32, height: u32);
    /// Main menu and leaderboard browser
    fn draw_menu(&mut self, game: &Game);
    /// Playfield: ship, objects, shots, explosions, HUD
    fn draw_scene(&mut self, game: &Game);
    /// Pause menu or game-over panel on top of the scene
    fn draw_overlay(&mut self, game: &Game);
}

/// Feed one event to the game, forwarding window resizes to the renderer
pub fn dispatch_event<R: Renderer + ?Sized>(
    game: &mut Game,
    renderer: &mut R,
    event: InputEvent,
) {
    game.handle_event(event);
    if let InputEvent::Resize { width, height } = event {
        renderer.resize(width, height);
    }
}

/// Draw one frame for the current phase
pub fn render_frame<R: Renderer + ?Sized>(renderer: &mut R, game: &Game) {
    match game.phase {
        GamePhase::Menu => renderer.draw_menu(game),
        GamePhase::Playing => renderer.draw_scene(game),
        GamePhase::Paused | GamePhase::GameOver => {
            renderer.draw_scene(game);
            renderer.draw_overlay(game);
        }
    }
}

/// Renderer that writes to the log instead of a window
#[derive(Debug)]
pub struct HeadlessRenderer {
    size: (u32, u32),
    last_phase: Option<GamePhase>,
    last_hud: Option<Instant>,
    hud_interval: Duration,
    frames: u64,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self {
            size: (0, 0),
            last_phase: None,
            last_hud: None,
            hud_interval: Duration::from_secs(1),
            frames: 0,
        }
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Frames drawn so far (one per `render_frame` call)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn note_phase(&mut self, game: &Game) {
        if self.last_phase != Some(game.phase) {
            log::info!("Phase: {:?} ({})", game.phase, game.mode.as_str());
            self.last_phase = Some(game.phase);
        }
    }

    fn hud_due(&mut self) -> bool {
        let now = Instant::now();
        match self.last_hud {
            Some(t) if now.duration_since(t) < self.hud_interval => false,
            _ => {
                self.last_hud = Some(now);
                true
            }
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn initialize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        log::info!("Headless renderer initialized ({}x{})", width, height);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn draw_menu(&mut self, game: &Game) {
        self.frames += 1;
        self.note_phase(game);
        if game.menu.show_leaderboard && self.hud_due() {
            let (key, entries) = game.browsed_board();
            log::debug!("Leaderboard {}: {} entries", key, entries.len());
        }
    }

    fn draw_scene(&mut self, game: &Game) {
        self.frames += 1;
        self.note_phase(game);
        if game.phase == GamePhase::Playing && self.hud_due() {
            let round = &game.round;
            let mut hud = game.hud_line();
            if game.mode == GameMode::Survival {
                hud.push_str(&format!("  Charge: {:.0}%", round.player.shot_charge * 100.0));
            }
            if round.player.shield_active() {
                hud.push_str(&format!("  Shield: {:.1}s", round.player.shield_time));
            }
            if round.effects.slow_active() {
                hud.push_str(&format!("  Slow: {:.1}s", round.effects.global_slow_time));
            }
            log::debug!("{}", hud);
        }
    }

    fn draw_overlay(&mut self, game: &Game) {
        if game.phase == GamePhase::GameOver && game.prompt.capturing_name && self.hud_due() {
            log::debug!("Name entry: '{}'", game.prompt.name_buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;

    #[test]
    fn test_cap_delta() {
        assert_eq!(cap_delta(0.5, 0.1), 0.1);
        assert_eq!(cap_delta(0.016, 0.1), 0.016);
        assert_eq!(cap_delta(-1.0, 0.1), 0.0);
        assert_eq!(cap_delta(f32::NAN, 0.1), 0.0);
    }

    #[test]
    fn test_frame_clock_caps_delta() {
        let settings = Settings {
            max_frame_delta: 0.05,
            ..Default::default()
        };
        let mut clock = FrameClock::new(&settings);
        std::thread::sleep(Duration::from_millis(80));
        assert!(clock.begin_frame() <= 0.05);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        size: Option<(u32, u32)>,
    }

    impl Renderer for Recorder {
        fn initialize(&mut self, _: u32, _: u32) {}
        fn resize(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }
        fn draw_menu(&mut self, _: &Game) {
            self.calls.push("menu");
        }
        fn draw_scene(&mut self, _: &Game) {
            self.calls.push("scene");
        }
        fn draw_overlay(&mut self, _: &Game) {
            self.calls.push("overlay");
        }
    }

    #[test]
    fn test_render_frame_per_phase() {
        let mut game = Game::new(Box::new(HighScores::new()), &Settings::default(), 3);
        let mut recorder = Recorder::default();

        render_frame(&mut recorder, &game);
        game.handle_event(InputEvent::Key(Key::Enter));
        render_frame(&mut recorder, &game);
        game.handle_event(InputEvent::Key(Key::Escape));
        render_frame(&mut recorder, &game);

        assert_eq!(recorder.calls, ["menu", "scene", "scene", "overlay"]);
    }

    #[test]
    fn test_resize_reaches_renderer() {
        let mut game = Game::new(Box::new(HighScores::new()), &Settings::default(), 3);
        let mut recorder = Recorder::default();

        dispatch_event(&mut game, &mut recorder, InputEvent::Key(Key::Down));
        assert_eq!(recorder.size, None);

        let resize = InputEvent::Resize {
            width: 1024,
            height: 600,
        };
        dispatch_event(&mut game, &mut recorder, resize);
        assert_eq!(recorder.size, Some((1024, 600)));
        assert_eq!(game.window, (1024, 600));
        assert_eq!(game.menu.selected, 1);
    }

    #[test]
    fn test_headless_counts_frames() {
        let game = Game::new(Box::new(HighScores::new()), &Settings::default(), 3);
        let mut renderer = HeadlessRenderer::new();
        renderer.initialize(640, 480);
        render_frame(&mut renderer, &game);
        render_frame(&mut renderer, &game);
        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.size(), (640, 480));
    }
}
