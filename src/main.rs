//! Space Dodger entry point
//!
//! Loads settings and the leaderboard, then runs the frame-capped game loop
//! with the headless renderer and the autopilot as input source.

use space_dodger::platform::{
    Autopilot, FrameClock, HeadlessRenderer, Renderer, dispatch_event, render_frame,
};
use space_dodger::settings::{SETTINGS_FILE, Settings};
use space_dodger::{Game, HighScores};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Dodger starting...");

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SETTINGS_FILE.to_string());
    let settings = Settings::load_or_init(&settings_path);

    let leaderboard = HighScores::load(&settings.leaderboard_path);
    let seed: u64 = rand::random();
    log::info!("Game initialized with seed: {}", seed);

    let mut game = Game::new(Box::new(leaderboard), &settings, seed);
    let mut renderer = HeadlessRenderer::new();
    renderer.initialize(game.window.0, game.window.1);

    let mut pilot = Autopilot::new(
        settings.player_name_placeholder.clone(),
        settings.demo_round_seconds,
    );
    let mut clock = FrameClock::new(&settings);

    while game.is_running() {
        let dt = clock.begin_frame();
        for event in pilot.poll(&game, dt) {
            dispatch_event(&mut game, &mut renderer, event);
        }
        game.update(dt);
        render_frame(&mut renderer, &game);
        clock.end_frame();
    }

    log::info!("Exiting after {} frames", renderer.frames());
}
