use bevy::prelude::*;
use bevy::window::WindowResolution;
use std::env;

use maze_shooter::config::{self, GameConfig};
use maze_shooter::driver::{ArenaSetup, GameLoopPlugin};
use maze_shooter::graphics::ViewPlugin;
use maze_shooter::player::{PlayerAction, PlayerInputPlugin};

/// Skip the title screen: send a `Start` action on the first frame.
fn autostart(mut actions: MessageWriter<PlayerAction>) {
    actions.write(PlayerAction::Start);
}

fn main() {
    // MAZE_SHOOTER_AUTOSTART=1 jumps straight into a run.
    let autostart_requested = env::var("MAZE_SHOOTER_AUTOSTART").is_ok();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Maze Shooter".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Compiled defaults; load_game_config overwrites them from assets/game.toml
    // (if present) before the arena is built.
    .insert_resource(GameConfig::default())
    .add_plugins((GameLoopPlugin, PlayerInputPlugin, ViewPlugin))
    .add_systems(Startup, config::load_game_config.before(ArenaSetup));

    if autostart_requested {
        app.add_systems(Startup, autostart.after(ArenaSetup));
    }

    app.run();
}
