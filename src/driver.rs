//! Game loop plugin and the per-frame systems that drive the core.
//!
//! ## Systems (registered by `GameLoopPlugin`)
//!
//! | System                          | Schedule                 | Purpose                                   |
//! |---------------------------------|--------------------------|-------------------------------------------|
//! | `setup_arena`                   | `Startup`                | build maze, store, director, viewpoint    |
//! | `enemy_spawn_system`            | `Update` / playing       | ask the director for a spawn              |
//! | `apply_player_actions_system`   | `Update`                 | apply queued `PlayerAction`s in order     |
//! | `apply_game_commands_system`    | `Update`                 | apply queued raw `GameCommand`s in order  |
//! | `apply_player_intent_system`    | `Update` / playing       | move the viewpoint                        |
//! | `sync_phase_system`             | `Update`                 | mirror the snapshot phase into `State<Phase>` |
//! | `pause_clock` / `resume_clock`  | `OnEnter` / `OnExit(Paused)` | halt the virtual clock while paused    |
//!
//! The `Update` systems are chained in the order above, so a frame's spawn
//! decision always happens before that frame's input is applied.

use crate::combat;
use crate::config::GameConfig;
use crate::director::EnemyDirector;
use crate::maze::MazeLayout;
use crate::player::{apply_player_intent_system, PlayerAction, PlayerIntent, Viewpoint};
use crate::state::{GameCommand, Phase, StateStore};
use bevy::prelude::*;

/// Startup set that builds the arena resources from [`GameConfig`].
///
/// Anything that rewrites the config (the binary's file loader) must run
/// before this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArenaSetup;

/// Per-frame set containing the whole core loop.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameLoopSet;

/// Registers the core resources, messages and the per-frame loop.
///
/// Requires Bevy's `StatesPlugin` (part of `DefaultPlugins`; add it explicitly
/// next to `MinimalPlugins` in headless apps).
pub struct GameLoopPlugin;

impl Plugin for GameLoopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<PlayerIntent>()
            .init_state::<Phase>()
            .add_message::<PlayerAction>()
            .add_message::<GameCommand>()
            .add_systems(Startup, setup_arena.in_set(ArenaSetup))
            .add_systems(
                Update,
                (
                    enemy_spawn_system.run_if(run_is_playing),
                    apply_player_actions_system,
                    apply_game_commands_system,
                    apply_player_intent_system.run_if(run_is_playing),
                    sync_phase_system,
                )
                    .chain()
                    .in_set(GameLoopSet),
            )
            .add_systems(OnEnter(Phase::Paused), pause_clock)
            .add_systems(OnExit(Phase::Paused), resume_clock);
    }
}

/// Build every core resource from the current [`GameConfig`].
pub fn setup_arena(mut commands: Commands, config: Res<GameConfig>) {
    let maze = config.maze().unwrap_or_else(|err| {
        error!("{err}; using an arena without open cells");
        MazeLayout::empty(config.cell_size, config.eye_height, config.enemy_spawn_height)
    });

    info!(
        "Arena {}x{} with {} open cells",
        maze.width(),
        maze.depth(),
        maze.open_cells().len()
    );

    commands.insert_resource(Viewpoint::at(maze.player_start()));
    commands.insert_resource(StateStore::new(config.vitals()));
    commands.insert_resource(EnemyDirector::new(config.spawn_policy(), config.rng_seed));
    commands.insert_resource(maze);
}

/// Run condition: the snapshot says a run is in progress.
pub fn run_is_playing(store: Res<StateStore>) -> bool {
    store.snapshot().is_playing()
}

/// Ask the director whether an enemy appears this frame.
pub fn enemy_spawn_system(
    time: Res<Time>,
    maze: Res<MazeLayout>,
    viewpoint: Res<Viewpoint>,
    mut director: ResMut<EnemyDirector>,
    mut store: ResMut<StateStore>,
) {
    if let Some(id) = director.spawn_into(time.elapsed(), &mut store, &maze, viewpoint.position) {
        if let Some(enemy) = store.snapshot().enemy(id) {
            info!(
                "Spawned {} at ({:.1}, {:.1})",
                id, enemy.position.x, enemy.position.z
            );
        }
    }
}

/// Apply the frame's [`PlayerAction`]s in arrival order.
pub fn apply_player_actions_system(
    mut actions: MessageReader<PlayerAction>,
    config: Res<GameConfig>,
    maze: Res<MazeLayout>,
    mut store: ResMut<StateStore>,
    mut director: ResMut<EnemyDirector>,
    mut viewpoint: ResMut<Viewpoint>,
) {
    for &action in actions.read() {
        let command = match action {
            PlayerAction::Start => GameCommand::StartGame,
            PlayerAction::Pause => GameCommand::PauseGame,
            PlayerAction::Resume => GameCommand::ResumeGame,
            PlayerAction::Reload => GameCommand::Reload,
            PlayerAction::Shoot => {
                let rules = config.combat_rules();
                if let Some(outcome) =
                    combat::fire(&mut store, viewpoint.position, viewpoint.aim(), &rules)
                {
                    if !outcome.hits.is_empty() {
                        info!(
                            "Shot killed {} enemies (+{})",
                            outcome.hits.len(),
                            outcome.score_delta
                        );
                    }
                }
                continue;
            }
        };
        dispatch(command, &mut store, &mut director, &mut viewpoint, &maze);
    }
}

/// Apply raw [`GameCommand`]s sent by other collaborators (damage sources,
/// level scripting) in arrival order.
pub fn apply_game_commands_system(
    mut queued: MessageReader<GameCommand>,
    maze: Res<MazeLayout>,
    mut store: ResMut<StateStore>,
    mut director: ResMut<EnemyDirector>,
    mut viewpoint: ResMut<Viewpoint>,
) {
    for command in queued.read() {
        dispatch(command.clone(), &mut store, &mut director, &mut viewpoint, &maze);
    }
}

/// Apply one command, plus the resets a fresh run or level needs outside the
/// snapshot.
pub fn dispatch(
    command: GameCommand,
    store: &mut StateStore,
    director: &mut EnemyDirector,
    viewpoint: &mut Viewpoint,
    maze: &MazeLayout,
) {
    let resets_arena = matches!(command, GameCommand::StartGame | GameCommand::NextLevel);
    store.apply(command);
    if resets_arena {
        director.reset();
        *viewpoint = Viewpoint::at(maze.player_start());
    }
}

/// Request the Bevy state matching the snapshot's phase.
pub fn sync_phase_system(
    store: Res<StateStore>,
    current: Res<State<Phase>>,
    mut next: ResMut<NextState<Phase>>,
) {
    let phase = store.snapshot().phase;
    if *current.get() != phase {
        next.set(phase);
    }
}

/// Halt the virtual clock so the spawn cooldown does not run while paused.
pub fn pause_clock(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

pub fn resume_clock(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}
