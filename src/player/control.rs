//! Player input and movement.
//!
//! ## Pipeline
//!
//! 1. **Device → intent/action** — `keyboard_to_intent_system`,
//!    `mouse_look_system` and `keyboard_to_action_system` translate raw
//!    devices into [`PlayerIntent`] and [`PlayerAction`] messages. These are
//!    registered by [`super::PlayerInputPlugin`] and only exist in the binary.
//! 2. **Intent → viewpoint** — `apply_player_intent_system` moves and turns
//!    the [`Viewpoint`], refusing steps into wall cells, then clears the
//!    intent.
//!
//! Key bindings:
//!
//! | Key / button   | Effect                                     |
//! |----------------|--------------------------------------------|
//! | W / A / S / D  | walk / strafe                              |
//! | Mouse motion   | look                                       |
//! | Left click     | shoot                                      |
//! | R              | reload (only when the magazine is not full) |
//! | Escape         | pause / resume                             |
//! | Enter          | start a run from the title or game-over screen |

use super::state::{PlayerAction, PlayerIntent, Viewpoint, MAX_PITCH};
use crate::config::GameConfig;
use crate::maze::MazeLayout;
use crate::state::{GameState, Phase, StateStore};
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

// ── Step 1: Device → intent ───────────────────────────────────────────────────

/// WASD → planar movement intent.
pub fn keyboard_to_intent_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<PlayerIntent>) {
    let axis = |pos: KeyCode, neg: KeyCode| {
        f32::from(u8::from(keys.pressed(pos))) - f32::from(u8::from(keys.pressed(neg)))
    };
    intent.movement = Vec2::new(
        axis(KeyCode::KeyD, KeyCode::KeyA),
        axis(KeyCode::KeyW, KeyCode::KeyS),
    );
}

/// Mouse motion → look intent. Moving the mouse right turns right.
pub fn mouse_look_system(
    motion: Res<AccumulatedMouseMotion>,
    config: Res<GameConfig>,
    mut intent: ResMut<PlayerIntent>,
) {
    intent.look += -motion.delta * config.look_sensitivity;
}

/// Buttons → logical actions for the current phase.
pub fn keyboard_to_action_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    store: Res<StateStore>,
    mut actions: MessageWriter<PlayerAction>,
) {
    let pressed = PressedButtons {
        escape: keys.just_pressed(KeyCode::Escape),
        enter: keys.just_pressed(KeyCode::Enter),
        reload: keys.just_pressed(KeyCode::KeyR),
        fire: mouse.just_pressed(MouseButton::Left),
    };
    for action in actions_for(store.snapshot(), pressed) {
        actions.write(action);
    }
}

/// Buttons that went down this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressedButtons {
    pub escape: bool,
    pub enter: bool,
    pub reload: bool,
    pub fire: bool,
}

/// Map this frame's button presses to logical actions, given the snapshot.
pub fn actions_for(state: &GameState, pressed: PressedButtons) -> Vec<PlayerAction> {
    let mut actions = Vec::new();
    match state.phase {
        Phase::Menu | Phase::GameOver => {
            if pressed.enter {
                actions.push(PlayerAction::Start);
            }
        }
        Phase::Playing => {
            if pressed.escape {
                actions.push(PlayerAction::Pause);
                return actions;
            }
            if pressed.reload && state.ammo < state.max_ammo {
                actions.push(PlayerAction::Reload);
            }
            if pressed.fire {
                actions.push(PlayerAction::Shoot);
            }
        }
        Phase::Paused => {
            if pressed.escape {
                actions.push(PlayerAction::Resume);
            }
        }
    }
    actions
}

// ── Step 2: Intent → viewpoint ───────────────────────────────────────────────

/// Apply and clear the frame's [`PlayerIntent`].
pub fn apply_player_intent_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    maze: Res<MazeLayout>,
    mut intent: ResMut<PlayerIntent>,
    mut viewpoint: ResMut<Viewpoint>,
) {
    *viewpoint = step_viewpoint(
        *viewpoint,
        &intent,
        config.move_speed * time.delta_secs(),
        &maze,
    );
    *intent = PlayerIntent::default();
}

/// Turn by the look intent, then walk up to `distance` along the movement
/// intent.
///
/// The X and Z components are tried separately so the player slides along a
/// wall instead of sticking to it.
pub fn step_viewpoint(
    mut view: Viewpoint,
    intent: &PlayerIntent,
    distance: f32,
    maze: &MazeLayout,
) -> Viewpoint {
    view.yaw += intent.look.x;
    view.pitch = (view.pitch + intent.look.y).clamp(-MAX_PITCH, MAX_PITCH);

    let wish = view.planar_forward() * intent.movement.y + view.planar_right() * intent.movement.x;
    let step = wish.normalize_or_zero() * distance;

    for delta in [Vec3::new(step.x, 0.0, 0.0), Vec3::new(0.0, 0.0, step.z)] {
        let target = view.position + delta;
        if delta != Vec3::ZERO && maze.is_open_at(target) {
            view.position = target;
        }
    }
    view
}
