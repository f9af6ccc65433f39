//! Player module: viewpoint, input mapping and movement.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | Resources (`Viewpoint`, `PlayerIntent`) and the `PlayerAction` message |
//! | [`control`] | Input systems (WASD, mouse look, buttons → actions) and intent → viewpoint movement |
//!
//! All public items are re-exported at this level so the rest of the crate can
//! use flat `crate::player::*` imports.

pub mod control;
pub mod state;

pub use control::{
    actions_for, apply_player_intent_system, keyboard_to_action_system, keyboard_to_intent_system,
    mouse_look_system, step_viewpoint, PressedButtons,
};
pub use state::{PlayerAction, PlayerIntent, Viewpoint};

use crate::driver::GameLoopSet;
use bevy::prelude::*;

/// Keyboard and mouse bindings. Added by the binary only; headless apps send
/// [`PlayerAction`] messages and fill [`PlayerIntent`] directly.
pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                keyboard_to_intent_system,
                mouse_look_system,
                keyboard_to_action_system,
            )
                .before(GameLoopSet),
        );
    }
}
