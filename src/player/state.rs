//! Player resources and the logical actions the input layer emits.
//!
//! Systems that mutate this state live in the sibling modules:
//! - [`super::control`] — device input → [`PlayerIntent`] / [`PlayerAction`],
//!   and intent → [`Viewpoint`] movement

use bevy::prelude::*;

/// Largest look-up/look-down angle (radians).
pub const MAX_PITCH: f32 = 1.5;

/// Discrete commands from the player, already stripped of any device detail.
///
/// Consumed in arrival order by [`crate::driver::apply_player_actions_system`].
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Begin a fresh run (from the title or game-over screen).
    Start,
    Pause,
    Resume,
    /// Pull the trigger once.
    Shoot,
    Reload,
}

/// Where the player stands and where they are looking.
///
/// Read every tick by the enemy director (distance check) and by shot
/// resolution (origin and aim).
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Vec3,
    /// Rotation about +Y (radians); `0` faces −Z.
    pub yaw: f32,
    /// Rotation about the local X axis (radians), clamped to ±[`MAX_PITCH`].
    pub pitch: f32,
}

impl Viewpoint {
    /// Standing at `position`, facing −Z.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Unit firing direction.
    #[inline]
    pub fn aim(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Unit walking-forward direction on the floor plane.
    #[inline]
    pub fn planar_forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::NEG_Z
    }

    /// Unit strafe-right direction on the floor plane.
    #[inline]
    pub fn planar_right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::X
    }
}

/// Aggregated movement intent for the current frame, derived from all input
/// sources.
///
/// Input systems write to this resource, [`super::control::apply_player_intent_system`]
/// consumes it and clears it. Tests populate it directly to drive movement
/// without a real input device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    /// `x` strafes right, `y` walks forward; components in `[-1, 1]`.
    pub movement: Vec2,
    /// Look deltas this frame: `x` is yaw, `y` is pitch (radians).
    pub look: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orientation_faces_negative_z() {
        let view = Viewpoint::at(Vec3::ZERO);
        assert!((view.aim() - Vec3::NEG_Z).length() < 1e-6);
        assert!((view.planar_right() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn quarter_turn_left_faces_negative_x() {
        let view = Viewpoint {
            yaw: std::f32::consts::FRAC_PI_2,
            ..Viewpoint::at(Vec3::ZERO)
        };
        assert!((view.planar_forward() - Vec3::NEG_X).length() < 1e-5);
        assert!((view.aim() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn pitch_tilts_aim_but_not_planar_forward() {
        let view = Viewpoint {
            pitch: 0.5,
            ..Viewpoint::at(Vec3::ZERO)
        };
        assert!(view.aim().y > 0.0);
        assert!(view.planar_forward().y.abs() < 1e-6);
    }
}
