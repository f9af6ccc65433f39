//! Minimal presentation layer for the binary: a first-person camera, gizmo
//! outlines of the arena and enemies, and a status line in the window title.
//!
//! Everything here only reads the core resources; nothing writes back.

use crate::driver::GameLoopSet;
use crate::maze::MazeLayout;
use crate::player::Viewpoint;
use crate::state::{Phase, StateStore};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Height of an enemy's body box.
const ENEMY_BODY_HEIGHT: f32 = 2.0;

pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (camera_follow_system, arena_gizmo_system, status_title_system).after(GameLoopSet),
        );
    }
}

/// Setup camera for first-person 3D rendering.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera3d::default());
}

/// Keep the camera at the viewpoint.
pub fn camera_follow_system(viewpoint: Res<Viewpoint>, mut q_camera: Query<&mut Transform, With<Camera>>) {
    let Ok(mut cam) = q_camera.single_mut() else {
        return;
    };
    cam.translation = viewpoint.position;
    cam.rotation = viewpoint.rotation();
}

/// Wall blocks in grey, living enemies tinted green → red by health.
pub fn arena_gizmo_system(mut gizmos: Gizmos, maze: Res<MazeLayout>, store: Res<StateStore>) {
    let wall_size = Vec3::splat(maze.cell_size());
    for center in maze.wall_centers() {
        gizmos.cuboid(
            Transform::from_translation(center).with_scale(wall_size),
            Color::srgb(0.35, 0.35, 0.35),
        );
    }

    for enemy in store.snapshot().alive_enemies() {
        let health_frac = enemy.health as f32 / 100.0;
        let color = Color::hsl(health_frac * 120.0, 0.7, 0.5);
        let body = Transform::from_translation(enemy.position)
            .with_scale(Vec3::new(1.0, ENEMY_BODY_HEIGHT, 1.0));
        gizmos.cuboid(body, color);
    }
}

/// Show phase, vitals and score in the window title.
pub fn status_title_system(store: Res<StateStore>, mut q_window: Query<&mut Window, With<PrimaryWindow>>) {
    if !store.is_changed() {
        return;
    }
    let Ok(mut window) = q_window.single_mut() else {
        return;
    };
    let state = store.snapshot();
    window.title = match state.phase {
        Phase::Menu => "Maze Shooter — press Enter to start".to_string(),
        Phase::Paused => format!("Maze Shooter — paused (score {})", state.score),
        Phase::GameOver => format!(
            "Maze Shooter — GAME OVER — score {} · level {} — Enter to restart",
            state.score, state.level
        ),
        Phase::Playing => format!(
            "Maze Shooter — HP {}/{} · Ammo {}/{} · Score {} · Level {} · Enemies {}",
            state.health,
            state.max_health,
            state.ammo,
            state.max_ammo,
            state.score,
            state.level,
            state.alive_count()
        ),
    };
}
