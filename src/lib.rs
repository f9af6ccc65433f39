//! Maze shooter game core
//!
//! The authoritative game state machine, the enemy spawn policy and shot
//! resolution for a first-person maze arena shooter, wired into Bevy as
//! resources, messages and a per-frame plugin.

pub mod combat;
pub mod config;
pub mod constants;
pub mod director;
pub mod driver;
pub mod error;
pub mod graphics;
pub mod maze;
pub mod player;
pub mod state;
