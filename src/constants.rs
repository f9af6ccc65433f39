//! Centralised gameplay constants.
//!
//! Every tuneable value lives here so it can be found and modified in one
//! place. [`crate::config::GameConfig::default`] mirrors these values, and
//! `assets/game.toml` can override any subset at startup without recompiling.

// ── Player: Vitals ────────────────────────────────────────────────────────────

/// Health the player starts every run with, and the ceiling for healing.
pub const PLAYER_MAX_HEALTH: u32 = 100;

/// Magazine size; Reload always refills to exactly this.
pub const PLAYER_MAX_AMMO: u32 = 30;

// ── Player: Movement ──────────────────────────────────────────────────────────

/// Walking speed of the viewpoint (world units per second).
pub const MOVE_SPEED: f32 = 10.0;

/// Mouse-look sensitivity (radians of yaw per pixel of horizontal motion).
pub const LOOK_SENSITIVITY: f32 = 0.003;

/// Camera height above the floor.
pub const EYE_HEIGHT: f32 = 1.8;

/// Grid cell (row, column) the player starts in.
pub const PLAYER_START_CELL: (usize, usize) = (1, 1);

// ── Arena ─────────────────────────────────────────────────────────────────────

/// Edge length of one maze cell (world units).
///
/// Walls, spawn points and the minimum spawn distance all scale with this.
pub const CELL_SIZE: f32 = 5.0;

/// Default arena: `#` is a wall, `.` is an open cell.
pub const DEFAULT_MAZE: [&str; 10] = [
    "##########",
    "#...#....#",
    "#.#.#.##.#",
    "#.#....#.#",
    "#.####.#.#",
    "#....#...#",
    "###.####.#",
    "#...#....#",
    "#.###.####",
    "##########",
];

// ── Enemies: Spawning ─────────────────────────────────────────────────────────

/// Maximum number of enemies alive at the same time.
pub const ENEMY_MAX_ALIVE: usize = 5;

/// Minimum time between two successful spawns (seconds, monotonic clock).
pub const ENEMY_SPAWN_COOLDOWN_SECS: f32 = 5.0;

/// Random cells sampled per tick before giving up on spawning.
pub const ENEMY_SPAWN_ATTEMPTS: u32 = 10;

/// Spawn points must be farther than this many cells from the player.
pub const ENEMY_MIN_SPAWN_DISTANCE_CELLS: f32 = 2.0;

/// Height enemies stand at (feet on the floor).
pub const ENEMY_SPAWN_HEIGHT: f32 = 0.5;

/// Health every enemy spawns with.
pub const ENEMY_MAX_HEALTH: u32 = 100;

// ── Combat ────────────────────────────────────────────────────────────────────

/// Reach of a shot from the firing origin (world units).
pub const HIT_RANGE: f32 = 20.0;

/// Radius of the sphere used for enemy hit tests under the ray rule.
pub const ENEMY_HIT_RADIUS: f32 = 1.0;

/// Points awarded per enemy killed.
pub const KILL_SCORE: u32 = 100;
