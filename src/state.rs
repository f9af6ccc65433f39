//! The authoritative game state and the reducer that advances it.
//!
//! [`StateStore`] owns the single [`GameState`] snapshot. Every mutation goes
//! through [`StateStore::apply`], which runs the pure [`GameState::reduce`]
//! transition and then checks the state invariants. Commands whose
//! preconditions do not hold (shoot with an empty magazine, pause while not
//! playing, kill of an unknown id) leave the snapshot untouched.
//!
//! ## Transitions
//!
//! | Command          | Precondition        | Effect                                        |
//! |------------------|---------------------|-----------------------------------------------|
//! | `StartGame`      | —                   | fresh run, phase `Playing`                    |
//! | `PauseGame`      | `Playing`           | phase `Paused`                                |
//! | `ResumeGame`     | `Paused`            | phase `Playing`                               |
//! | `GameOver`       | —                   | phase `GameOver`                              |
//! | `TakeDamage(n)`  | —                   | health saturates at 0; 0 ⇒ `GameOver`         |
//! | `Heal(n)`        | —                   | health saturates at `max_health`              |
//! | `Shoot`          | `ammo > 0`          | ammo − 1                                      |
//! | `Reload`         | —                   | ammo = `max_ammo`                             |
//! | `AddScore(n)`    | —                   | score + n                                     |
//! | `SpawnEnemy(e)`  | unique id, coherent | append                                        |
//! | `KillEnemy(id)`  | alive enemy with id | `is_alive = false`, `health = 0`              |
//! | `NextLevel`      | —                   | level + 1, enemies cleared, ammo refilled     |

use crate::constants::{ENEMY_MAX_HEALTH, PLAYER_MAX_AMMO, PLAYER_MAX_HEALTH};
use bevy::prelude::*;
use std::fmt;

/// Top-level mode of a run.
///
/// Also registered as a Bevy [`States`] type so presentation code can hook
/// `OnEnter(Phase::GameOver)` and friends. The value inside the
/// [`GameState`] snapshot is authoritative; the Bevy state follows it.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Title screen; shown on startup.
    #[default]
    Menu,
    /// Active run; the game loop ticks.
    Playing,
    /// Run frozen; the game loop and its clock are halted.
    Paused,
    /// Health reached zero or the run was ended explicitly.
    GameOver,
}

/// Identifier of an enemy, unique within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u64);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy-{}", self.0)
    }
}

/// One enemy record.
///
/// `is_alive` is the authoritative liveness flag. Every mutation keeps
/// `is_alive == (health > 0)`: killing an enemy zeroes its health as well.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub position: Vec3,
    pub health: u32,
    pub is_alive: bool,
}

impl Enemy {
    /// A new enemy; alive exactly when `health > 0`.
    pub fn new(id: EnemyId, position: Vec3, health: u32) -> Self {
        Self {
            id,
            position,
            health,
            is_alive: health > 0,
        }
    }

    #[inline]
    fn is_coherent(&self) -> bool {
        self.is_alive == (self.health > 0) && self.health <= ENEMY_MAX_HEALTH
    }
}

/// Upper bounds a run starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub max_health: u32,
    pub max_ammo: u32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            max_ammo: PLAYER_MAX_AMMO,
        }
    }
}

/// Commands accepted by the [`StateStore`].
#[derive(Message, Debug, Clone, PartialEq)]
pub enum GameCommand {
    StartGame,
    PauseGame,
    ResumeGame,
    GameOver,
    TakeDamage(u32),
    Heal(u32),
    Shoot,
    Reload,
    AddScore(u32),
    SpawnEnemy(Enemy),
    KillEnemy(EnemyId),
    NextLevel,
}

/// Snapshot of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    pub health: u32,
    pub max_health: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub score: u32,
    pub level: u32,
    /// Spawn order. Dead enemies stay until the next reset or level.
    pub enemies: Vec<Enemy>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial(Vitals::default())
    }
}

impl GameState {
    /// State shown on the title screen before the first run.
    pub fn initial(vitals: Vitals) -> Self {
        Self {
            phase: Phase::Menu,
            health: vitals.max_health,
            max_health: vitals.max_health,
            ammo: vitals.max_ammo,
            max_ammo: vitals.max_ammo,
            score: 0,
            level: 1,
            enemies: Vec::new(),
        }
    }

    #[inline]
    pub fn vitals(&self) -> Vitals {
        Vitals {
            max_health: self.max_health,
            max_ammo: self.max_ammo,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_enemies().count()
    }

    /// Pure transition: the state that results from applying `command`.
    pub fn reduce(mut self, command: GameCommand) -> Self {
        match command {
            GameCommand::StartGame => Self {
                phase: Phase::Playing,
                ..Self::initial(self.vitals())
            },
            GameCommand::PauseGame => {
                if self.phase == Phase::Playing {
                    self.phase = Phase::Paused;
                }
                self
            }
            GameCommand::ResumeGame => {
                if self.phase == Phase::Paused {
                    self.phase = Phase::Playing;
                }
                self
            }
            GameCommand::GameOver => {
                self.phase = Phase::GameOver;
                self
            }
            GameCommand::TakeDamage(amount) => {
                self.health = self.health.saturating_sub(amount);
                if self.health == 0 {
                    self.phase = Phase::GameOver;
                }
                self
            }
            GameCommand::Heal(amount) => {
                self.health = self.health.saturating_add(amount).min(self.max_health);
                self
            }
            GameCommand::Shoot => {
                if self.ammo > 0 {
                    self.ammo -= 1;
                }
                self
            }
            GameCommand::Reload => {
                self.ammo = self.max_ammo;
                self
            }
            GameCommand::AddScore(points) => {
                self.score = self.score.saturating_add(points);
                self
            }
            GameCommand::SpawnEnemy(enemy) => {
                if self.enemy(enemy.id).is_some() {
                    warn!("Ignoring spawn of {}: id already in use", enemy.id);
                } else if !enemy.is_coherent() {
                    warn!(
                        "Ignoring spawn of {}: health {} / is_alive {} disagree",
                        enemy.id, enemy.health, enemy.is_alive
                    );
                } else {
                    self.enemies.push(enemy);
                }
                self
            }
            GameCommand::KillEnemy(id) => {
                if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == id && e.is_alive) {
                    enemy.is_alive = false;
                    enemy.health = 0;
                }
                self
            }
            GameCommand::NextLevel => {
                self.level = self.level.saturating_add(1);
                self.enemies.clear();
                self.ammo = self.max_ammo;
                self
            }
        }
    }

    /// Abort on any broken invariant. These can only be violated by a bug in
    /// this module, never by player input.
    pub fn assert_invariants(&self) {
        assert!(
            self.health <= self.max_health,
            "health {} exceeds max {}",
            self.health,
            self.max_health
        );
        assert!(
            self.ammo <= self.max_ammo,
            "ammo {} exceeds max {}",
            self.ammo,
            self.max_ammo
        );
        assert!(self.level >= 1, "level must be positive");
        for enemy in &self.enemies {
            assert!(
                enemy.is_coherent(),
                "{} has health {} but is_alive {}",
                enemy.id,
                enemy.health,
                enemy.is_alive
            );
        }
    }
}

/// Exclusive owner of the [`GameState`].
#[derive(Resource, Debug, Clone, Default)]
pub struct StateStore {
    state: GameState,
}

impl StateStore {
    pub fn new(vitals: Vitals) -> Self {
        Self {
            state: GameState::initial(vitals),
        }
    }

    /// Read-only view of the current state.
    #[inline]
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    /// Apply one command and return the resulting state.
    pub fn apply(&mut self, command: GameCommand) -> &GameState {
        let before = self.state.phase;
        let current = std::mem::take(&mut self.state);
        self.state = current.reduce(command);
        self.state.assert_invariants();

        if self.state.phase != before {
            info!("Phase {:?} -> {:?}", before, self.state.phase);
        }
        &self.state
    }
}
