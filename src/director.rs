//! Enemy director: when and where new enemies appear.
//!
//! A spawn happens on a tick only when
//! - fewer than `max_alive` enemies are alive, and
//! - at least `cooldown` has passed since the last successful spawn.
//!
//! The spawn point is found by sampling open maze cells uniformly at random,
//! up to `attempts` times, and accepting the first one farther than
//! `min_distance` from the player. Running out of attempts just skips the
//! tick; the next tick tries again.
//!
//! Time is read from Bevy's virtual clock, which is monotonic and halts while
//! the run is paused, so pausing never shortens the cooldown.

use crate::maze::MazeLayout;
use crate::state::{Enemy, EnemyId, GameCommand, GameState, StateStore};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Tunables for [`EnemyDirector`], built from [`crate::config::GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    pub max_alive: usize,
    pub cooldown: Duration,
    pub attempts: u32,
    /// World-space distance a spawn point must exceed from the player.
    pub min_distance: f32,
    pub enemy_health: u32,
}

/// Spawn decision state: cooldown clock, id source and RNG.
#[derive(Resource, Debug, Clone)]
pub struct EnemyDirector {
    policy: SpawnPolicy,
    rng: StdRng,
    /// Virtual time of the last successful spawn; `None` until the first one.
    last_spawn: Option<Duration>,
    /// Monotonic id source; never rewinds, so ids stay unique across resets.
    next_id: u64,
}

impl EnemyDirector {
    /// A director seeded from `seed`, or from OS entropy when `None`.
    pub fn new(policy: SpawnPolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            policy,
            rng,
            last_spawn: None,
            next_id: 1,
        }
    }

    #[inline]
    pub fn policy(&self) -> &SpawnPolicy {
        &self.policy
    }

    /// Forget the cooldown so the first tick of a new run may spawn at once.
    pub fn reset(&mut self) {
        self.last_spawn = None;
    }

    /// Whether the cap and the cooldown both allow a spawn at `now`.
    pub fn can_spawn(&self, now: Duration, state: &GameState) -> bool {
        if state.alive_count() >= self.policy.max_alive {
            return false;
        }
        match self.last_spawn {
            Some(last) => now.saturating_sub(last) >= self.policy.cooldown,
            None => true,
        }
    }

    /// Decide this tick's spawn.
    ///
    /// Returns the enemy to hand to the store as `SpawnEnemy`, with an id not
    /// already present in `state`. The cooldown is left alone until
    /// [`Self::confirm_spawn`]. Returns `None` when spawning is not allowed or
    /// no spawn point was found.
    pub fn tick(
        &mut self,
        now: Duration,
        state: &GameState,
        maze: &MazeLayout,
        player: Vec3,
    ) -> Option<Enemy> {
        if !self.can_spawn(now, state) {
            return None;
        }

        let position = pick_spawn_point(
            &mut self.rng,
            maze,
            player,
            self.policy.attempts,
            self.policy.min_distance,
        )?;

        Some(Enemy::new(self.fresh_id(state), position, self.policy.enemy_health))
    }

    /// Restart the cooldown after the store accepted a spawn made at `now`.
    pub fn confirm_spawn(&mut self, now: Duration) {
        self.last_spawn = Some(now);
    }

    /// Run one spawn tick against the store.
    ///
    /// Returns the id of the enemy that was added. The cooldown only restarts
    /// when the store actually appended the enemy.
    pub fn spawn_into(
        &mut self,
        now: Duration,
        store: &mut StateStore,
        maze: &MazeLayout,
        player: Vec3,
    ) -> Option<EnemyId> {
        let enemy = self.tick(now, store.snapshot(), maze, player)?;
        let id = enemy.id;
        let before = store.snapshot().enemies.len();
        if store.apply(GameCommand::SpawnEnemy(enemy)).enemies.len() > before {
            self.confirm_spawn(now);
            Some(id)
        } else {
            None
        }
    }

    /// Next id from the counter, skipping ids that other sources already put
    /// into the run.
    fn fresh_id(&mut self, state: &GameState) -> EnemyId {
        loop {
            let id = EnemyId(self.next_id);
            self.next_id += 1;
            if state.enemy(id).is_none() {
                return id;
            }
        }
    }
}

/// Sample up to `attempts` open cells and return the first spawn point farther
/// than `min_distance` from `player`.
///
/// An arena without open cells never yields a point.
pub fn pick_spawn_point<R: Rng>(
    rng: &mut R,
    maze: &MazeLayout,
    player: Vec3,
    attempts: u32,
    min_distance: f32,
) -> Option<Vec3> {
    let cells = maze.open_cells();
    if cells.is_empty() {
        return None;
    }

    (0..attempts).find_map(|_| {
        let cell = cells[rng.gen_range(0..cells.len())];
        let point = maze.spawn_point(cell);
        (point.distance(player) > min_distance).then_some(point)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CELL_SIZE, DEFAULT_MAZE, ENEMY_SPAWN_HEIGHT, EYE_HEIGHT};

    fn policy() -> SpawnPolicy {
        SpawnPolicy {
            max_alive: 5,
            cooldown: Duration::from_secs(5),
            attempts: 10,
            min_distance: 2.0 * CELL_SIZE,
            enemy_health: 100,
        }
    }

    fn maze() -> MazeLayout {
        MazeLayout::parse(&DEFAULT_MAZE, CELL_SIZE, EYE_HEIGHT, ENEMY_SPAWN_HEIGHT).unwrap()
    }

    fn playing_store() -> StateStore {
        let mut store = StateStore::default();
        store.apply(GameCommand::StartGame);
        store
    }

    #[test]
    fn first_tick_spawns_a_full_health_enemy_in_an_open_cell() {
        let maze = maze();
        let store = playing_store();
        let mut director = EnemyDirector::new(policy(), Some(1));

        let enemy = director
            .tick(Duration::ZERO, store.snapshot(), &maze, maze.player_start())
            .unwrap();
        assert!(enemy.is_alive);
        assert_eq!(enemy.health, 100);
        assert!(maze.is_open_at(enemy.position));
        assert!((enemy.position.y - ENEMY_SPAWN_HEIGHT).abs() < 1e-6);
        assert!(enemy.position.distance(maze.player_start()) > 2.0 * CELL_SIZE);
    }

    #[test]
    fn cooldown_blocks_until_elapsed() {
        let maze = maze();
        let mut store = playing_store();
        let player = maze.player_start();
        let mut director = EnemyDirector::new(policy(), Some(2));

        assert!(director
            .spawn_into(Duration::from_secs(1), &mut store, &maze, player)
            .is_some());
        assert!(director
            .spawn_into(Duration::from_millis(5_999), &mut store, &maze, player)
            .is_none());
        assert!(director.can_spawn(Duration::from_secs(6), store.snapshot()));
    }

    #[test]
    fn alive_cap_blocks_spawning_but_dead_enemies_do_not_count() {
        let mut store = playing_store();
        for id in 0..5 {
            store.apply(GameCommand::SpawnEnemy(Enemy::new(
                EnemyId(1_000 + id),
                Vec3::ZERO,
                100,
            )));
        }
        let director = EnemyDirector::new(policy(), Some(3));
        assert!(!director.can_spawn(Duration::from_secs(60), store.snapshot()));

        store.apply(GameCommand::KillEnemy(EnemyId(1_000)));
        assert!(director.can_spawn(Duration::from_secs(60), store.snapshot()));
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let maze = maze();
        let store = playing_store();
        let player = maze.player_start();
        let mut director = EnemyDirector::new(
            SpawnPolicy {
                cooldown: Duration::ZERO,
                ..policy()
            },
            Some(4),
        );

        let mut ids = Vec::new();
        for step in 0..20 {
            if let Some(enemy) =
                director.tick(Duration::from_secs(step), store.snapshot(), &maze, player)
            {
                ids.push(enemy.id);
            }
        }
        assert!(ids.len() > 1);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reset_allows_an_immediate_spawn() {
        let mut store = playing_store();
        let maze = maze();
        let mut director = EnemyDirector::new(policy(), Some(5));
        director.spawn_into(Duration::from_secs(10), &mut store, &maze, maze.player_start());
        assert!(!director.can_spawn(Duration::from_secs(11), store.snapshot()));

        director.reset();
        assert!(director.can_spawn(Duration::from_secs(11), store.snapshot()));
    }

    #[test]
    fn tick_alone_does_not_restart_the_cooldown() {
        let maze = maze();
        let store = playing_store();
        let mut director = EnemyDirector::new(policy(), Some(9));
        assert!(director
            .tick(Duration::from_secs(1), store.snapshot(), &maze, maze.player_start())
            .is_some());
        assert!(director.can_spawn(Duration::from_secs(1), store.snapshot()));

        director.confirm_spawn(Duration::from_secs(1));
        assert!(!director.can_spawn(Duration::from_secs(2), store.snapshot()));
    }

    #[test]
    fn ids_taken_by_other_sources_are_skipped() {
        let maze = maze();
        let mut store = playing_store();
        store.apply(GameCommand::SpawnEnemy(Enemy::new(EnemyId(1), Vec3::ZERO, 100)));
        let mut director = EnemyDirector::new(policy(), Some(10));

        let id = director
            .spawn_into(Duration::ZERO, &mut store, &maze, maze.player_start())
            .unwrap();
        assert_ne!(id, EnemyId(1));
        assert_eq!(store.snapshot().alive_count(), 2);
    }

    #[test]
    fn rejected_spawn_keeps_the_cooldown_open() {
        let maze = maze();
        let mut store = playing_store();
        // Health above the enemy cap makes the store refuse the record.
        let mut director = EnemyDirector::new(
            SpawnPolicy {
                enemy_health: 150,
                ..policy()
            },
            Some(11),
        );

        assert!(director
            .spawn_into(Duration::from_secs(1), &mut store, &maze, maze.player_start())
            .is_none());
        assert!(store.snapshot().enemies.is_empty());
        assert!(director.can_spawn(Duration::from_secs(1), store.snapshot()));
    }

    #[test]
    fn no_spawn_point_when_every_cell_is_too_close() {
        let tiny = MazeLayout::parse(&["..."], 1.0, 1.8, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        assert!(pick_spawn_point(&mut rng, &tiny, Vec3::ZERO, 10, 50.0).is_none());
    }

    #[test]
    fn failed_search_does_not_restart_the_cooldown() {
        let tiny = MazeLayout::parse(&["..."], 1.0, 1.8, 0.5).unwrap();
        let store = playing_store();
        let mut director = EnemyDirector::new(
            SpawnPolicy {
                min_distance: 50.0,
                ..policy()
            },
            Some(7),
        );
        assert!(director
            .tick(Duration::from_secs(1), store.snapshot(), &tiny, Vec3::ZERO)
            .is_none());
        assert!(director.can_spawn(Duration::from_secs(1), store.snapshot()));
    }

    #[test]
    fn arena_without_open_cells_never_spawns() {
        let walls = MazeLayout::parse(&["###", "###"], 5.0, 1.8, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        assert!(pick_spawn_point(&mut rng, &walls, Vec3::ZERO, 10, 0.0).is_none());
    }
}
