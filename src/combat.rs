//! Shot resolution: which enemies a shot kills and what it scores.
//!
//! The ammo decrement belongs to the [`StateStore`]; [`resolve`] only computes
//! consequences and [`fire`] ties the two together in the right order.
//!
//! ## Hit rules
//!
//! | Rule        | Hits                                                        |
//! |-------------|-------------------------------------------------------------|
//! | `Proximity` | every alive enemy closer than `range` to the origin; aim is ignored |
//! | `Ray`       | the nearest alive enemy whose hit sphere the aim ray enters within `range` |
//!
//! `Proximity` is the default arcade behaviour. `Ray` is a true hitscan and is
//! selected with `hit_rule = "ray"` in `assets/game.toml`.

use crate::state::{Enemy, EnemyId, GameCommand, StateStore};
use bevy::prelude::*;
use serde::Deserialize;

/// How a shot decides which enemies it hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitRule {
    #[default]
    Proximity,
    Ray,
}

/// Parameters for [`resolve`], built from [`crate::config::GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatRules {
    pub hit_rule: HitRule,
    pub range: f32,
    /// Sphere radius used by [`HitRule::Ray`].
    pub enemy_radius: f32,
    pub kill_score: u32,
}

/// Gameplay consequences of one shot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShotOutcome {
    /// Enemies killed, in spawn order.
    pub hits: Vec<EnemyId>,
    pub score_delta: u32,
}

/// Compute the enemies hit by a shot from `origin` along `aim`.
///
/// Dead enemies are skipped, so they can never be hit or scored twice.
pub fn resolve(origin: Vec3, aim: Vec3, enemies: &[Enemy], rules: &CombatRules) -> ShotOutcome {
    let alive = enemies.iter().filter(|e| e.is_alive);

    let hits: Vec<EnemyId> = match rules.hit_rule {
        HitRule::Proximity => alive
            .filter(|e| e.position.distance(origin) < rules.range)
            .map(|e| e.id)
            .collect(),
        HitRule::Ray => {
            let Some(dir) = aim.try_normalize() else {
                return ShotOutcome::default();
            };
            alive
                .filter_map(|e| {
                    ray_sphere_distance(origin, dir, e.position, rules.enemy_radius)
                        .filter(|&t| t <= rules.range)
                        .map(|t| (t, e.id))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, id)| id)
                .into_iter()
                .collect()
        }
    };

    let score_delta = rules.kill_score.saturating_mul(hits.len() as u32);
    ShotOutcome { hits, score_delta }
}

/// Distance along the unit ray `dir` to the first point inside the sphere, or
/// `None` when the ray misses it or the sphere is entirely behind the origin.
fn ray_sphere_distance(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(dir);
    let perp_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if perp_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - perp_sq).sqrt();
    let exit = along + half_chord;
    if exit < 0.0 {
        return None;
    }
    Some((along - half_chord).max(0.0))
}

/// Fire one shot through the store.
///
/// Returns `None` without touching the state when the run is not in progress
/// or the magazine is empty. Otherwise spends one round, kills every enemy the
/// shot hits and awards `kill_score` per kill.
pub fn fire(
    store: &mut StateStore,
    origin: Vec3,
    aim: Vec3,
    rules: &CombatRules,
) -> Option<ShotOutcome> {
    let snapshot = store.snapshot();
    if !snapshot.is_playing() || snapshot.ammo == 0 {
        return None;
    }

    store.apply(GameCommand::Shoot);
    let outcome = resolve(origin, aim, &store.snapshot().enemies, rules);

    for &id in &outcome.hits {
        store.apply(GameCommand::KillEnemy(id));
        store.apply(GameCommand::AddScore(rules.kill_score));
        debug!("Shot killed {id}");
    }
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;

    fn rules(hit_rule: HitRule) -> CombatRules {
        CombatRules {
            hit_rule,
            range: 20.0,
            enemy_radius: 1.0,
            kill_score: 100,
        }
    }

    fn enemy_at(id: u64, x: f32, z: f32) -> Enemy {
        Enemy::new(EnemyId(id), Vec3::new(x, 0.5, z), 100)
    }

    #[test]
    fn no_enemies_no_hits() {
        let outcome = resolve(Vec3::ZERO, Vec3::NEG_Z, &[], &rules(HitRule::Proximity));
        assert_eq!(outcome, ShotOutcome::default());
    }

    #[test]
    fn proximity_hits_everything_in_range_regardless_of_aim() {
        let enemies = [
            enemy_at(1, 0.0, 10.0),  // behind the shooter
            enemy_at(2, 19.0, 0.0),  // to the side
            enemy_at(3, 0.0, -30.0), // in front but out of range
        ];
        let outcome = resolve(Vec3::ZERO, Vec3::NEG_Z, &enemies, &rules(HitRule::Proximity));
        assert_eq!(outcome.hits, vec![EnemyId(1), EnemyId(2)]);
        assert_eq!(outcome.score_delta, 200);
    }

    #[test]
    fn dead_enemies_are_never_hit() {
        let mut dead = enemy_at(1, 1.0, 0.0);
        dead.is_alive = false;
        dead.health = 0;
        let outcome = resolve(Vec3::ZERO, Vec3::X, &[dead], &rules(HitRule::Proximity));
        assert!(outcome.hits.is_empty());
        assert_eq!(outcome.score_delta, 0);
    }

    #[test]
    fn ray_hits_only_the_nearest_enemy_in_the_line_of_fire() {
        let enemies = [
            enemy_at(1, 0.0, -15.0),
            enemy_at(2, 0.0, -5.0),
            enemy_at(3, 5.0, -5.0), // off the ray
            enemy_at(4, 0.0, 5.0),  // behind
        ];
        let origin = Vec3::new(0.0, 0.5, 0.0);
        let outcome = resolve(origin, Vec3::NEG_Z, &enemies, &rules(HitRule::Ray));
        assert_eq!(outcome.hits, vec![EnemyId(2)]);
        assert_eq!(outcome.score_delta, 100);
    }

    #[test]
    fn ray_respects_range() {
        let enemies = [enemy_at(1, 0.0, -25.0)];
        let origin = Vec3::new(0.0, 0.5, 0.0);
        assert!(resolve(origin, Vec3::NEG_Z, &enemies, &rules(HitRule::Ray))
            .hits
            .is_empty());
    }

    #[test]
    fn ray_with_zero_aim_hits_nothing() {
        let enemies = [enemy_at(1, 0.0, -1.0)];
        assert!(resolve(Vec3::ZERO, Vec3::ZERO, &enemies, &rules(HitRule::Ray))
            .hits
            .is_empty());
    }

    #[test]
    fn origin_inside_hit_sphere_counts_as_a_hit() {
        assert_eq!(
            ray_sphere_distance(Vec3::ZERO, Vec3::X, Vec3::new(0.2, 0.0, 0.0), 1.0),
            Some(0.0)
        );
    }

    #[test]
    fn fire_spends_ammo_kills_and_scores() {
        let mut store = StateStore::default();
        store.apply(GameCommand::StartGame);
        store.apply(GameCommand::SpawnEnemy(enemy_at(1, 3.0, 0.0)));
        store.apply(GameCommand::SpawnEnemy(enemy_at(2, 50.0, 0.0)));

        let outcome = fire(&mut store, Vec3::ZERO, Vec3::X, &rules(HitRule::Proximity)).unwrap();
        assert_eq!(outcome.hits, vec![EnemyId(1)]);

        let state = store.snapshot();
        assert_eq!(state.ammo, 29);
        assert_eq!(state.score, 100);
        assert!(!state.enemy(EnemyId(1)).unwrap().is_alive);
        assert!(state.enemy(EnemyId(2)).unwrap().is_alive);

        // Second shot: the dead enemy is not scored again.
        fire(&mut store, Vec3::ZERO, Vec3::X, &rules(HitRule::Proximity)).unwrap();
        assert_eq!(store.snapshot().score, 100);
        assert_eq!(store.snapshot().ammo, 28);
    }

    #[test]
    fn fire_with_empty_magazine_changes_nothing() {
        let mut store = StateStore::default();
        store.apply(GameCommand::StartGame);
        for _ in 0..30 {
            store.apply(GameCommand::Shoot);
        }
        store.apply(GameCommand::SpawnEnemy(enemy_at(1, 1.0, 0.0)));
        let before = store.snapshot().clone();

        assert!(fire(&mut store, Vec3::ZERO, Vec3::X, &rules(HitRule::Proximity)).is_none());
        assert_eq!(*store.snapshot(), before);
    }

    #[test]
    fn fire_outside_a_run_changes_nothing() {
        let mut store = StateStore::default();
        assert_eq!(store.snapshot().phase, Phase::Menu);
        assert!(fire(&mut store, Vec3::ZERO, Vec3::X, &rules(HitRule::Proximity)).is_none());
        assert_eq!(store.snapshot().ammo, 30);
    }
}
