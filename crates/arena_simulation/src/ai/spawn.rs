//! Enemy spawning: стартовые враги + опциональные волны

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{ArenaLayout, SpawnPose};
use crate::factory::{AgentFactory, PrefabKind};
use crate::match_flow::RoundStateMachine;
use crate::DeterministicRng;

/// Таймер волн врагов (секунды с последней волны)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyWaves {
    pub since_last_wave: f32,
}

/// Стартовые враги: первые `initial_enemies` точек, prefab - случайный
pub fn spawn_initial_enemies(
    factory: &mut impl AgentFactory,
    layout: &ArenaLayout,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let count = layout.initial_enemies.min(layout.enemy_spawns.len());
    layout.enemy_spawns[..count]
        .iter()
        .filter_map(|pose| spawn_random_enemy(factory, layout, pose, rng))
        .collect()
}

/// Волна: по одному врагу на каждую enemy spawn точку
pub fn spawn_enemy_wave(
    factory: &mut impl AgentFactory,
    layout: &ArenaLayout,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    layout
        .enemy_spawns
        .iter()
        .filter_map(|pose| spawn_random_enemy(factory, layout, pose, rng))
        .collect()
}

fn spawn_random_enemy(
    factory: &mut impl AgentFactory,
    layout: &ArenaLayout,
    pose: &SpawnPose,
    rng: &mut impl Rng,
) -> Option<Entity> {
    let prefab = layout.enemy_prefabs.choose(rng)?;
    Some(factory.spawn_agent(&PrefabKind::Enemy(prefab.clone()), pose.to_transform()))
}

/// Система: периодические волны, пока матч активен
pub fn spawn_enemy_waves(
    mut commands: Commands,
    mut waves: ResMut<EnemyWaves>,
    mut rng: ResMut<DeterministicRng>,
    layout: Res<ArenaLayout>,
    machine: Option<Res<RoundStateMachine>>,
    time: Res<Time<Fixed>>,
) {
    let Some(interval) = layout.enemy_wave_interval else {
        return;
    };
    if !machine.is_some_and(|machine| machine.is_match_active()) {
        return;
    }

    waves.since_last_wave += time.delta_secs();
    if waves.since_last_wave < interval {
        return;
    }
    waves.since_last_wave -= interval;

    let spawned = spawn_enemy_wave(&mut commands, &layout, &mut rng.rng);
    crate::log_info(&format!("Enemy wave: {} spawned", spawned.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyChaseConfig, EnemyPrefab};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Factory, которая только запоминает запросы
    #[derive(Default)]
    struct RecordingFactory {
        spawned: Vec<(PrefabKind, Transform)>,
    }

    impl AgentFactory for RecordingFactory {
        fn spawn_agent(&mut self, kind: &PrefabKind, pose: Transform) -> Entity {
            self.spawned.push((kind.clone(), pose));
            Entity::from_raw(self.spawned.len() as u32)
        }
    }

    fn layout(enemy_spawns: usize, initial_enemies: usize) -> ArenaLayout {
        ArenaLayout {
            enemy_spawns: (0..enemy_spawns)
                .map(|i| SpawnPose::new(i as f32, 0.0, 10.0))
                .collect(),
            enemy_prefabs: vec![
                EnemyPrefab {
                    path: "res://enemies/crawler.tscn".to_string(),
                    chase: EnemyChaseConfig::default(),
                },
                EnemyPrefab {
                    path: "res://enemies/brute.tscn".to_string(),
                    chase: EnemyChaseConfig {
                        move_speed: 2.0,
                        attack_damage: 30,
                        ..Default::default()
                    },
                },
            ],
            initial_enemies,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_enemies_use_first_spawn_points() {
        let mut factory = RecordingFactory::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let spawned = spawn_initial_enemies(&mut factory, &layout(3, 2), &mut rng);

        assert_eq!(spawned.len(), 2);
        assert_eq!(factory.spawned[0].1.translation, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(factory.spawned[1].1.translation, Vec3::new(1.0, 0.0, 10.0));
        assert!(factory
            .spawned
            .iter()
            .all(|(kind, _)| matches!(kind, PrefabKind::Enemy(_))));
    }

    #[test]
    fn test_initial_enemies_capped_by_spawn_points() {
        let mut factory = RecordingFactory::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let spawned = spawn_initial_enemies(&mut factory, &layout(1, 2), &mut rng);
        assert_eq!(spawned.len(), 1);
    }

    #[test]
    fn test_no_prefabs_spawns_nothing() {
        let mut factory = RecordingFactory::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut layout = layout(2, 2);
        layout.enemy_prefabs.clear();

        assert!(spawn_initial_enemies(&mut factory, &layout, &mut rng).is_empty());
        assert!(spawn_enemy_wave(&mut factory, &layout, &mut rng).is_empty());
    }

    #[test]
    fn test_wave_covers_every_spawn_point() {
        let mut factory = RecordingFactory::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let spawned = spawn_enemy_wave(&mut factory, &layout(4, 0), &mut rng);
        assert_eq!(spawned.len(), 4);
    }

    #[test]
    fn test_prefab_choice_is_seeded() {
        let pick = |seed: u64| {
            let mut factory = RecordingFactory::default();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            spawn_enemy_wave(&mut factory, &layout(8, 0), &mut rng);
            factory.spawned
        };

        assert_eq!(pick(42), pick(42));
    }
}
