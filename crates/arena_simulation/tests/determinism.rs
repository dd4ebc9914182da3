//! Тесты детерминизма
//!
//! Полный матч (танки + враги с случайными prefabs) с одинаковым seed
//! даёт идентичные snapshots.

use bevy::prelude::*;
use arena_simulation::*;

fn arena_config() -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.match_rules.start_delay = 0.5;
    config.match_rules.end_delay = 0.5;
    config.layout.tank_spawns = vec![
        SpawnPose::new(-6.0, 0.0, 0.0),
        SpawnPose::new(6.0, 0.0, 0.0),
        SpawnPose::new(0.0, 0.0, 6.0),
    ];
    config.layout.enemy_spawns = vec![
        SpawnPose::new(0.0, 0.0, -8.0),
        SpawnPose::new(8.0, 0.0, 8.0),
    ];
    config.layout.enemy_prefabs.push(EnemyPrefab {
        path: "res://enemies/brute.tscn".to_string(),
        chase: EnemyChaseConfig {
            move_speed: 2.5,
            attack_damage: 25,
            ..Default::default()
        },
    });
    config.layout.enemy_wave_interval = Some(3.0);
    config
}

/// Запускает симуляцию и возвращает snapshot мира
fn run_simulation(seed: u64, tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::new(arena_config()));

    for _ in 0..tick_count {
        app.update();
    }

    let mut snapshot = world_snapshot::<Transform>(app.world_mut());
    snapshot.extend(world_snapshot::<Health>(app.world_mut()));
    snapshot.extend(world_snapshot::<PrefabPath>(app.world_mut()));
    snapshot.extend(format!("{:?}", app.world().resource::<MatchHud>()).into_bytes());
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 900;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 600;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_bundled_arena_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/arena.ron");
    let config = ArenaConfig::load(path).expect("config/arena.ron is valid");

    assert_eq!(config.match_rules, MatchConfig::default());
    assert_eq!(config.layout.tank_spawns.len(), 2);
    assert_eq!(config.layout.enemy_prefabs.len(), 2);
}
