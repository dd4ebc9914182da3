//! Enemy waves integration test
//!
//! Волны раз в секунду, две enemy spawn точки далеко от танков (враги не атакуют).
//! Матч заканчивается по таймеру на 2.5s.
//!
//! Проверяем:
//! - Волна приходит по интервалу, по врагу на каждую spawn точку
//! - После конца матча волн больше нет

use bevy::prelude::*;
use arena_simulation::*;

const WAVE_SPAWNS: [Vec3; 2] = [Vec3::new(-5.0, 0.0, 100.0), Vec3::new(5.0, 0.0, 100.0)];

fn wave_config() -> ArenaConfig {
    ArenaConfig {
        match_rules: MatchConfig {
            start_delay: 0.5,
            end_delay: 0.5,
            max_game_time: 2.5,
            // Restart не должен успеть сработать за время теста
            restart_delay: 30.0,
            ..Default::default()
        },
        layout: ArenaLayout {
            tank_spawns: vec![
                SpawnPose::new(-10.0, 0.0, 0.0),
                SpawnPose::new(10.0, 0.0, 0.0),
            ],
            enemy_spawns: WAVE_SPAWNS
                .iter()
                .map(|p| SpawnPose::new(p.x, p.y, p.z))
                .collect(),
            enemy_prefabs: vec![EnemyPrefab {
                path: "res://enemies/crawler.tscn".to_string(),
                chase: EnemyChaseConfig {
                    chase_range: 20.0,
                    ..Default::default()
                },
            }],
            initial_enemies: 0,
            enemy_wave_interval: Some(1.0),
            ..Default::default()
        },
    }
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn enemy_positions(app: &mut App) -> Vec<Vec3> {
    let mut query = app.world_mut().query_filtered::<&Transform, With<Enemy>>();
    query.iter(app.world()).map(|t| t.translation).collect()
}

fn spawn_point_count(positions: &[Vec3], point: Vec3) -> usize {
    positions.iter().filter(|p| p.distance(point) < 1e-3).count()
}

#[test]
fn test_waves_follow_interval_and_stop_after_match() {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin::new(wave_config()));
    app.update();

    // ~0.92s: первой волны ещё нет
    run_ticks(&mut app, 55);
    assert!(enemy_positions(&mut app).is_empty());

    // ~1.08s: первая волна, по врагу на каждую точку
    run_ticks(&mut app, 10);
    let positions = enemy_positions(&mut app);
    assert_eq!(positions.len(), 2);
    for point in WAVE_SPAWNS {
        assert_eq!(spawn_point_count(&positions, point), 1);
    }

    // ~1.92s: вторая ещё не пришла
    run_ticks(&mut app, 50);
    assert_eq!(enemy_positions(&mut app).len(), 2);

    // ~2.08s: вторая волна
    run_ticks(&mut app, 10);
    let positions = enemy_positions(&mut app);
    assert_eq!(positions.len(), 4);
    for point in WAVE_SPAWNS {
        assert_eq!(spawn_point_count(&positions, point), 2);
    }

    // ~2.5s: timeout, матч больше не активен
    run_ticks(&mut app, 30);
    assert_eq!(
        app.world().resource::<RoundStateMachine>().phase(),
        MatchPhase::GameOver
    );

    // Ещё 4 секунды GameOver: новых волн нет
    run_ticks(&mut app, 240);
    assert_eq!(enemy_positions(&mut app).len(), 4);
}
