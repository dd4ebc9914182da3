//! Pursuit / attack step (каждый fixed tick)
//!
//! Решение "двигаться или бить" - чистая функция от дистанции и cooldown
//! (`decide_chase`), система только применяет результат.

use bevy::prelude::*;

use crate::ai::{ChaseMode, ChaseTarget, Enemy, EnemyChase};
use crate::combat::{is_agent_alive, Dead, EnemyAttack};
use crate::components::Health;

/// Что враг делает в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChaseAction {
    /// Сблизиться: смещение + поворот (None - цель ровно над/под врагом)
    Advance { step: Vec3, facing: Option<Quat> },
    /// В радиусе атаки, cooldown готов
    Strike,
    /// В радиусе атаки, cooldown ещё идёт
    Recover,
}

impl ChaseAction {
    pub fn mode(&self) -> ChaseMode {
        match self {
            ChaseAction::Advance { .. } => ChaseMode::Pursuing,
            ChaseAction::Strike | ChaseAction::Recover => ChaseMode::Attacking,
        }
    }
}

pub fn decide_chase(position: Vec3, target: Vec3, chase: &EnemyChase, now: f32, dt: f32) -> ChaseAction {
    let offset = target - position;

    if offset.length() > chase.attack_range {
        ChaseAction::Advance {
            step: offset.normalize_or_zero() * chase.move_speed * dt,
            facing: facing_towards(offset),
        }
    } else if chase.can_attack(now) {
        ChaseAction::Strike
    } else {
        ChaseAction::Recover
    }
}

/// Поворот вокруг Y так, чтобы forward (+Z) смотрел вдоль offset на плоскости земли
pub fn facing_towards(offset: Vec3) -> Option<Quat> {
    let planar = Vec3::new(offset.x, 0.0, offset.z);
    if planar == Vec3::ZERO {
        return None;
    }
    Some(Quat::from_rotation_y(planar.x.atan2(planar.z)))
}

/// Система: погоня и атака врагов
///
/// Цель проверяется заново каждый тик: исчезнувшая или мёртвая цель
/// сбрасывается (враг ждёт следующего TargetScan).
pub fn enemy_chase_step(
    mut enemies: Query<
        (Entity, &mut Transform, &mut EnemyChase, &mut ChaseTarget, &mut ChaseMode),
        With<Enemy>,
    >,
    targets: Query<(&Transform, Option<&Health>, Has<Dead>), Without<Enemy>>,
    mut attacks: EventWriter<EnemyAttack>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    for (entity, mut transform, mut chase, mut chase_target, mut mode) in enemies.iter_mut() {
        let Some(target) = chase_target.target else {
            mode.set_if_neq(ChaseMode::Idle);
            continue;
        };

        let target_position = match targets.get(target) {
            Ok((target_transform, health, dead)) if is_agent_alive(health, dead) => {
                target_transform.translation
            }
            _ => {
                crate::log(&format!("Enemy {:?}: target {:?} gone", entity, target));
                chase_target.target = None;
                mode.set_if_neq(ChaseMode::Idle);
                continue;
            }
        };

        let action = decide_chase(transform.translation, target_position, &chase, now, dt);
        mode.set_if_neq(action.mode());

        match action {
            ChaseAction::Advance { step, facing } => {
                transform.translation += step;
                if let Some(rotation) = facing {
                    transform.rotation = rotation;
                }
            }
            ChaseAction::Strike => {
                chase.register_attack(now);
                attacks.write(EnemyAttack {
                    attacker: entity,
                    target,
                    damage: chase.attack_damage,
                });
            }
            ChaseAction::Recover => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chase() -> EnemyChase {
        EnemyChase {
            move_speed: 4.0,
            chase_range: 20.0,
            attack_range: 2.0,
            attack_damage: 10,
            attack_cooldown: 1.5,
            last_attack_time: None,
        }
    }

    #[test]
    fn test_far_target_advances() {
        let action = decide_chase(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &chase(), 0.0, 0.5);

        let ChaseAction::Advance { step, facing } = action else {
            panic!("expected Advance, got {:?}", action);
        };
        assert!((step - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!(facing.is_some());
        assert_eq!(action.mode(), ChaseMode::Pursuing);
    }

    #[test]
    fn test_close_target_strikes_immediately() {
        let action = decide_chase(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &chase(), 0.0, 0.5);
        assert_eq!(action, ChaseAction::Strike);
        assert_eq!(action.mode(), ChaseMode::Attacking);
    }

    #[test]
    fn test_cooldown_blocks_second_strike() {
        let mut chase = chase();
        chase.register_attack(1.0);

        let target = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(decide_chase(Vec3::ZERO, target, &chase, 2.0, 0.5), ChaseAction::Recover);
        assert_eq!(decide_chase(Vec3::ZERO, target, &chase, 2.5, 0.5), ChaseAction::Strike);
    }

    #[test]
    fn test_attack_range_boundary_is_attack() {
        let action = decide_chase(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), &chase(), 0.0, 0.5);
        assert_eq!(action, ChaseAction::Strike);
    }

    #[test]
    fn test_distance_is_three_dimensional() {
        // По плоскости 1м, но по высоте 5м - ещё не в радиусе атаки
        let action = decide_chase(Vec3::ZERO, Vec3::new(1.0, 5.0, 0.0), &chase(), 0.0, 0.5);
        assert!(matches!(action, ChaseAction::Advance { .. }));
    }

    #[test]
    fn test_vertical_offset_skips_rotation() {
        assert_eq!(facing_towards(Vec3::new(0.0, 3.0, 0.0)), None);
    }

    #[test]
    fn test_tiny_planar_offset_still_rotates() {
        // Только ровно нулевое направление пропускает поворот
        let rotation = facing_towards(Vec3::new(1e-4, 3.0, 0.0)).expect("non-zero planar offset");
        let forward = rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_facing_points_forward_at_target() {
        let offset = Vec3::new(3.0, 1.0, -4.0);
        let rotation = facing_towards(offset).expect("planar offset");
        let forward = rotation * Vec3::Z;

        let expected = Vec3::new(3.0, 0.0, -4.0).normalize();
        assert!((forward - expected).length() < 1e-5);
    }
}
