//! Target acquisition (TargetScan cadence, раз в 0.5s)
//!
//! Кандидаты - зарегистрированные combatants матча в порядке игроков,
//! живые и в пределах chase_range. Ближайший выигрывает, при равенстве
//! остаётся первый найденный.

use bevy::prelude::*;

use crate::ai::{ChaseTarget, Enemy, EnemyChase};
use crate::combat::{is_agent_alive, Dead};
use crate::components::Health;
use crate::match_flow::RoundStateMachine;

/// Ближайший кандидат в радиусе (`distance <= chase_range`)
pub fn select_nearest_target(
    origin: Vec3,
    candidates: &[(Entity, Vec3)],
    chase_range: f32,
) -> Option<Entity> {
    let mut shortest = f32::INFINITY;
    let mut nearest = None;

    for &(entity, position) in candidates {
        let distance = origin.distance(position);
        if distance < shortest && distance <= chase_range {
            shortest = distance;
            nearest = Some(entity);
        }
    }

    nearest
}

/// Живые combatants матча: (instance, позиция) в порядке реестра
pub fn alive_combatant_positions(
    machine: &RoundStateMachine,
    agents: &Query<(&Transform, Option<&Health>, Has<Dead>), Without<Enemy>>,
) -> Vec<(Entity, Vec3)> {
    machine
        .registry()
        .instances()
        .filter_map(|entity| {
            // Instance мог исчезнуть (restart, хост удалил node) - просто пропускаем
            let (transform, health, dead) = agents.get(entity).ok()?;
            is_agent_alive(health, dead).then_some((entity, transform.translation))
        })
        .collect()
}

/// Система: переоценка целей всех врагов
pub fn acquire_enemy_targets(
    machine: Option<Res<RoundStateMachine>>,
    agents: Query<(&Transform, Option<&Health>, Has<Dead>), Without<Enemy>>,
    mut enemies: Query<(Entity, &Transform, &EnemyChase, &mut ChaseTarget), With<Enemy>>,
) {
    let candidates = match machine.as_deref() {
        Some(machine) => alive_combatant_positions(machine, &agents),
        None => Vec::new(),
    };

    for (entity, transform, chase, mut chase_target) in enemies.iter_mut() {
        let nearest = select_nearest_target(transform.translation, &candidates, chase.chase_range);

        if chase_target.target != nearest {
            match nearest {
                Some(target) => crate::log(&format!("Enemy {:?}: new target {:?}", entity, target)),
                None => crate::log(&format!("Enemy {:?}: lost target", entity)),
            }
            chase_target.target = nearest;
        }
    }
}
