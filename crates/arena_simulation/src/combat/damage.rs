//! Damage application and death marking.

use bevy::ecs::entity::Entities;
use bevy::prelude::*;

use crate::components::{Health, Tank};
use crate::error::AgentError;

/// Враг ударил цель (пишет `enemy_chase_step`)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyAttack {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Урон применён к Health цели
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub remaining_health: u32,
    /// Этот удар опустил Health до 0
    pub killed: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: танк упал (Health == 0)
///
/// Entity остаётся в мире до reset раунда - хост прячет визуал,
/// reset восстанавливает здоровье и снимает маркер.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Жив ли агент: без Health считаем живым, пока нет маркера Dead
pub fn is_agent_alive(health: Option<&Health>, dead: bool) -> bool {
    !dead && health.is_none_or(Health::is_alive)
}

/// Применяет один удар к Health цели
///
/// Цель без Health → `AgentError::NoCapability` (удар пропускается).
pub fn strike(attack: &EnemyAttack, health: Option<&mut Health>) -> Result<DamageDealt, AgentError> {
    let health = health.ok_or(AgentError::NoCapability {
        entity: attack.target,
        capability: "Health",
    })?;

    let was_alive = health.is_alive();
    health.take_damage(attack.damage);

    Ok(DamageDealt {
        attacker: attack.attacker,
        target: attack.target,
        damage: attack.damage,
        remaining_health: health.current,
        killed: was_alive && !health.is_alive(),
    })
}

/// Система: EnemyAttack → Health
pub fn apply_enemy_attacks(
    mut attacks: EventReader<EnemyAttack>,
    mut targets: Query<&mut Health>,
    entities: &Entities,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for attack in attacks.read() {
        let result = if entities.contains(attack.target) {
            let mut health = targets.get_mut(attack.target).ok();
            strike(attack, health.as_deref_mut())
        } else {
            Err(AgentError::InvalidHandle(attack.target))
        };

        match result {
            Ok(dealt) => {
                if dealt.killed {
                    crate::log_info(&format!(
                        "💀 {:?} destroyed by {:?}",
                        dealt.target, dealt.attacker
                    ));
                    entity_died.write(EntityDied {
                        entity: dealt.target,
                        killer: Some(dealt.attacker),
                    });
                }
                damage_dealt.write(dealt);
            }
            // Нечего бить - тихо пропускаем
            Err(AgentError::NoCapability { .. }) => {}
            Err(err) => crate::log_warning(&format!("EnemyAttack skipped: {}", err)),
        }
    }
}

/// Система: Health == 0 → маркер Dead
pub fn mark_fallen_tanks(
    mut commands: Commands,
    tanks: Query<(Entity, &Tank, &Health), Without<Dead>>,
) {
    for (entity, tank, health) in tanks.iter() {
        if !health.is_alive() {
            crate::log_info(&format!("Tank of player {} is down", tank.player_number));
            commands.entity(entity).insert(Dead);
        }
    }
}
